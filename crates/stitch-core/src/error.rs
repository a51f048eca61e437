use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Invalid microservice registry: {0}")]
    RegistryMalformed(String),

    #[error("Invalid microservice spec: {0}")]
    SpecMalformed(String),

    #[error(
        "サービス仕様ファイルが見つかりません: {0}\nヒント: stitch.yml または stitch.yaml を配置してください"
    )]
    SpecFileNotFound(PathBuf),

    #[error("YAMLパースエラー: {path}\n理由: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSONパースエラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ファイル読み込みエラー: {path}\n理由: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecError {
    /// `'<property>' property <reason>` 形式の仕様エラーを生成
    pub(crate) fn invalid_spec(property: &str, reason: impl AsRef<str>) -> Self {
        SpecError::SpecMalformed(format!("'{}' property {}", property, reason.as_ref()))
    }

    /// `section '<name>' <reason>` 形式のレジストリエラーを生成
    pub(crate) fn invalid_section(section: &str, reason: impl AsRef<str>) -> Self {
        SpecError::RegistryMalformed(format!("section '{}' {}", section, reason.as_ref()))
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;
