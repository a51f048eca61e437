use stitch_registry::RegistryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(
        "公開ポートが足りません: サービス '{service}' に割り当てられるホストポートがありません\n\nヒント:\n  • ベースポートを小さくしてください"
    )]
    PortRangeExhausted { service: String },

    #[error("YAML 出力エラー: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ComposeError>;
