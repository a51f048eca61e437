use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("ホームディレクトリが見つかりません。STITCH_CACHE_DIR 環境変数でキャッシュディレクトリを指定してください")]
    HomeDirNotFound,

    #[error(
        "No microservice registry URI provided, use the --registry option or the STITCH_REGISTRY environment variable."
    )]
    RegistryNotConfigured,

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
