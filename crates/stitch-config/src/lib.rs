pub mod error;

pub use error::*;

use std::path::PathBuf;
use tracing::debug;

/// レジストリの場所を指定する環境変数
pub const REGISTRY_ENV: &str = "STITCH_REGISTRY";

/// キャッシュディレクトリを指定する環境変数
pub const CACHE_DIR_ENV: &str = "STITCH_CACHE_DIR";

/// デフォルトのキャッシュディレクトリ名（ホームディレクトリ直下）
const DEFAULT_CACHE_DIRNAME: &str = ".stitch";

/// レジストリの取得元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryLocation {
    /// http(s) で取得する
    Url(String),
    /// ローカルファイルから読み込む
    File(PathBuf),
}

impl RegistryLocation {
    /// `http` で始まるものはURL、それ以外はファイルパス
    pub fn parse(uri: &str) -> Self {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            Self::Url(uri.to_string())
        } else {
            Self::File(PathBuf::from(uri))
        }
    }
}

impl std::fmt::Display for RegistryLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// レジストリの場所を決定する
///
/// 以下の優先順位:
/// 1. 明示的な指定（--registry）
/// 2. 環境変数 STITCH_REGISTRY
pub fn resolve_registry_location(explicit: Option<&str>) -> Result<RegistryLocation> {
    if let Some(uri) = explicit.filter(|s| !s.trim().is_empty()) {
        return Ok(RegistryLocation::parse(uri.trim()));
    }

    match std::env::var(REGISTRY_ENV) {
        Ok(uri) if !uri.trim().is_empty() => {
            debug!(registry = %uri, "Using registry from STITCH_REGISTRY");
            Ok(RegistryLocation::parse(uri.trim()))
        }
        _ => Err(ConfigError::RegistryNotConfigured),
    }
}

/// gitチェックアウトのキャッシュディレクトリを取得
///
/// 以下の優先順位:
/// 1. 明示的な指定（--cache-dir）
/// 2. 環境変数 STITCH_CACHE_DIR
/// 3. ~/.stitch
///
/// ディレクトリが存在しない場合は作成する。
pub fn get_cache_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let cache_dir = match explicit {
        Some(dir) => dir,
        None => match std::env::var_os(CACHE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .ok_or(ConfigError::HomeDirNotFound)?
                .join(DEFAULT_CACHE_DIRNAME),
        },
    };

    if !cache_dir.exists() {
        debug!(cache_dir = %cache_dir.display(), "Creating cache directory");
        std::fs::create_dir_all(&cache_dir)?;
    }

    Ok(cache_dir)
}
