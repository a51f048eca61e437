//! サービス仕様ファイルの発見
//!
//! 規約ベースのファイル名からサービス仕様ファイルを発見します。

use crate::error::{Result, SpecError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// サービス仕様ファイル名（優先）
pub const SPEC_FILENAME: &str = "stitch.yml";

/// サービス仕様ファイル名（フォールバック）
pub const SPEC_FALLBACK_FILENAME: &str = "stitch.yaml";

/// ディレクトリ内のサービス仕様ファイルを探す
///
/// 検索順序:
/// 1. stitch.yml
/// 2. stitch.yaml
#[tracing::instrument(skip(dir), fields(dir = %dir.display()))]
pub fn find_spec_file(dir: &Path) -> Result<PathBuf> {
    for filename in [SPEC_FILENAME, SPEC_FALLBACK_FILENAME] {
        let path = dir.join(filename);
        if path.is_file() {
            debug!(file = %path.display(), "Found spec file");
            return Ok(path);
        }
    }

    debug!("Spec file not found");
    Err(SpecError::SpecFileNotFound(dir.to_path_buf()))
}
