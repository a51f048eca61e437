//! サービス仕様ローダー
//!
//! ファイル発見、YAMLパース、バリデーションを統合

use crate::discovery::find_spec_file;
use crate::error::{Result, SpecError};
use crate::model::{ResolvedSpec, SpecDocument};
use crate::validator::validate_service_spec;
use std::path::Path;
use tracing::{debug, info, instrument};

/// ディレクトリからサービス仕様をロード
///
/// 以下の処理を実行:
/// 1. 仕様ファイルの発見（stitch.yml → stitch.yaml）
/// 2. YAMLパース
/// 3. バリデーション（`exists` で dependencies をレジストリと照合）
/// 4. ResolvedSpec への変換（`root_directory_path` は `dir`）
#[instrument(skip(dir, exists), fields(dir = %dir.display()))]
pub fn load_spec(dir: &Path, exists: &dyn Fn(&str) -> bool) -> Result<ResolvedSpec> {
    let spec_file = find_spec_file(dir)?;

    debug!(file = %spec_file.display(), "Reading spec file");
    let content = std::fs::read_to_string(&spec_file).map_err(|e| SpecError::IoError {
        path: spec_file.clone(),
        message: e.to_string(),
    })?;

    let spec = parse_spec(&content, dir, exists).map_err(|e| match e {
        SpecError::Yaml { source, .. } => SpecError::Yaml {
            path: spec_file.clone(),
            source,
        },
        other => other,
    })?;

    info!(
        namespace = %spec.namespace,
        containers = spec.containers.len(),
        dependencies = spec.dependencies.len(),
        "Spec loaded successfully"
    );

    Ok(spec)
}

/// YAML文字列からサービス仕様をパース
pub fn parse_spec(
    content: &str,
    root_directory_path: &Path,
    exists: &dyn Fn(&str) -> bool,
) -> Result<ResolvedSpec> {
    let yaml_err = |source| SpecError::Yaml {
        path: root_directory_path.to_path_buf(),
        source,
    };

    let raw: serde_yaml::Value = serde_yaml::from_str(content).map_err(yaml_err)?;
    validate_service_spec(&raw, exists)?;

    // 型レベルの不整合（volumes に文字列以外など）は仕様エラーとして扱う
    let document: SpecDocument = serde_yaml::from_value(raw)
        .map_err(|e| SpecError::SpecMalformed(e.to_string()))?;

    Ok(document.into_resolved(root_directory_path.to_path_buf()))
}
