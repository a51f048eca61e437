//! Registry ドキュメントの読み込み

use crate::error::Result;
use stitch_config::RegistryLocation;
use stitch_core::SpecError;
use tracing::info;

/// Registry ドキュメントを取得してJSONとしてパース
///
/// URL の場合は HTTP GET、それ以外はローカルファイルとして読む。
#[tracing::instrument(skip(location), fields(registry = %location))]
pub async fn load_registry_document(location: &RegistryLocation) -> Result<serde_json::Value> {
    let content = match location {
        RegistryLocation::Url(url) => {
            info!("Fetching registry from {}", url);
            reqwest::get(url.as_str())
                .await?
                .error_for_status()?
                .text()
                .await?
        }
        RegistryLocation::File(path) => {
            info!("Reading registry from {}", path.display());
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| SpecError::IoError {
                    path: path.clone(),
                    message: e.to_string(),
                })?
        }
    };

    parse_registry_document(&content)
}

/// JSON文字列から Registry ドキュメントをパース
pub fn parse_registry_document(content: &str) -> Result<serde_json::Value> {
    let document = serde_json::from_str(content).map_err(SpecError::from)?;
    Ok(document)
}
