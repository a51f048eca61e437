//! docker-compose 記述子

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use stitch_core::ContainerDef;
use tracing::info;

/// 出力する docker-compose のファイルフォーマットバージョン
pub const COMPOSE_VERSION: &str = "2";

/// 出力ファイル名
pub const COMPOSE_FILENAME: &str = "docker-compose.yml";

/// マージ済みの docker-compose 記述子
///
/// ```yaml
/// version: '2'
/// services:
///   cds:
///     image: node:4
///     networks: [default, cds_net]
///     ports: ['3000:1337']
///   cds_redis:
///     image: redis
///     networks: [cds_net]
/// networks:
///   cds_net: {}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyDescriptor {
    pub version: String,
    /// 名前空間付きコンテナ名 → コンテナ定義
    pub services: BTreeMap<String, ContainerDef>,
    pub networks: BTreeMap<String, NetworkConfig>,
}

/// ネットワーク定義（常に空）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {}

impl Default for TopologyDescriptor {
    fn default() -> Self {
        Self {
            version: COMPOSE_VERSION.to_string(),
            services: BTreeMap::new(),
            networks: BTreeMap::new(),
        }
    }
}

impl TopologyDescriptor {
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// `<dir>/docker-compose.yml` に書き出してパスを返す
    pub fn write_compose_file(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(COMPOSE_FILENAME);
        std::fs::write(&path, self.to_yaml()?)?;
        info!(
            path = %path.display(),
            services = self.services.len(),
            networks = self.networks.len(),
            "Wrote compose file"
        );
        Ok(path)
    }
}
