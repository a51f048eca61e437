//! コンテナ定義

use serde::{Deserialize, Serialize};

/// コンテナ定義
///
/// stitchが書き換えるフィールドのみ型付けし、それ以外
/// （image, command, environment, working_dir など）は `extra` に
/// そのまま保持して docker-compose へ出力する。
///
/// YAML形式：
/// ```yaml
/// web:
///   image: node:4
///   volumes:
///     - .:/app
///   depends_on:
///     - redis
///   command: [npm, start]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerDef {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
    /// `"8000:8000"` / `"6379"` / `6379` のいずれの形式も許容するため未解釈のまま保持
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl ContainerDef {
    /// `extra` から文字列フィールドを取得（image など）
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }
}
