//! マイクロサービス仕様定義

use super::container::ContainerDef;
use super::public::PublicExposure;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// 解決済みのマイクロサービス仕様
///
/// YAML形式（stitch.yml）：
/// ```yaml
/// namespace: cds
/// public: web:1337
/// services:
///   web:
///     image: node:4
///     depends_on: [redis]
///   redis:
///     image: redis
/// dependencies:
///   - feature-flags
/// setup:
///   - npm install
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSpec {
    pub namespace: String,
    pub public_exposure: Option<PublicExposure>,
    pub containers: BTreeMap<String, ContainerDef>,
    pub dependencies: Vec<String>,
    pub setup_steps: Vec<String>,
    /// 解決されたチェックアウトのパス（ボリュームの相対パス解決に使用）
    pub root_directory_path: PathBuf,
}

impl ResolvedSpec {
    /// 指定コンテナが公開コンテナか
    pub fn is_public(&self, container: &str) -> bool {
        self.public_exposure
            .as_ref()
            .is_some_and(|p| p.container == container)
    }
}

/// `public` はスカラーと要素1つのリストのどちらでも書ける
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PublicField {
    One(String),
    Many(Vec<String>),
}

/// バリデーション済みYAMLのデシリアライズ先
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SpecDocument {
    pub namespace: String,
    #[serde(default)]
    pub public: Option<PublicField>,
    pub services: BTreeMap<String, ContainerDef>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub setup: Vec<String>,
}

impl SpecDocument {
    pub(crate) fn into_resolved(self, root_directory_path: PathBuf) -> ResolvedSpec {
        let public_exposure = match self.public {
            Some(PublicField::One(s)) => PublicExposure::parse(&s),
            Some(PublicField::Many(list)) => list.first().and_then(|s| PublicExposure::parse(s)),
            None => None,
        };

        ResolvedSpec {
            namespace: self.namespace,
            public_exposure,
            containers: self.services,
            dependencies: self.dependencies,
            setup_steps: self.setup,
            root_directory_path,
        }
    }
}
