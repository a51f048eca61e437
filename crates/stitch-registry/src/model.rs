//! Registry エントリのデータモデル

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use stitch_core::ResolvedSpec;

/// `branch` 省略時のブランチ
pub const DEFAULT_BRANCH: &str = "master";

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

/// Registry に登録されたサービス
///
/// JSON形式（services.json）：
/// ```json
/// {
///   "cds": {
///     "git": "git@github.com:example/cds.git",
///     "root": "app",
///     "branch": "develop",
///     "mocks": { "root": "mocks" },
///     "environments": { "staging": "https://cds.staging.example.com" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryEntry {
    #[serde(rename = "git", default)]
    pub source_url: Option<String>,

    /// チェックアウト内のサブディレクトリ
    #[serde(rename = "root", default)]
    pub root_subpath: Option<String>,

    #[serde(rename = "branch", default = "default_branch")]
    pub default_branch: String,

    #[serde(rename = "mocks", default)]
    pub mock_overrides: Option<MockOverrides>,

    /// 環境名 → URL
    #[serde(rename = "environments", default)]
    pub endpoints: BTreeMap<String, String>,

    /// `link` で設定されたローカルパス
    #[serde(skip)]
    pub path_override: Option<PathBuf>,

    #[serde(skip)]
    pub cached_spec: Option<Arc<ResolvedSpec>>,
}

impl Default for RegistryEntry {
    fn default() -> Self {
        Self {
            source_url: None,
            root_subpath: None,
            default_branch: default_branch(),
            mock_overrides: None,
            endpoints: BTreeMap::new(),
            path_override: None,
            cached_spec: None,
        }
    }
}

/// `mocks` セクション。指定されたフィールドだけがベースエントリを上書きする
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MockOverrides {
    #[serde(default)]
    pub git: Option<String>,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
}

impl RegistryEntry {
    /// `mocks` セクションからモック用エントリを合成する
    ///
    /// `mocks` がなければ `None`。
    pub fn synthesize_mock(&self) -> Option<RegistryEntry> {
        let mocks = self.mock_overrides.as_ref()?;

        Some(RegistryEntry {
            source_url: mocks.git.clone().or_else(|| self.source_url.clone()),
            root_subpath: mocks.root.clone().or_else(|| self.root_subpath.clone()),
            default_branch: mocks
                .branch
                .clone()
                .unwrap_or_else(|| self.default_branch.clone()),
            mock_overrides: None,
            endpoints: BTreeMap::new(),
            path_override: None,
            cached_spec: None,
        })
    }
}
