//! サービス参照定義

use std::fmt;

/// 論理サービス名 + 任意のgit ref上書き
///
/// コマンドラインで `foo` または `foo#branch` の形式で指定される。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceReference {
    pub name: String,
    pub ref_override: Option<String>,
}

impl ServiceReference {
    /// ref上書きを持たない参照を作成
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ref_override: None,
        }
    }

    /// `name#ref` 形式の文字列をパース
    ///
    /// 最初の `#` で分割し、空のrefは上書きなしとして扱う。
    pub fn parse(s: &str) -> Self {
        match s.trim().split_once('#') {
            Some((name, git_ref)) => {
                let git_ref = git_ref.trim();
                Self {
                    name: name.trim().to_string(),
                    ref_override: (!git_ref.is_empty()).then(|| git_ref.to_string()),
                }
            }
            None => Self::bare(s.trim()),
        }
    }
}

impl fmt::Display for ServiceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ref_override {
            Some(git_ref) => write!(f, "{}#{}", self.name, git_ref),
            None => write!(f, "{}", self.name),
        }
    }
}
