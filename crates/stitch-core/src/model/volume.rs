//! ボリューム定義

use std::path::{Component, Path, PathBuf};

/// `hostPath:containerPath[:mode]` 形式のボリューム指定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub host: String,
    /// 最初の `:` 以降（コンテナ側パスとモード）。書き換え対象外
    pub rest: String,
}

impl VolumeMount {
    /// ホスト側パスを持たない指定（匿名ボリューム）は `None`
    pub fn parse(s: &str) -> Option<Self> {
        let (host, rest) = s.split_once(':')?;
        Some(Self {
            host: host.to_string(),
            rest: rest.to_string(),
        })
    }

    /// ホームディレクトリ相対（`~`, `~/...`）か
    pub fn is_home_relative(&self) -> bool {
        self.host == "~" || self.host.starts_with("~/")
    }

    /// ホスト側パスを解決
    ///
    /// 絶対パスとホーム相対はそのまま。それ以外は `bases` を順に適用し、
    /// 絶対パスになった時点で正規化して返す。
    pub fn resolve_host(&self, bases: &[&Path]) -> String {
        let host = Path::new(&self.host);
        if host.is_absolute() || self.is_home_relative() {
            return self.host.clone();
        }

        let mut resolved = host.to_path_buf();
        for base in bases {
            if resolved.is_absolute() {
                break;
            }
            resolved = base.join(&resolved);
        }
        normalize_path(&resolved).display().to_string()
    }

    pub fn to_spec_string(&self) -> String {
        format!("{}:{}", self.host, self.rest)
    }
}

/// `.` と `..` を字句的に除去する（シンボリックリンクは辿らない）
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // ルートより上には行けない
                Some(Component::RootDir | Component::Prefix(_)) => {}
                // 空、または先頭の `..` が続く相対パス
                Some(Component::ParentDir | Component::CurDir) | None => {
                    normalized.push("..");
                }
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}
