//! サービス仕様の取得元
//!
//! `SpecSource` はサービス名・URL・ブランチからローカルのチェックアウトを用意する。
//! 標準実装の `GitSource` は git CLI でキャッシュディレクトリ配下に clone/更新する。

use crate::error::{RegistryError, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// サービス仕様の取得元
pub trait SpecSource {
    /// `url` の `branch` を `name` としてチェックアウトし、そのディレクトリを返す
    ///
    /// 同じ引数で何度呼んでもよい。
    fn checkout(
        &self,
        name: &str,
        url: &str,
        branch: &str,
    ) -> impl Future<Output = Result<PathBuf>>;
}

/// git CLI によるチェックアウト
#[derive(Debug, Clone)]
pub struct GitSource {
    cache_dir: PathBuf,
}

impl GitSource {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// git コマンドを実行
    async fn run_git(&self, service: &str, cwd: &Path, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        cmd.current_dir(cwd);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!("Running: git {} (in {})", args.join(" "), cwd.display());

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RegistryError::Checkout {
                service: service.to_string(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// `origin/<branch>` が存在するか（タグやコミットハッシュなら false）
    async fn is_remote_branch(&self, service: &str, dir: &Path, branch: &str) -> bool {
        let remote_ref = format!("refs/remotes/origin/{}", branch);
        self.run_git(service, dir, &["rev-parse", "--verify", "--quiet", &remote_ref])
            .await
            .is_ok()
    }
}

impl SpecSource for GitSource {
    #[tracing::instrument(skip(self), fields(cache_dir = %self.cache_dir.display()))]
    async fn checkout(&self, name: &str, url: &str, branch: &str) -> Result<PathBuf> {
        // git のオプションとして解釈される ref は受け付けない
        if branch.is_empty() || branch.starts_with('-') {
            return Err(RegistryError::Checkout {
                service: name.to_string(),
                message: format!("invalid ref '{}'", branch),
            });
        }

        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let dir = self.cache_dir.join(name);
        if !dir.is_dir() {
            info!("Cloning {} into {}", url, dir.display());
            self.run_git(name, &self.cache_dir, &["clone", "--", url, name])
                .await?;
        }

        self.run_git(name, &dir, &["fetch", "origin", "--tags"])
            .await?;
        self.run_git(name, &dir, &["checkout", branch]).await?;

        if self.is_remote_branch(name, &dir, branch).await {
            let upstream = format!("origin/{}", branch);
            self.run_git(name, &dir, &["merge", "--ff-only", &upstream])
                .await?;
        }

        info!("Checked out {} at {}", name, branch);
        Ok(dir)
    }
}
