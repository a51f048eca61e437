use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Registry と複数サービスのディレクトリを持つ一時ワークスペース
pub struct TestWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        // macOS の /var → /private/var に合わせて正規化
        let root = temp.path().canonicalize().unwrap();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn write_registry(&self, content: &str) -> PathBuf {
        let path = self.root.join("services.json");
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_service(&self, dir: &str, spec: &str) -> PathBuf {
        let path = self.root.join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("stitch.yml"), spec).unwrap();
        path
    }

    /// `dir` をカレントディレクトリとして stitch を実行するコマンド
    #[allow(deprecated)]
    pub fn stitch(&self, dir: &str) -> Command {
        let mut cmd = Command::cargo_bin("stitch").unwrap();
        cmd.current_dir(self.root.join(dir))
            .env_remove("STITCH_REGISTRY")
            .env("STITCH_CACHE_DIR", self.root.join("cache"))
            .env("NO_COLOR", "1");
        cmd
    }
}
