//! docker-compose の起動

use std::io::ErrorKind;
use std::path::Path;
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::debug;

/// `docker-compose -f <file> up` をフォアグラウンドで実行
///
/// `docker-compose` が見つからない場合は `docker compose` プラグインを使う。
pub async fn compose_up(working_dir: &Path, compose_file: &Path) -> anyhow::Result<()> {
    let file = compose_file.to_string_lossy();
    let args = ["-f", &*file, "up"];

    let status = match run("docker-compose", &[], &args, working_dir).await {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("docker-compose not found, falling back to `docker compose`");
            run("docker", &["compose"], &args, working_dir).await
        }
        other => other,
    }
    .map_err(|e| {
        anyhow::anyhow!(
            "docker-compose を起動できません: {}\n\nヒント:\n  • Docker がインストールされているか確認してください",
            e
        )
    })?;

    if !status.success() {
        anyhow::bail!("docker-compose が異常終了しました ({})", status);
    }

    Ok(())
}

async fn run(
    program: &str,
    prefix: &[&str],
    args: &[&str],
    working_dir: &Path,
) -> std::io::Result<ExitStatus> {
    debug!("Running: {} {} {}", program, prefix.join(" "), args.join(" "));
    Command::new(program)
        .args(prefix)
        .args(args)
        .current_dir(working_dir)
        .status()
        .await
}
