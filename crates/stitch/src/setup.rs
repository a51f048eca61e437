//! サービスのセットアップステップ実行
//!
//! 各サービスの `setup` に書かれたシェルコマンドを、サービスのルートディレクトリで順に実行する。

use colored::Colorize;
use std::time::Instant;
use stitch_core::ResolvedSpec;
use tokio::process::Command;

/// `spec.setup_steps` を `sh -c` で順に実行。失敗したら中断
pub async fn run_setup_steps(name: &str, spec: &ResolvedSpec) -> anyhow::Result<()> {
    if spec.setup_steps.is_empty() {
        return Ok(());
    }

    println!();
    println!("{}", format!("▶ {} のセットアップ", name).green().bold());

    for step in &spec.setup_steps {
        println!("  → {}", step.cyan());
        let started = Instant::now();

        let status = Command::new("sh")
            .arg("-c")
            .arg(step)
            .current_dir(&spec.root_directory_path)
            .status()
            .await?;

        if !status.success() {
            anyhow::bail!(
                "セットアップに失敗しました: サービス '{}' のステップ '{}' ({})",
                name,
                step,
                status
            );
        }

        println!(
            "  {} 完了 ({:.1}s)",
            "✓".green(),
            started.elapsed().as_secs_f64()
        );
    }

    Ok(())
}
