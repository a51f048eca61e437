use crate::launch;
use crate::setup;
use colored::Colorize;
use std::path::{Path, PathBuf};
use stitch_compose::TopologyGenerator;
use stitch_config::{get_cache_dir, resolve_registry_location};
use stitch_core::ServiceReference;
use stitch_registry::{GitSource, ServiceRegistry, load_registry_document};

/// コマンドライン引数から組み立てた起動オプション
#[derive(Debug, Clone)]
pub struct UpOptions {
    /// `name` または `name#ref`
    pub with: Vec<String>,
    pub links: Vec<PathBuf>,
    pub registry: Option<String>,
    pub generate_only: bool,
    pub cache_dir: Option<PathBuf>,
    pub base_port: u16,
}

/// カレントディレクトリのサービスを依存サービスと一緒に起動する
///
/// 1. Registry の読み込み
/// 2. カレントディレクトリと `--link` のディレクトリをリンク
/// 3. docker-compose.yml の生成
/// 4. セットアップステップの実行と docker-compose up（`--generate` なら省略）
pub async fn handle(options: UpOptions) -> anyhow::Result<()> {
    let working_dir = std::env::current_dir()?;

    let location = resolve_registry_location(options.registry.as_deref())?;
    let cache_dir = get_cache_dir(options.cache_dir.clone())?;
    tracing::debug!(registry = %location, cache_dir = %cache_dir.display(), "Starting");

    let document = load_registry_document(&location).await?;
    let mut registry = ServiceRegistry::new(&document, GitSource::new(cache_dir))?;

    let launching = ServiceReference::bare(registry.link(Path::new("."))?);
    println!("サービス: {}", launching.name.cyan());

    for path in &options.links {
        let name = registry.link(path)?;
        println!(
            "{}",
            format!("Linked '{}' to {}.", name, path.display()).green()
        );
    }

    let real: Vec<ServiceReference> = options
        .with
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| ServiceReference::parse(s))
        .collect();

    let generator = TopologyGenerator::new(&working_dir).with_base_port(options.base_port);
    let descriptor = generator
        .generate(&mut registry, &launching, &real)
        .await?;
    let compose_file = descriptor.write_compose_file(&working_dir)?;

    println!();
    println!(
        "{}",
        format!("コンテナ一覧 ({} 個):", descriptor.services.len()).bold()
    );
    for (name, container) in &descriptor.services {
        let ports = container
            .ports
            .iter()
            .filter_map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if ports.is_empty() {
            println!("  • {}", name.cyan());
        } else {
            println!("  • {} ({})", name.cyan(), ports);
        }
    }
    println!(
        "{} {}",
        "✓".green(),
        format!("{} を生成しました", compose_file.display()).bold()
    );

    if options.generate_only {
        return Ok(());
    }

    let mut requested = Vec::with_capacity(real.len() + 1);
    requested.push(launching.clone());
    requested.extend(real.iter().cloned());

    let mut traversal = registry.walk(&requested);
    while let Some(visit) = traversal.next().await? {
        setup::run_setup_steps(&visit.name, &visit.spec).await?;
    }

    println!();
    println!("{}", "docker-compose を起動中...".blue());
    launch::compose_up(&working_dir, &compose_file).await
}
