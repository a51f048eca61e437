mod commands;
mod launch;
mod setup;

use clap::Parser;
use std::path::PathBuf;
use stitch_compose::DEFAULT_BASE_PORT;

#[derive(Parser)]
#[command(name = "stitch")]
#[command(
    about = "Launch the microservice in the current directory with its dependencies, mocking everything you are not working on",
    long_about = None,
    version
)]
struct Cli {
    /// 実サービスとして起動するサービス（`name` または `name#ref`、カンマ区切り可）
    #[arg(short = 'w', long = "with", value_name = "SERVICE[#REF]", value_delimiter = ',')]
    with: Vec<String>,

    /// ローカルのチェックアウトを使うサービスのディレクトリ
    #[arg(short = 'l', long = "link", value_name = "PATH")]
    link: Vec<PathBuf>,

    /// Registry の場所（URL またはファイルパス）
    #[arg(short = 'r', long = "registry", value_name = "URI", env = "STITCH_REGISTRY")]
    registry: Option<String>,

    /// docker-compose.yml を生成するだけで起動しない
    #[arg(short = 'g', long)]
    generate: bool,

    /// git チェックアウトのキャッシュディレクトリ
    #[arg(long = "cache-dir", value_name = "DIR", env = "STITCH_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// 公開コンテナに割り当てる最初のホストポート
    #[arg(long = "base-port", value_name = "PORT", default_value_t = DEFAULT_BASE_PORT)]
    base_port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = commands::up::UpOptions {
        with: cli.with,
        links: cli.link,
        registry: cli.registry,
        generate_only: cli.generate,
        cache_dir: cli.cache_dir,
        base_port: cli.base_port,
    };

    commands::up::handle(options).await
}
