use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fitquest::auth::TokenSigner;
use fitquest::build_info;
use fitquest::config::{Config, StorageKind};
use fitquest::service::GameService;
use fitquest::storage::{JsonFileStore, MemoryStore, PlayerStore};

fn print_help() {
    println!("FitQuest - fitness RPG server\n");
    println!("Usage: fitquest [command] [options]\n");
    println!("Commands:");
    println!("  serve            Run the HTTP server (default)");
    println!("\nOptions:");
    println!("  --config PATH    Read settings from a TOML file");
    println!("  --version        Show version information");
    println!("  --help           Show this help message");
    println!("\nEnvironment:");
    println!("  FITQUEST_BIND, FITQUEST_DATA_DIR, FITQUEST_STORAGE, FITQUEST_TOKEN_SECRET");
    println!("  RUST_LOG         Log filter (default: info)");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config_path: Option<PathBuf> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "serve" => {}
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                let path = iter.next().context("--config needs a path")?;
                config_path = Some(PathBuf::from(path));
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run 'fitquest --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match &config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => Config::default(),
    }
    .with_env();

    let store: Arc<dyn PlayerStore> = match config.storage {
        StorageKind::Json => {
            let dir = config.data_dir().context("no data directory available")?;
            let store = JsonFileStore::open(&dir)
                .with_context(|| format!("failed to open {}", dir.display()))?;
            info!(dir = %dir.display(), "using json player store");
            Arc::new(store)
        }
        StorageKind::Memory => {
            info!("using in-memory player store; nothing will persist");
            Arc::new(MemoryStore::new())
        }
    };

    let service = GameService::new(store, TokenSigner::new(config.token_secret_bytes()));
    info!(version = %build_info::version_line(), "starting");
    run(&config.bind, Arc::new(service))
}

#[cfg(feature = "web")]
fn run(bind: &str, service: Arc<GameService>) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(fitquest::web::serve(bind, service))
}

#[cfg(not(feature = "web"))]
fn run(_bind: &str, _service: Arc<GameService>) -> anyhow::Result<()> {
    anyhow::bail!("built without the `web` feature; rebuild with --features web to serve")
}
