use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use lrag_pipeline::{HashEmbedder, RagPipeline};
use lrag_store::{connect_store, StoreConfig};

#[derive(Parser)]
#[command(name = "lrag")]
#[command(about = "Minimal retrieval-and-answer HTTP service", long_about = None)]
struct Cli {
    /// Address to bind the HTTP server to (host:port)
    #[arg(long, env = "LRAG_BIND", default_value = "127.0.0.1:8000")]
    bind: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Components are built once here and shared by every request
    let config = StoreConfig::from_env()?;
    let store = Arc::new(connect_store(&config).await);
    let embedder = Arc::new(HashEmbedder::new(config.dimension));
    let pipeline = Arc::new(RagPipeline::new(embedder, store.clone())?);

    tracing::info!(
        backend = store.backend_name(),
        dimension = config.dimension,
        "document store ready"
    );

    let addr: SocketAddr = cli
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", cli.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("lrag listening on http://{addr}");
    lrag_server::serve(listener, pipeline)
        .await
        .context("server shutdown")?;

    Ok(())
}

/// `RUST_LOG` wins when set; otherwise the verbosity flags pick the level.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
