use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use timer_sounds_core::logging::{self, LogPolicy};
use timer_sounds_core::{AssetStore, FsAssetStore, MemoryAssetStore, StoredConfig};
use timer_sounds_server::{AppState, build_router};
use timer_sounds_types::ServerConfig;

#[derive(Parser)]
#[command(version, about = "Timer Sounds asset store service")]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Directory holding uploaded sounds
    #[arg(short, long)]
    upload_dir: Option<PathBuf>,

    /// Keep sounds in memory instead of on disk
    #[arg(long)]
    in_memory: bool,
}

impl Args {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(dir) = &self.upload_dir {
            config.upload_dir = dir.to_string_lossy().into_owned();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let _log_guard = logging::init(LogPolicy::SERVER);

    let mut config = ServerConfig::load();
    args.apply(&mut config);

    let store: Arc<dyn AssetStore> = if args.in_memory {
        tracing::warn!("using in-memory store, uploads will not survive a restart");
        Arc::new(MemoryAssetStore::new())
    } else {
        let store = FsAssetStore::open(&config.upload_dir).await?;
        tracing::info!(root = %store.root().display(), "serving sounds from disk");
        Arc::new(store)
    };

    let app = build_router(AppState::new(store, &config));

    // Hostnames like `localhost` resolve here, not just literal addresses
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        max_files = config.max_files_per_upload,
        "server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
