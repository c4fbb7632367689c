//! Shared notes web application.
//!
//! A small note board served over HTTP, persisted in SQLite.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ security gate ──▶ note handlers ──▶ note store
//!                     (request id,    (throttle,         │                 (SQLite)
//!                      timeout,        route match,      │
//!                      body limit)     form token)       ├──▶ render (pages, links)
//!                                                        └──▶ paste exporter
//!     Client Response                                         (optional)
//!     ◀────────────── HTML page, redirect or error status
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use share_notes::config::{load_config, NotesConfig};
use share_notes::export::{HttpPasteExporter, PasteExporter};
use share_notes::notes::{NoteStore, SqliteNoteStore};
use share_notes::observability::{logging, metrics};
use share_notes::{HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "share-notes", about = "Shared notes web application")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => NotesConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("share-notes v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.store.database_path,
        throttle_ns = config.throttle.min_interval_ns,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store: Arc<dyn NoteStore> = Arc::new(SqliteNoteStore::open(&config.store.database_path)?);

    let exporter: Option<Arc<dyn PasteExporter>> = if config.paste.enabled {
        Some(Arc::new(HttpPasteExporter::new(&config.paste)?))
    } else {
        tracing::info!("Paste export disabled");
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store, exporter);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
