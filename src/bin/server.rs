//! Stockpile document store server.
//!
//! Stores JSON documents on disk, one file per document, and exposes the
//! get/set/delete-by-key and list-all operations the stockpile client
//! needs.
//!
//! # Configuration
//!
//! Environment variables:
//! - `STOCKPILE_PORT`: Port to listen on (default: 8080)
//! - `STOCKPILE_DATA_DIR`: Directory to store documents
//!   (default: ~/.local/share/stockpile-server)
//!
//! # Endpoints
//!
//! - `GET /health`: Health check
//! - `GET /collections/{collection}/documents`: List a collection
//! - `GET /collections/{collection}/documents/{key}`: Fetch a document
//! - `PUT /collections/{collection}/documents/{key}`: Upsert a document
//! - `DELETE /collections/{collection}/documents/{key}`: Delete a document

use std::net::SocketAddr;
use std::path::PathBuf;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockpile::server::{router, FileStorage};

/// Server configuration.
#[derive(Debug, Clone)]
struct Config {
    /// Port to listen on
    port: u16,
    /// Directory to store documents
    data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    fn from_env() -> Self {
        let port = std::env::var("STOCKPILE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let data_dir = std::env::var("STOCKPILE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("stockpile-server")
            });

        Self { port, data_dir }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockpile=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();

    // Ensure data directory exists
    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        tracing::error!("Failed to create data directory: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Data directory: {}", config.data_dir.display());

    let storage = FileStorage::new(config.data_dir);
    let app = router(storage).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
