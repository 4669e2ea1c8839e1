//! # checkout-api
//!
//! HTTP front of the checkout: scan items into carts, price them with bulk
//! offers, and administer the inventory.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout API                                     │
//! │                                                                         │
//! │  Client ──► axum Router ──► routes/* ──► services/* ──► checkout-db    │
//! │                 │              │              │              │          │
//! │                 │         extractors     validation       SQLite        │
//! │                 │        (X-Cart-Id)    + pricing via                   │
//! │                 │                       checkout-core                   │
//! │                 ▼                                                       │
//! │             ApiError ──► { "code": "...", "message": "..." }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]. Environment variables:
//! - `CHECKOUT_CONFIG` - TOML config file
//! - `CHECKOUT_BIND_ADDR` / `CHECKOUT_PORT` - listener (default `0.0.0.0:8080`)
//! - `CHECKOUT_DB_PATH` - SQLite file
//! - `CHECKOUT_DB_MAX_CONNECTIONS` - pool size (default 5)
//! - `CHECKOUT_SEED_SAMPLE_DATA` - load the sample inventory when empty
//! - `RUST_LOG` - log filter (default `info,checkout=debug,sqlx=warn`)

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tracing::info;
use tracing_subscriber::EnvFilter;

use checkout_db::{load_sample_data, Database, DbConfig, DbResult};

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::{AppState, SharedState};

/// Builds the application router.
pub fn router(state: SharedState) -> Router {
    routes::routes().with_state(state)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=checkout_db=trace` - Trace the database layer only
/// - Default: `info,checkout=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,checkout=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Opens (and migrates) the database described by `config`, then loads
/// the sample inventory if asked to.
pub async fn open_database(config: &ApiConfig) -> Result<Database, Box<dyn std::error::Error>> {
    let path = config.database_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::new(
        DbConfig::new(path.clone()).max_connections(config.database.max_connections),
    )
    .await?;

    if config.seed.sample_data {
        seed(&db).await?;
    }

    Ok(db)
}

async fn seed(db: &Database) -> DbResult<()> {
    let report = load_sample_data(db).await?;
    if !report.skipped {
        info!(
            items = report.items_created,
            offers = report.offers_created,
            "Sample inventory loaded"
        );
    }
    Ok(())
}
