//! # Application State
//!
//! One shared value handed to every handler through axum's `State`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  Router::with_state(Arc<AppState>)                                      │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  ┌──────────────────────────────┐                                       │
//! │  │  AppState                    │                                       │
//! │  │  db:     Database (pool)     │──► carts() / items() / offers()       │
//! │  │  config: ApiConfig           │    build a service per request        │
//! │  └──────────────────────────────┘                                       │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Database: internal connection pool, clones share it                 │
//! │  • Config: read-only after startup                                     │
//! │  • Cart state lives in SQLite, not in memory                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use checkout_db::Database;

use crate::config::ApiConfig;
use crate::services::{CartService, ItemService, OfferService};

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
}

/// Handle stored in the router.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState { db, config }
    }

    /// Wraps the state for `Router::with_state`.
    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }

    pub fn carts(&self) -> CartService {
        CartService::new(self.db.clone())
    }

    pub fn items(&self) -> ItemService {
        ItemService::new(self.db.clone())
    }

    pub fn offers(&self) -> OfferService {
        OfferService::new(self.db.clone())
    }
}
