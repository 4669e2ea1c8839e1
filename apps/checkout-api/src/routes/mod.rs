//! HTTP routes.
//!
//! ```text
//! /cart/*     cart.rs     scan, contents, total, summary, remove, decrease, clear
//! /items/*    items.rs    inventory CRUD
//! /offers/*   offers.rs   bulk offer CRUD
//! /health     health.rs   liveness + database check
//! ```

pub mod cart;
pub mod dto;
pub mod extract;
pub mod health;
pub mod items;
pub mod offers;

use axum::Router;

use crate::state::SharedState;

/// Every route of the API, without state.
pub fn routes() -> Router<SharedState> {
    Router::new()
        .merge(cart::router())
        .merge(items::router())
        .merge(offers::router())
        .merge(health::router())
}
