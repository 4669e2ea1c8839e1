//! # checkout-core: Pure Business Logic for the Checkout
//!
//! Pricing, cart transitions and input validation as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 checkout-api (axum routes)                      │   │
//! │  │     /cart/scan, /cart/total, /items, /offers, ...               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ checkout-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │   cart    │  │ validation│  │   │
//! │  │   │   Item    │  │ price_line│  │ scan/dec  │  │   rules   │  │   │
//! │  │   │   Offer   │  │   total   │  │transitions│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  checkout-db (Database Layer)                   │   │
//! │  │           SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Offer, CartLine, CartId)
//! - [`money`] - Money type with integer arithmetic
//! - [`pricing`] - Bulk offer pricing engine
//! - [`cart`] - Cart line state transitions
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use checkout_core::pricing::price_line;
//! use checkout_core::{Money, OfferTerms};
//!
//! // Apple: 30 each, or 2 for 45
//! let apples = price_line(Money::from_cents(30), 3, Some(OfferTerms::new(2, Money::from_cents(45))));
//! assert_eq!(apples.cents(), 75);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use pricing::{CartSummary, LinePricing, PricedLine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Key of the cart used when a client does not name one.
///
/// A single-lane deployment only ever touches this cart.
pub const DEFAULT_CART_ID: &str = "default";

/// Longest accepted cart key.
pub const MAX_CART_ID_LENGTH: usize = 64;

/// Longest accepted item name, in characters.
pub const MAX_ITEM_NAME_LENGTH: usize = 200;

/// Highest accepted price, in minor units.
///
/// Keeps `quantity × price` comfortably inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;
