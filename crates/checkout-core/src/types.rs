//! # Domain Types
//!
//! Core entities of the checkout.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Item 1 ───────── 0..1 Offer        (at most one bulk offer per item)  │
//! │     │                                                                   │
//! │     │ 0..1 per cart                                                     │
//! │     ▼                                                                   │
//! │   CartLine ─────── CartId            (one line per (cart, item))        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are stored as `*_cents: i64` columns and exposed as [`Money`]
//! through accessor methods, the same way the database stores them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::validation::{validate_cart_id, ValidationResult};
use crate::DEFAULT_CART_ID;

/// Identifier of an [`Item`].
pub type ItemId = i64;

/// Identifier of an [`Offer`].
pub type OfferId = i64;

// =============================================================================
// Cart Key
// =============================================================================

/// Key of a cart aggregate.
///
/// Several checkout lanes (or browser sessions) can run side by side, each
/// with its own key. [`CartId::default`] is the shared cart used when a
/// client does not say which one it wants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct CartId(String);

impl CartId {
    /// Parses and validates a client-supplied cart key.
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::CartId;
    ///
    /// assert!(CartId::parse("lane-3").is_ok());
    /// assert!(CartId::parse("lane 3").is_err());
    /// ```
    pub fn parse(key: &str) -> ValidationResult<Self> {
        validate_cart_id(key).map(CartId)
    }

    /// Generates a fresh random cart key.
    pub fn generate() -> Self {
        CartId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CartId {
    fn default() -> Self {
        CartId(DEFAULT_CART_ID.to_string())
    }
}

impl fmt::Display for CartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A purchasable item in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Item {
    pub id: ItemId,

    /// Display name, trimmed and never empty.
    pub name: String,

    /// Unit price in minor units (never negative).
    pub unit_price_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Returns the unit price as Money.
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Offer
// =============================================================================

/// A bulk offer: `quantity` units of one item for `total_price_cents`.
///
/// ## Example
/// "Apples: 2 for 45" is `Offer { quantity: 2, total_price_cents: 45, .. }`.
/// Whether the offer is actually cheaper than buying singles is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Offer {
    pub id: OfferId,

    /// The one item this offer applies to.
    pub item_id: ItemId,

    /// Bulk group size N (always > 0).
    pub quantity: i64,

    /// Price P for one full group (never negative).
    pub total_price_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Offer {
    /// Returns the pricing terms of this offer.
    pub fn terms(&self) -> OfferTerms {
        OfferTerms::new(self.quantity, Money::from_cents(self.total_price_cents))
    }
}

/// The part of an offer the pricing engine needs: "N for P".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OfferTerms {
    /// Group size N.
    pub quantity: i64,

    /// Group price P.
    pub total_price: Money,
}

impl OfferTerms {
    pub const fn new(quantity: i64, total_price: Money) -> Self {
        OfferTerms {
            quantity,
            total_price,
        }
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One (cart, item) entry with its scanned quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CartLine {
    pub id: i64,
    pub cart_id: CartId,
    pub item_id: ItemId,

    /// Always >= 1 while the line exists.
    pub quantity: i64,

    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with its item and the item's current offer.
///
/// This is the read model the pricing engine works on: everything needed
/// to price the line lives in one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLineView {
    pub line_id: i64,
    pub cart_id: CartId,
    pub item: Item,
    pub quantity: i64,
    pub offer: Option<OfferTerms>,
}
