//! # Core Error Types
//!
//! Domain errors for the checkout. Every variant falls into one of three
//! buckets the outer layers map to responses:
//!
//! ```text
//! ┌───────────────────────────┬──────────────────┬────────┐
//! │ Variant                   │ Kind             │ HTTP   │
//! ├───────────────────────────┼──────────────────┼────────┤
//! │ ItemNotFound              │ NotFound         │ 404    │
//! │ OfferNotFound             │ NotFound         │ 404    │
//! │ CartLineNotFound          │ NotFound         │ 404    │
//! │ Validation(..)            │ InvalidArgument  │ 400    │
//! │ OfferAlreadyExists        │ Conflict         │ 409    │
//! └───────────────────────────┴──────────────────┴────────┘
//! ```

use thiserror::Error;

use crate::types::{CartId, ItemId, OfferId};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No item with this id exists in the inventory.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// No offer with this id exists.
    #[error("Offer not found: {0}")]
    OfferNotFound(OfferId),

    /// The cart holds no line for this item.
    ///
    /// ## When This Occurs
    /// - Removing an item that was never scanned
    /// - Decrementing a line that a previous decrement already deleted
    #[error("Item {item_id} is not in cart {cart_id}")]
    CartLineNotFound { cart_id: CartId, item_id: ItemId },

    /// An item can carry at most one bulk offer.
    #[error("Item {item_id} already has an offer")]
    OfferAlreadyExists { item_id: ItemId },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    Conflict,
}

impl CoreError {
    /// Returns the error bucket used for response mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ItemNotFound(_)
            | CoreError::OfferNotFound(_)
            | CoreError::CartLineNotFound { .. } => ErrorKind::NotFound,
            CoreError::OfferAlreadyExists { .. } => ErrorKind::Conflict,
            CoreError::Validation(_) => ErrorKind::InvalidArgument,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the service boundary before any state is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. a cart key with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
