//! # Cart Transitions
//!
//! The state machine of one (cart, item) pair, without any storage.
//!
//! ```text
//!                scan                      scan
//!   ┌────────┐ ───────► ┌──────────────┐ ───────► q + 1
//!   │ Absent │          │ Present(q≥1) │
//!   └────────┘ ◄─────── └──────────────┘ ───────► q - by   (if > 0)
//!        ▲      remove          │       decrement
//!        └──────────────────────┘
//!          decrement to ≤ 0, clear
//! ```
//!
//! The database layer reads the current state inside a write transaction,
//! asks this module for the next one, and persists it.

use crate::error::{CoreError, CoreResult};
use crate::types::{CartId, ItemId};
use crate::validation::validate_positive;

/// Quantity a line has after one more scan.
///
/// `None` means the line does not exist yet.
pub fn quantity_after_scan(current: Option<i64>) -> i64 {
    match current {
        Some(q) => q + 1,
        None => 1,
    }
}

/// Result of decrementing a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// The line survives with this quantity.
    Updated(i64),

    /// The quantity reached zero or below; the line must be deleted.
    Removed,
}

/// Computes the outcome of removing `by` units from a line.
///
/// ## Errors
/// - `by <= 0` is a validation error, checked before anything else
/// - `current == None` (no such line) is `CartLineNotFound`
///
/// ## Example
/// ```rust
/// use checkout_core::cart::{decrement, Decrement};
/// use checkout_core::CartId;
///
/// let cart = CartId::default();
/// assert_eq!(decrement(&cart, 1, Some(5), 2).unwrap(), Decrement::Updated(3));
/// assert_eq!(decrement(&cart, 1, Some(2), 5).unwrap(), Decrement::Removed);
/// assert!(decrement(&cart, 1, Some(2), 0).is_err());
/// ```
pub fn decrement(
    cart_id: &CartId,
    item_id: ItemId,
    current: Option<i64>,
    by: i64,
) -> CoreResult<Decrement> {
    validate_positive("quantity", by)?;

    let current = current.ok_or_else(|| CoreError::CartLineNotFound {
        cart_id: cart_id.clone(),
        item_id,
    })?;

    let remaining = current - by;
    if remaining <= 0 {
        Ok(Decrement::Removed)
    } else {
        Ok(Decrement::Updated(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_scan_is_monotonic() {
        assert_eq!(quantity_after_scan(None), 1);
        assert_eq!(quantity_after_scan(Some(1)), 2);
        assert_eq!(quantity_after_scan(Some(41)), 42);
    }

    #[test]
    fn test_decrement_updates() {
        let cart = CartId::default();
        assert_eq!(decrement(&cart, 1, Some(3), 1).unwrap(), Decrement::Updated(2));
    }

    #[test]
    fn test_decrement_to_zero_or_below_removes() {
        let cart = CartId::default();
        assert_eq!(decrement(&cart, 1, Some(3), 3).unwrap(), Decrement::Removed);
        assert_eq!(decrement(&cart, 1, Some(3), 10).unwrap(), Decrement::Removed);
    }

    #[test]
    fn test_decrement_rejects_non_positive_amount_first() {
        let cart = CartId::default();

        // Invalid amount wins over a missing line.
        for by in [0, -1] {
            let err = decrement(&cart, 1, None, by).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn test_decrement_missing_line() {
        let cart = CartId::default();
        let err = decrement(&cart, 9, None, 1).unwrap_err();
        assert!(matches!(err, CoreError::CartLineNotFound { item_id: 9, .. }));
    }
}
