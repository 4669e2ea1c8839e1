//! # Cart Service
//!
//! Cart operations for one cart key.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐   scan    ┌──────────┐   total / summary                  │
//! │  │  Empty   │──────────►│ In Cart  │──────────────────► priced live     │
//! │  │  Cart    │           │          │                                    │
//! │  └──────────┘           └──────────┘                                    │
//! │       ▲                   │      │                                      │
//! │       │              scan │      │ remove_line                          │
//! │       │          decrement│      │ decrement to ≤ 0                     │
//! │       │                   ▼      ▼                                      │
//! │       └──────────────── clear ◄──┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are computed on read from the current item prices and offers.

use tracing::{debug, info};

use checkout_core::pricing::{self, CartSummary};
use checkout_core::validation::validate_positive;
use checkout_core::{CartId, CartLineView, ItemId, Money};
use checkout_db::{Database, DecrementOutcome};

use crate::error::ApiResult;

/// Cart operations.
#[derive(Debug, Clone)]
pub struct CartService {
    db: Database,
}

impl CartService {
    pub fn new(db: Database) -> Self {
        CartService { db }
    }

    /// Adds one unit of an item to the cart.
    ///
    /// ## Returns
    /// * `Ok(line)` - The line after the scan
    /// * `Err(NOT_FOUND)` - Unknown item; the cart is unchanged
    pub async fn scan(&self, cart_id: &CartId, item_id: ItemId) -> ApiResult<CartLineView> {
        let line = self.db.carts().scan(cart_id, item_id).await?;
        info!(cart_id = %cart_id, item_id, quantity = line.quantity, "Item scanned");
        Ok(line)
    }

    /// Lists the cart's lines in scan order.
    pub async fn contents(&self, cart_id: &CartId) -> ApiResult<Vec<CartLineView>> {
        let lines = self.db.carts().contents(cart_id).await?;
        debug!(cart_id = %cart_id, lines = lines.len(), "Fetched cart contents");
        Ok(lines)
    }

    /// Amount due for the cart. Zero when empty.
    pub async fn total(&self, cart_id: &CartId) -> ApiResult<Money> {
        let lines = self.db.carts().contents(cart_id).await?;
        let total: Money = lines.iter().map(CartLineView::line_total).sum();
        debug!(cart_id = %cart_id, %total, "Computed cart total");
        Ok(total)
    }

    /// Receipt-style breakdown of the cart.
    pub async fn summary(&self, cart_id: &CartId) -> ApiResult<CartSummary> {
        let lines = self.db.carts().contents(cart_id).await?;
        Ok(pricing::summarize(&lines))
    }

    /// Deletes the whole line for an item.
    pub async fn remove_line(&self, cart_id: &CartId, item_id: ItemId) -> ApiResult<()> {
        self.db.carts().remove_line(cart_id, item_id).await?;
        info!(cart_id = %cart_id, item_id, "Cart line removed");
        Ok(())
    }

    /// Removes `by` units of an item.
    ///
    /// ## Returns
    /// * `Ok(DecrementOutcome::Updated(line))` - The line survives
    /// * `Ok(DecrementOutcome::Removed)` - The line was deleted
    /// * `Err(VALIDATION_ERROR)` - `by <= 0`; nothing is read or written
    /// * `Err(NOT_FOUND)` - The cart has no line for this item
    pub async fn decrement(
        &self,
        cart_id: &CartId,
        item_id: ItemId,
        by: i64,
    ) -> ApiResult<DecrementOutcome> {
        validate_positive("quantity", by)?;

        let outcome = self.db.carts().decrement(cart_id, item_id, by).await?;
        match &outcome {
            DecrementOutcome::Updated(line) => {
                info!(cart_id = %cart_id, item_id, by, quantity = line.quantity, "Cart line decremented")
            }
            DecrementOutcome::Removed => {
                info!(cart_id = %cart_id, item_id, by, "Cart line decremented to zero and removed")
            }
        }
        Ok(outcome)
    }

    /// Empties the cart. Idempotent.
    pub async fn clear(&self, cart_id: &CartId) -> ApiResult<u64> {
        let removed = self.db.carts().clear(cart_id).await?;
        info!(cart_id = %cart_id, removed, "Cart cleared");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use checkout_db::DbConfig;

    async fn setup() -> (CartService, ItemId, ItemId) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let apple = db.items().insert("Apple", 30).await.unwrap();
        let banana = db.items().insert("Banana", 50).await.unwrap();
        db.offers().insert(apple.id, 2, 45).await.unwrap();
        (CartService::new(db), apple.id, banana.id)
    }

    #[tokio::test]
    async fn test_scenario_total() {
        let (carts, apple, banana) = setup().await;
        let cart = CartId::default();

        for _ in 0..3 {
            carts.scan(&cart, apple).await.unwrap();
        }
        carts.scan(&cart, banana).await.unwrap();

        assert_eq!(carts.total(&cart).await.unwrap(), Money::from_cents(125));

        let summary = carts.summary(&cart).await.unwrap();
        assert_eq!(summary.total, Money::from_cents(125));
        assert_eq!(summary.regular_total, Money::from_cents(140));
        assert_eq!(summary.savings, Money::from_cents(15));
        assert_eq!(summary.line_count, 2);
        assert_eq!(summary.total_quantity, 4);
    }

    #[tokio::test]
    async fn test_empty_cart_totals_zero() {
        let (carts, _, _) = setup().await;
        let cart = CartId::generate();
        assert_eq!(carts.total(&cart).await.unwrap(), Money::zero());
        assert!(carts.contents(&cart).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_item_scan_leaves_cart_unchanged() {
        let (carts, apple, _) = setup().await;
        let cart = CartId::default();
        carts.scan(&cart, apple).await.unwrap();

        let err = carts.scan(&cart, 999).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let lines = carts.contents(&cart).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_decrement_rules() {
        let (carts, apple, banana) = setup().await;
        let cart = CartId::default();
        for _ in 0..3 {
            carts.scan(&cart, apple).await.unwrap();
        }

        for bad in [0, -1] {
            let err = carts.decrement(&cart, apple, bad).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }
        // Rejected before the lookup, even for a line that does not exist.
        let err = carts.decrement(&cart, banana, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        match carts.decrement(&cart, apple, 1).await.unwrap() {
            DecrementOutcome::Updated(line) => assert_eq!(line.quantity, 2),
            DecrementOutcome::Removed => panic!("line should survive"),
        }

        let outcome = carts.decrement(&cart, apple, 5).await.unwrap();
        assert_eq!(outcome, DecrementOutcome::Removed);

        let err = carts.decrement(&cart, apple, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let (carts, apple, banana) = setup().await;
        let cart = CartId::default();
        carts.scan(&cart, apple).await.unwrap();
        carts.scan(&cart, banana).await.unwrap();

        carts.remove_line(&cart, apple).await.unwrap();
        let err = carts.remove_line(&cart, apple).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        assert_eq!(carts.clear(&cart).await.unwrap(), 1);
        assert_eq!(carts.clear(&cart).await.unwrap(), 0);
        assert_eq!(carts.total(&cart).await.unwrap(), Money::zero());
    }

    #[tokio::test]
    async fn test_carts_are_isolated() {
        let (carts, apple, _) = setup().await;
        let lane_1 = CartId::parse("lane-1").unwrap();
        let lane_2 = CartId::parse("lane-2").unwrap();

        carts.scan(&lane_1, apple).await.unwrap();
        carts.scan(&lane_1, apple).await.unwrap();
        carts.scan(&lane_2, apple).await.unwrap();

        assert_eq!(carts.total(&lane_1).await.unwrap(), Money::from_cents(45));
        assert_eq!(carts.total(&lane_2).await.unwrap(), Money::from_cents(30));

        carts.clear(&lane_1).await.unwrap();
        assert_eq!(carts.contents(&lane_2).await.unwrap().len(), 1);
    }
}
