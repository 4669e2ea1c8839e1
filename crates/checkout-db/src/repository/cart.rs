//! # Cart Repository
//!
//! The only code that mutates `cart_lines`.
//!
//! ## Transaction Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    UPDATE cart_lines SET updated_at = now           ← takes write lock  │
//! │      WHERE (cart, item) RETURNING quantity          ← current state     │
//! │                                                                         │
//! │    checkout_core::cart::{quantity_after_scan, decrement}                │
//! │                                                     ← next state        │
//! │    INSERT .. ON CONFLICT / UPDATE / DELETE          ← persist           │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first statement of every mutating transaction is a write, so SQLite
//! grants the write lock before anything is read. Two concurrent scans of
//! the same item queue on that lock (busy_timeout) and each sees the
//! other's committed quantity; no increment is lost.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use checkout_core::cart::{self, Decrement};
use checkout_core::validation::validate_positive;
use checkout_core::{CartId, CartLine, CartLineView, CoreError, Item, ItemId, Money, OfferTerms};

const LINE_VIEW_SELECT: &str = "\
    SELECT cl.id AS line_id, cl.cart_id, cl.quantity, \
           i.id AS item_id, i.name AS item_name, i.unit_price_cents, \
           i.created_at AS item_created_at, i.updated_at AS item_updated_at, \
           o.quantity AS offer_quantity, o.total_price_cents AS offer_total_price_cents \
    FROM cart_lines cl \
    JOIN items i ON i.id = cl.item_id \
    LEFT JOIN offers o ON o.item_id = cl.item_id \
    WHERE cl.cart_id = ?1";

/// What a decrement did to the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// The line survives with a smaller quantity.
    Updated(CartLineView),

    /// The quantity reached zero or below and the line was deleted.
    Removed,
}

#[derive(sqlx::FromRow)]
struct CartLineViewRow {
    line_id: i64,
    cart_id: CartId,
    quantity: i64,
    item_id: ItemId,
    item_name: String,
    unit_price_cents: i64,
    item_created_at: DateTime<Utc>,
    item_updated_at: DateTime<Utc>,
    offer_quantity: Option<i64>,
    offer_total_price_cents: Option<i64>,
}

impl From<CartLineViewRow> for CartLineView {
    fn from(row: CartLineViewRow) -> Self {
        let offer = match (row.offer_quantity, row.offer_total_price_cents) {
            (Some(quantity), Some(price)) => {
                Some(OfferTerms::new(quantity, Money::from_cents(price)))
            }
            _ => None,
        };

        CartLineView {
            line_id: row.line_id,
            cart_id: row.cart_id,
            item: Item {
                id: row.item_id,
                name: row.item_name,
                unit_price_cents: row.unit_price_cents,
                created_at: row.item_created_at,
                updated_at: row.item_updated_at,
            },
            quantity: row.quantity,
            offer,
        }
    }
}

/// Repository for cart line operations.
///
/// ## Usage
/// ```rust,ignore
/// let cart = CartId::default();
/// db.carts().scan(&cart, apple.id).await?;
/// let lines = db.carts().contents(&cart).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns every line of a cart with its item and offer, in scan order.
    pub async fn contents(&self, cart_id: &CartId) -> DbResult<Vec<CartLineView>> {
        let sql = format!("{LINE_VIEW_SELECT} ORDER BY cl.id");
        let rows = sqlx::query_as::<_, CartLineViewRow>(&sql)
            .bind(cart_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        debug!(cart_id = %cart_id, count = rows.len(), "Loaded cart contents");
        Ok(rows.into_iter().map(CartLineView::from).collect())
    }

    /// Returns the raw lines of a cart, in scan order.
    pub async fn lines(&self, cart_id: &CartId) -> DbResult<Vec<CartLine>> {
        let lines = sqlx::query_as::<_, CartLine>(
            "SELECT id, cart_id, item_id, quantity, added_at, updated_at \
             FROM cart_lines WHERE cart_id = ?1 ORDER BY id",
        )
        .bind(cart_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Returns one line of a cart, if the item is in it.
    pub async fn line(&self, cart_id: &CartId, item_id: ItemId) -> DbResult<Option<CartLineView>> {
        fetch_view(&self.pool, cart_id, item_id).await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Scans one unit of an item into the cart.
    ///
    /// ## Returns
    /// * `Ok(CartLineView)` - The line after the scan (quantity 1 if new)
    /// * `Err(DbError::Domain(ItemNotFound))` - Unknown item; nothing changed
    pub async fn scan(&self, cart_id: &CartId, item_id: ItemId) -> DbResult<CartLineView> {
        debug!(cart_id = %cart_id, item_id, "Scanning item");

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let current = touch_line(&mut tx, cart_id, item_id, now).await?;
        if current.is_none() && !item_exists(&mut tx, item_id).await? {
            return Err(CoreError::ItemNotFound(item_id).into());
        }

        let quantity = cart::quantity_after_scan(current);
        sqlx::query(
            "INSERT INTO cart_lines (cart_id, item_id, quantity, added_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?4) \
             ON CONFLICT (cart_id, item_id) \
             DO UPDATE SET quantity = excluded.quantity, updated_at = excluded.updated_at",
        )
        .bind(cart_id.as_str())
        .bind(item_id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let view = fetch_view(&mut *tx, cart_id, item_id)
            .await?
            .ok_or_else(|| DbError::Internal("scanned line vanished".to_string()))?;

        tx.commit().await.map_err(DbError::transaction)?;

        debug!(cart_id = %cart_id, item_id, quantity, "Item scanned");
        Ok(view)
    }

    /// Deletes the whole line for an item.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain(CartLineNotFound))` - The cart has no such line
    pub async fn remove_line(&self, cart_id: &CartId, item_id: ItemId) -> DbResult<()> {
        debug!(cart_id = %cart_id, item_id, "Removing cart line");

        let result = sqlx::query("DELETE FROM cart_lines WHERE cart_id = ?1 AND item_id = ?2")
            .bind(cart_id.as_str())
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::CartLineNotFound {
                cart_id: cart_id.clone(),
                item_id,
            }
            .into());
        }

        Ok(())
    }

    /// Removes `by` units of an item from the cart.
    ///
    /// ## Returns
    /// * `Ok(DecrementOutcome::Updated(line))` - Line kept with `q - by`
    /// * `Ok(DecrementOutcome::Removed)` - `q - by <= 0`, line deleted
    /// * `Err(DbError::Domain(Validation))` - `by <= 0`; checked before any read
    /// * `Err(DbError::Domain(CartLineNotFound))` - The cart has no such line
    pub async fn decrement(
        &self,
        cart_id: &CartId,
        item_id: ItemId,
        by: i64,
    ) -> DbResult<DecrementOutcome> {
        debug!(cart_id = %cart_id, item_id, by, "Decrementing cart line");

        validate_positive("quantity", by).map_err(CoreError::from)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let current = touch_line(&mut tx, cart_id, item_id, now).await?;

        let outcome = match cart::decrement(cart_id, item_id, current, by)? {
            Decrement::Removed => {
                sqlx::query("DELETE FROM cart_lines WHERE cart_id = ?1 AND item_id = ?2")
                    .bind(cart_id.as_str())
                    .bind(item_id)
                    .execute(&mut *tx)
                    .await?;

                DecrementOutcome::Removed
            }
            Decrement::Updated(quantity) => {
                sqlx::query(
                    "UPDATE cart_lines SET quantity = ?1, updated_at = ?2 \
                     WHERE cart_id = ?3 AND item_id = ?4",
                )
                .bind(quantity)
                .bind(now)
                .bind(cart_id.as_str())
                .bind(item_id)
                .execute(&mut *tx)
                .await?;

                let view = fetch_view(&mut *tx, cart_id, item_id)
                    .await?
                    .ok_or_else(|| DbError::Internal("decremented line vanished".to_string()))?;
                DecrementOutcome::Updated(view)
            }
        };

        tx.commit().await.map_err(DbError::transaction)?;
        Ok(outcome)
    }

    /// Deletes every line of a cart. Idempotent.
    ///
    /// ## Returns
    /// The number of lines removed (0 for an already empty cart).
    pub async fn clear(&self, cart_id: &CartId) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE cart_id = ?1")
            .bind(cart_id.as_str())
            .execute(&self.pool)
            .await?;

        debug!(cart_id = %cart_id, removed = result.rows_affected(), "Cart cleared");
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================

/// Bumps `updated_at` on the line and returns its quantity.
///
/// Being a write, this acquires SQLite's write lock even when no row
/// matches, which serializes the rest of the transaction against other
/// writers.
async fn touch_line(
    conn: &mut SqliteConnection,
    cart_id: &CartId,
    item_id: ItemId,
    now: DateTime<Utc>,
) -> DbResult<Option<i64>> {
    let quantity: Option<i64> = sqlx::query_scalar(
        "UPDATE cart_lines SET updated_at = ?1 \
         WHERE cart_id = ?2 AND item_id = ?3 RETURNING quantity",
    )
    .bind(now)
    .bind(cart_id.as_str())
    .bind(item_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(quantity)
}

async fn item_exists(conn: &mut SqliteConnection, item_id: ItemId) -> DbResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM items WHERE id = ?1")
        .bind(item_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(found.is_some())
}

async fn fetch_view<'e, E>(
    executor: E,
    cart_id: &CartId,
    item_id: ItemId,
) -> DbResult<Option<CartLineView>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{LINE_VIEW_SELECT} AND cl.item_id = ?2");
    let row = sqlx::query_as::<_, CartLineViewRow>(&sql)
        .bind(cart_id.as_str())
        .bind(item_id)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(CartLineView::from))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use checkout_core::ErrorKind;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn kind(err: DbError) -> Option<ErrorKind> {
        match err {
            DbError::Domain(core) => Some(core.kind()),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_scan_creates_then_increments() {
        let db = setup().await;
        let cart = CartId::default();
        let apple = db.items().insert("Apple", 30).await.unwrap();

        let line = db.carts().scan(&cart, apple.id).await.unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.item.name, "Apple");
        assert!(line.offer.is_none());

        let line = db.carts().scan(&cart, apple.id).await.unwrap();
        assert_eq!(line.quantity, 2);

        // Still exactly one line for the item.
        assert_eq!(db.carts().lines(&cart).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_scan_unknown_item_leaves_cart_unchanged() {
        let db = setup().await;
        let cart = CartId::default();
        let apple = db.items().insert("Apple", 30).await.unwrap();
        db.carts().scan(&cart, apple.id).await.unwrap();

        let err = db.carts().scan(&cart, 999).await.unwrap_err();
        assert_eq!(kind(err), Some(ErrorKind::NotFound));

        let lines = db.carts().lines(&cart).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_contents_carries_offer_terms() {
        let db = setup().await;
        let cart = CartId::default();
        let apple = db.items().insert("Apple", 30).await.unwrap();
        let banana = db.items().insert("Banana", 50).await.unwrap();
        db.offers().insert(apple.id, 2, 45).await.unwrap();

        db.carts().scan(&cart, banana.id).await.unwrap();
        db.carts().scan(&cart, apple.id).await.unwrap();

        let contents = db.carts().contents(&cart).await.unwrap();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].item.name, "Banana");
        assert_eq!(contents[0].offer, None);
        assert_eq!(
            contents[1].offer,
            Some(OfferTerms::new(2, Money::from_cents(45)))
        );
    }

    #[tokio::test]
    async fn test_remove_line() {
        let db = setup().await;
        let cart = CartId::default();
        let kiwi = db.items().insert("Kiwi", 20).await.unwrap();
        db.carts().scan(&cart, kiwi.id).await.unwrap();
        db.carts().scan(&cart, kiwi.id).await.unwrap();

        db.carts().remove_line(&cart, kiwi.id).await.unwrap();
        assert!(db.carts().line(&cart, kiwi.id).await.unwrap().is_none());

        let err = db.carts().remove_line(&cart, kiwi.id).await.unwrap_err();
        assert_eq!(kind(err), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_decrement_updates_and_removes() {
        let db = setup().await;
        let cart = CartId::default();
        let peach = db.items().insert("Peach", 60).await.unwrap();
        for _ in 0..5 {
            db.carts().scan(&cart, peach.id).await.unwrap();
        }

        match db.carts().decrement(&cart, peach.id, 2).await.unwrap() {
            DecrementOutcome::Updated(line) => assert_eq!(line.quantity, 3),
            DecrementOutcome::Removed => panic!("line should survive"),
        }

        let outcome = db.carts().decrement(&cart, peach.id, 10).await.unwrap();
        assert_eq!(outcome, DecrementOutcome::Removed);
        assert!(db.carts().line(&cart, peach.id).await.unwrap().is_none());

        let err = db.carts().decrement(&cart, peach.id, 1).await.unwrap_err();
        assert_eq!(kind(err), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_decrement_exact_quantity_removes() {
        let db = setup().await;
        let cart = CartId::default();
        let kiwi = db.items().insert("Kiwi", 20).await.unwrap();
        db.carts().scan(&cart, kiwi.id).await.unwrap();
        db.carts().scan(&cart, kiwi.id).await.unwrap();

        let outcome = db.carts().decrement(&cart, kiwi.id, 2).await.unwrap();
        assert_eq!(outcome, DecrementOutcome::Removed);
    }

    #[tokio::test]
    async fn test_decrement_rejects_non_positive_without_mutation() {
        let db = setup().await;
        let cart = CartId::default();
        let kiwi = db.items().insert("Kiwi", 20).await.unwrap();
        db.carts().scan(&cart, kiwi.id).await.unwrap();

        for by in [0, -1] {
            let err = db.carts().decrement(&cart, kiwi.id, by).await.unwrap_err();
            assert_eq!(kind(err), Some(ErrorKind::InvalidArgument));
        }

        let line = db.carts().line(&cart, kiwi.id).await.unwrap().unwrap();
        assert_eq!(line.quantity, 1);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let db = setup().await;
        let cart = CartId::default();
        let apple = db.items().insert("Apple", 30).await.unwrap();
        let banana = db.items().insert("Banana", 50).await.unwrap();
        db.carts().scan(&cart, apple.id).await.unwrap();
        db.carts().scan(&cart, banana.id).await.unwrap();

        assert_eq!(db.carts().clear(&cart).await.unwrap(), 2);
        assert!(db.carts().contents(&cart).await.unwrap().is_empty());
        assert_eq!(db.carts().clear(&cart).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_carts_are_isolated() {
        let db = setup().await;
        let lane_1 = CartId::parse("lane-1").unwrap();
        let lane_2 = CartId::parse("lane-2").unwrap();
        let apple = db.items().insert("Apple", 30).await.unwrap();

        db.carts().scan(&lane_1, apple.id).await.unwrap();
        db.carts().scan(&lane_1, apple.id).await.unwrap();
        db.carts().scan(&lane_2, apple.id).await.unwrap();

        db.carts().clear(&lane_2).await.unwrap();

        let line = db.carts().line(&lane_1, apple.id).await.unwrap().unwrap();
        assert_eq!(line.quantity, 2);
        assert!(db.carts().contents(&lane_2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_item_cascades_to_cart_lines() {
        let db = setup().await;
        let cart = CartId::default();
        let apple = db.items().insert("Apple", 30).await.unwrap();
        db.carts().scan(&cart, apple.id).await.unwrap();

        db.items().delete(apple.id).await.unwrap();
        assert!(db.carts().lines(&cart).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_scans_lose_no_increments() {
        let path = std::env::temp_dir().join(format!("checkout-{}.db", uuid::Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(4))
            .await
            .unwrap();
        let cart = CartId::default();
        let apple_id = db.items().insert("Apple", 30).await.unwrap().id;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let db = db.clone();
            let cart = cart.clone();
            handles.push(tokio::spawn(async move {
                db.carts().scan(&cart, apple_id).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let line = db.carts().line(&cart, apple_id).await.unwrap().unwrap();
        assert_eq!(line.quantity, 20);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
