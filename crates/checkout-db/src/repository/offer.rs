//! # Offer Repository
//!
//! Bulk offers, at most one per item.
//!
//! ## Integrity
//! ```text
//! INSERT offer(item_id = 7)
//!      │
//!      ├── items.id = 7 missing?        FOREIGN KEY fails → NotFound("Item")
//!      ├── offers.item_id = 7 exists?   UNIQUE fails      → UniqueViolation
//!      └── otherwise                    row inserted
//! ```
//! Both checks are enforced by the schema inside the single INSERT, so no
//! read-then-write race exists between two admins.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use checkout_core::{Item, ItemId, Offer, OfferId};

const OFFER_COLUMNS: &str =
    "id, item_id, quantity, total_price_cents, created_at, updated_at";

const OFFER_WITH_ITEM_SELECT: &str = "\
    SELECT o.id, o.item_id, o.quantity, o.total_price_cents, \
           o.created_at, o.updated_at, \
           i.name AS item_name, i.unit_price_cents AS item_unit_price_cents, \
           i.created_at AS item_created_at, i.updated_at AS item_updated_at \
    FROM offers o \
    JOIN items i ON i.id = o.item_id";

/// An offer together with the item it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferWithItem {
    pub offer: Offer,
    pub item: Item,
}

#[derive(sqlx::FromRow)]
struct OfferWithItemRow {
    id: OfferId,
    item_id: ItemId,
    quantity: i64,
    total_price_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    item_name: String,
    item_unit_price_cents: i64,
    item_created_at: DateTime<Utc>,
    item_updated_at: DateTime<Utc>,
}

impl From<OfferWithItemRow> for OfferWithItem {
    fn from(row: OfferWithItemRow) -> Self {
        OfferWithItem {
            offer: Offer {
                id: row.id,
                item_id: row.item_id,
                quantity: row.quantity,
                total_price_cents: row.total_price_cents,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            item: Item {
                id: row.item_id,
                name: row.item_name,
                unit_price_cents: row.item_unit_price_cents,
                created_at: row.item_created_at,
                updated_at: row.item_updated_at,
            },
        }
    }
}

/// Repository for offer database operations.
#[derive(Debug, Clone)]
pub struct OfferRepository {
    pool: SqlitePool,
}

impl OfferRepository {
    /// Creates a new OfferRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OfferRepository { pool }
    }

    /// Lists all offers with their items, oldest first.
    pub async fn list(&self) -> DbResult<Vec<OfferWithItem>> {
        let sql = format!("{OFFER_WITH_ITEM_SELECT} ORDER BY o.id");
        let rows = sqlx::query_as::<_, OfferWithItemRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed offers");
        Ok(rows.into_iter().map(OfferWithItem::from).collect())
    }

    /// Gets an offer (with its item) by offer id.
    pub async fn get_by_id(&self, id: OfferId) -> DbResult<Option<OfferWithItem>> {
        let sql = format!("{OFFER_WITH_ITEM_SELECT} WHERE o.id = ?1");
        let row = sqlx::query_as::<_, OfferWithItemRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(OfferWithItem::from))
    }

    /// Finds the offer bound to an item, if any.
    pub async fn find_by_item(&self, item_id: ItemId) -> DbResult<Option<Offer>> {
        let sql = format!("SELECT {OFFER_COLUMNS} FROM offers WHERE item_id = ?1");
        let offer = sqlx::query_as::<_, Offer>(&sql)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(offer)
    }

    /// Creates the offer for an item.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - The item doesn't exist
    /// * `Err(DbError::UniqueViolation)` - The item already has an offer
    pub async fn insert(
        &self,
        item_id: ItemId,
        quantity: i64,
        total_price_cents: i64,
    ) -> DbResult<Offer> {
        debug!(item_id, quantity, total_price_cents, "Inserting offer");

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO offers (item_id, quantity, total_price_cents, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?4) RETURNING {OFFER_COLUMNS}"
        );
        let offer = sqlx::query_as::<_, Offer>(&sql)
            .bind(item_id)
            .bind(quantity)
            .bind(total_price_cents)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::ForeignKeyViolation { .. } => DbError::not_found("Item", item_id),
                DbError::UniqueViolation { field, .. } => DbError::duplicate(field, item_id),
                other => other,
            })?;

        debug!(offer_id = offer.id, "Offer inserted");
        Ok(offer)
    }

    /// Changes an offer's group size and group price. The item binding
    /// never changes.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No offer with this id
    pub async fn update(
        &self,
        id: OfferId,
        quantity: i64,
        total_price_cents: i64,
    ) -> DbResult<Offer> {
        debug!(offer_id = id, quantity, total_price_cents, "Updating offer");

        let sql = format!(
            "UPDATE offers SET quantity = ?1, total_price_cents = ?2, updated_at = ?3 \
             WHERE id = ?4 RETURNING {OFFER_COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&sql)
            .bind(quantity)
            .bind(total_price_cents)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Offer", id))
    }

    /// Deletes an offer.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No offer with this id
    pub async fn delete(&self, id: OfferId) -> DbResult<()> {
        debug!(offer_id = id, "Deleting offer");

        let result = sqlx::query("DELETE FROM offers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Offer", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = setup().await;
        let apple = db.items().insert("Apple", 30).await.unwrap();

        let offer = db.offers().insert(apple.id, 2, 45).await.unwrap();
        assert_eq!(offer.item_id, apple.id);
        assert_eq!(offer.quantity, 2);
        assert_eq!(offer.total_price_cents, 45);

        let found = db.offers().find_by_item(apple.id).await.unwrap().unwrap();
        assert_eq!(found.id, offer.id);

        let with_item = db.offers().get_by_id(offer.id).await.unwrap().unwrap();
        assert_eq!(with_item.item.name, "Apple");
        assert_eq!(with_item.offer.total_price_cents, 45);
    }

    #[tokio::test]
    async fn test_offer_for_missing_item() {
        let db = setup().await;
        let err = db.offers().insert(404, 2, 45).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Item"));
    }

    #[tokio::test]
    async fn test_second_offer_for_item_is_rejected() {
        let db = setup().await;
        let banana = db.items().insert("Banana", 50).await.unwrap();
        db.offers().insert(banana.id, 3, 130).await.unwrap();

        let err = db.offers().insert(banana.id, 2, 90).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // The first offer is untouched.
        let offer = db.offers().find_by_item(banana.id).await.unwrap().unwrap();
        assert_eq!(offer.quantity, 3);
    }

    #[tokio::test]
    async fn test_update_keeps_item_binding() {
        let db = setup().await;
        let apple = db.items().insert("Apple", 30).await.unwrap();
        let offer = db.offers().insert(apple.id, 2, 45).await.unwrap();

        let updated = db.offers().update(offer.id, 3, 60).await.unwrap();
        assert_eq!(updated.item_id, apple.id);
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.total_price_cents, 60);

        let err = db.offers().update(offer.id + 1, 3, 60).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let db = setup().await;
        let apple = db.items().insert("Apple", 30).await.unwrap();
        let banana = db.items().insert("Banana", 50).await.unwrap();
        let first = db.offers().insert(apple.id, 2, 45).await.unwrap();
        db.offers().insert(banana.id, 3, 130).await.unwrap();

        assert_eq!(db.offers().list().await.unwrap().len(), 2);

        db.offers().delete(first.id).await.unwrap();
        let remaining = db.offers().list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].item.name, "Banana");

        let err = db.offers().delete(first.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_deleting_item_cascades_to_offer() {
        let db = setup().await;
        let apple = db.items().insert("Apple", 30).await.unwrap();
        let offer = db.offers().insert(apple.id, 2, 45).await.unwrap();

        db.items().delete(apple.id).await.unwrap();
        assert!(db.offers().get_by_id(offer.id).await.unwrap().is_none());
    }
}
