//! # Item Repository
//!
//! Inventory CRUD. Callers validate names and prices first; the table's
//! CHECK constraints are only a backstop.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use checkout_core::{Item, ItemId};

const ITEM_COLUMNS: &str = "id, name, unit_price_cents, created_at, updated_at";

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.items();
/// let apple = repo.insert("Apple", 30).await?;
/// let apple = repo.update_price(apple.id, 35).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists all items, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY id");
        let items = sqlx::query_as::<_, Item>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    /// Gets an item by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: ItemId) -> DbResult<Option<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1");
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Inserts a new item and returns it with its generated id.
    pub async fn insert(&self, name: &str, unit_price_cents: i64) -> DbResult<Item> {
        debug!(name = %name, unit_price_cents, "Inserting item");

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO items (name, unit_price_cents, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?3) RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(name)
            .bind(unit_price_cents)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        debug!(item_id = item.id, "Item inserted");
        Ok(item)
    }

    /// Changes an item's unit price.
    ///
    /// Carts are priced live, so every cart holding the item sees the new
    /// price on its next total.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No item with this id
    pub async fn update_price(&self, id: ItemId, unit_price_cents: i64) -> DbResult<Item> {
        debug!(item_id = id, unit_price_cents, "Updating item price");

        let sql = format!(
            "UPDATE items SET unit_price_cents = ?1, updated_at = ?2 \
             WHERE id = ?3 RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&sql)
            .bind(unit_price_cents)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))
    }

    /// Renames an item.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No item with this id
    pub async fn update_name(&self, id: ItemId, name: &str) -> DbResult<Item> {
        debug!(item_id = id, name = %name, "Renaming item");

        let sql = format!(
            "UPDATE items SET name = ?1, updated_at = ?2 \
             WHERE id = ?3 RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&sql)
            .bind(name)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))
    }

    /// Deletes an item together with its offer and every cart line that
    /// references it (foreign keys cascade).
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No item with this id
    pub async fn delete(&self, id: ItemId) -> DbResult<()> {
        debug!(item_id = id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Counts all items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
