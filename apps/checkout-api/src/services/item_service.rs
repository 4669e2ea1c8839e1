//! Item administration.

use tracing::{info, warn};

use checkout_core::validation::{validate_item_name, validate_price_cents};
use checkout_core::{CoreError, Item, ItemId};
use checkout_db::Database;

use crate::error::ApiResult;

/// Validated CRUD over the inventory.
#[derive(Debug, Clone)]
pub struct ItemService {
    db: Database,
}

impl ItemService {
    pub fn new(db: Database) -> Self {
        ItemService { db }
    }

    /// Creates an item. The name is trimmed before it is stored.
    pub async fn create(&self, name: &str, unit_price_cents: i64) -> ApiResult<Item> {
        let name = validate_item_name(name)?;
        validate_price_cents("unitPrice", unit_price_cents)?;

        let item = self.db.items().insert(&name, unit_price_cents).await?;
        info!(item_id = item.id, name = %item.name, unit_price_cents, "Item created");
        Ok(item)
    }

    pub async fn list(&self) -> ApiResult<Vec<Item>> {
        Ok(self.db.items().list().await?)
    }

    pub async fn get(&self, id: ItemId) -> ApiResult<Item> {
        self.db
            .items()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ItemNotFound(id).into())
    }

    /// Changes an item's unit price. Carts reprice on their next read.
    pub async fn update_price(&self, id: ItemId, unit_price_cents: i64) -> ApiResult<Item> {
        validate_price_cents("unitPrice", unit_price_cents)?;

        let item = self.db.items().update_price(id, unit_price_cents).await?;
        info!(item_id = id, unit_price_cents, "Item price updated");
        Ok(item)
    }

    pub async fn update_name(&self, id: ItemId, name: &str) -> ApiResult<Item> {
        let name = validate_item_name(name)?;

        let item = self.db.items().update_name(id, &name).await?;
        info!(item_id = id, name = %item.name, "Item renamed");
        Ok(item)
    }

    /// Deletes an item together with its offer and every cart line that
    /// holds it.
    pub async fn delete(&self, id: ItemId) -> ApiResult<()> {
        self.db.items().delete(id).await?;
        warn!(item_id = id, "Item deleted; its offer and cart lines were removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use checkout_core::MAX_PRICE_CENTS;
    use checkout_db::DbConfig;

    async fn setup() -> ItemService {
        ItemService::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let items = setup().await;
        let item = items.create("  Apple  ", 30).await.unwrap();
        assert_eq!(item.name, "Apple");
        assert_eq!(items.get(item.id).await.unwrap(), item);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let items = setup().await;

        let err = items.create("   ", 30).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = items.create("Apple", -1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = items.create("Apple", MAX_PRICE_CENTS + 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(items.list().await.unwrap().is_empty());

        // Free items are allowed.
        assert!(items.create("Bag", 0).await.is_ok());
    }

    #[tokio::test]
    async fn test_updates() {
        let items = setup().await;
        let item = items.create("Apple", 30).await.unwrap();

        let updated = items.update_price(item.id, 35).await.unwrap();
        assert_eq!(updated.unit_price_cents, 35);

        let renamed = items.update_name(item.id, "Green Apple").await.unwrap();
        assert_eq!(renamed.name, "Green Apple");
        assert_eq!(renamed.unit_price_cents, 35);

        let err = items.update_price(item.id + 100, 35).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = items.update_name(item.id, "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_get_and_delete_missing() {
        let items = setup().await;
        assert_eq!(items.get(1).await.unwrap_err().code, ErrorCode::NotFound);
        assert_eq!(items.delete(1).await.unwrap_err().code, ErrorCode::NotFound);
    }
}
