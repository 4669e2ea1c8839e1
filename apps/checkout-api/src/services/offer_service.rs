//! # Offer Service
//!
//! Bulk "N for P" offers. An item carries at most one.
//!
//! ```text
//! create(item_id, N, P)
//!     │
//!     ├── N <= 0 or P out of range ─────► VALIDATION_ERROR (400)
//!     ├── item missing ─────────────────► NOT_FOUND (404)
//!     ├── item already has an offer ────► CONFLICT (409)
//!     └── ok ───────────────────────────► offer + item (201)
//! ```

use tracing::info;

use checkout_core::validation::{validate_positive, validate_price_cents};
use checkout_core::{CoreError, ItemId, OfferId};
use checkout_db::{Database, DbError, OfferWithItem};

use crate::error::{ApiError, ApiResult};

/// Validated CRUD over offers.
#[derive(Debug, Clone)]
pub struct OfferService {
    db: Database,
}

impl OfferService {
    pub fn new(db: Database) -> Self {
        OfferService { db }
    }

    /// Creates the offer for an item.
    pub async fn create(
        &self,
        item_id: ItemId,
        quantity: i64,
        total_price_cents: i64,
    ) -> ApiResult<OfferWithItem> {
        validate_terms(quantity, total_price_cents)?;

        let offer = self
            .db
            .offers()
            .insert(item_id, quantity, total_price_cents)
            .await
            .map_err(|e| match e {
                DbError::UniqueViolation { .. } => {
                    ApiError::from(CoreError::OfferAlreadyExists { item_id })
                }
                DbError::NotFound { .. } => ApiError::from(CoreError::ItemNotFound(item_id)),
                other => ApiError::from(other),
            })?;

        info!(offer_id = offer.id, item_id, quantity, total_price_cents, "Offer created");
        self.get(offer.id).await
    }

    /// Changes the group size and price. The item binding stays.
    pub async fn update(
        &self,
        id: OfferId,
        quantity: i64,
        total_price_cents: i64,
    ) -> ApiResult<OfferWithItem> {
        validate_terms(quantity, total_price_cents)?;

        self.db
            .offers()
            .update(id, quantity, total_price_cents)
            .await
            .map_err(|e| match e {
                DbError::NotFound { .. } => ApiError::from(CoreError::OfferNotFound(id)),
                other => ApiError::from(other),
            })?;

        info!(offer_id = id, quantity, total_price_cents, "Offer updated");
        self.get(id).await
    }

    pub async fn list(&self) -> ApiResult<Vec<OfferWithItem>> {
        Ok(self.db.offers().list().await?)
    }

    pub async fn get(&self, id: OfferId) -> ApiResult<OfferWithItem> {
        self.db
            .offers()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::OfferNotFound(id).into())
    }

    pub async fn delete(&self, id: OfferId) -> ApiResult<()> {
        self.db.offers().delete(id).await.map_err(|e| match e {
            DbError::NotFound { .. } => ApiError::from(CoreError::OfferNotFound(id)),
            other => ApiError::from(other),
        })?;

        info!(offer_id = id, "Offer deleted");
        Ok(())
    }
}

fn validate_terms(quantity: i64, total_price_cents: i64) -> ApiResult<()> {
    validate_positive("quantity", quantity)?;
    validate_price_cents("totalPrice", total_price_cents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use checkout_db::DbConfig;

    async fn setup() -> (OfferService, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (OfferService::new(db.clone()), db)
    }

    #[tokio::test]
    async fn test_create_returns_offer_with_item() {
        let (offers, db) = setup().await;
        let apple = db.items().insert("Apple", 30).await.unwrap();

        let created = offers.create(apple.id, 2, 45).await.unwrap();
        assert_eq!(created.item, apple);
        assert_eq!(created.offer.quantity, 2);
        assert_eq!(created.offer.total_price_cents, 45);
    }

    #[tokio::test]
    async fn test_create_errors() {
        let (offers, db) = setup().await;
        let apple = db.items().insert("Apple", 30).await.unwrap();

        let err = offers.create(apple.id, 0, 45).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = offers.create(apple.id, 2, -5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = offers.create(apple.id + 10, 2, 45).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        offers.create(apple.id, 2, 45).await.unwrap();
        let err = offers.create(apple.id, 3, 60).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, format!("Item {} already has an offer", apple.id));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (offers, db) = setup().await;
        let banana = db.items().insert("Banana", 50).await.unwrap();
        let created = offers.create(banana.id, 3, 130).await.unwrap();

        let updated = offers.update(created.offer.id, 2, 90).await.unwrap();
        assert_eq!(updated.offer.quantity, 2);
        assert_eq!(updated.item.id, banana.id);

        offers.delete(created.offer.id).await.unwrap();
        assert!(offers.list().await.unwrap().is_empty());

        let err = offers.delete(created.offer.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        let err = offers.update(created.offer.id, 2, 90).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
