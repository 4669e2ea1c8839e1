//! Wire shapes. Field names are camelCase and money is integer minor units.
//!
//! ```json
//! // line
//! { "id": 1, "item": { "id": 1, "name": "Apple", "unitPrice": 30 }, "quantity": 3 }
//!
//! // offer
//! { "id": 1, "quantity": 2, "totalPrice": 45, "item": { "id": 1, "name": "Apple", "unitPrice": 30 } }
//! ```

use serde::{Deserialize, Serialize};

use checkout_core::{CartLineView, Item, ItemId, Money, OfferId};
use checkout_db::OfferWithItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: ItemId,
    pub name: String,
    pub unit_price: i64,
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        ItemDto {
            id: item.id,
            name: item.name,
            unit_price: item.unit_price_cents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDto {
    pub id: i64,
    pub item: ItemDto,
    pub quantity: i64,
}

impl From<CartLineView> for CartLineDto {
    fn from(line: CartLineView) -> Self {
        CartLineDto {
            id: line.line_id,
            item: line.item.into(),
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferDto {
    pub id: OfferId,
    pub quantity: i64,
    pub total_price: i64,
    pub item: ItemDto,
}

impl From<OfferWithItem> for OfferDto {
    fn from(value: OfferWithItem) -> Self {
        OfferDto {
            id: value.offer.id,
            quantity: value.offer.quantity,
            total_price: value.offer.total_price_cents,
            item: value.item.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalResponse {
    pub total: Money,
}

// =============================================================================
// Request Bodies
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub unit_price: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriceRequest {
    pub unit_price: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNameRequest {
    pub name: String,
}

/// Body of offer create and update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferTermsRequest {
    pub quantity: i64,
    pub total_price: i64,
}

/// `?quantity=N` on the decrease route.
#[derive(Debug, Clone, Deserialize)]
pub struct DecreaseParams {
    pub quantity: i64,
}
