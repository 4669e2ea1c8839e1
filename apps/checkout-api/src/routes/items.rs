//! Inventory routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use checkout_core::ItemId;

use crate::error::ApiResult;
use crate::routes::dto::{CreateItemRequest, ItemDto, UpdateNameRequest, UpdatePriceRequest};
use crate::routes::extract::{ApiJson, ApiPath};
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).put(update_price).delete(delete_item))
        .route("/items/{id}/name", put(update_name))
}

async fn list_items(State(state): State<SharedState>) -> ApiResult<Json<Vec<ItemDto>>> {
    let items = state.items().list().await?;
    Ok(Json(items.into_iter().map(ItemDto::from).collect()))
}

async fn get_item(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<ItemId>,
) -> ApiResult<Json<ItemDto>> {
    Ok(Json(state.items().get(id).await?.into()))
}

async fn create_item(
    State(state): State<SharedState>,
    ApiJson(body): ApiJson<CreateItemRequest>,
) -> ApiResult<(StatusCode, Json<ItemDto>)> {
    let item = state.items().create(&body.name, body.unit_price).await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

async fn update_price(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<ItemId>,
    ApiJson(body): ApiJson<UpdatePriceRequest>,
) -> ApiResult<Json<ItemDto>> {
    let item = state.items().update_price(id, body.unit_price).await?;
    Ok(Json(item.into()))
}

async fn update_name(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<ItemId>,
    ApiJson(body): ApiJson<UpdateNameRequest>,
) -> ApiResult<Json<ItemDto>> {
    let item = state.items().update_name(id, &body.name).await?;
    Ok(Json(item.into()))
}

async fn delete_item(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<ItemId>,
) -> ApiResult<StatusCode> {
    state.items().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
