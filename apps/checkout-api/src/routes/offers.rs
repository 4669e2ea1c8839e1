//! Offer routes.
//!
//! `POST /offers/{itemId}` takes the item id; every other `{id}` is an
//! offer id.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use checkout_core::{ItemId, OfferId};

use crate::error::ApiResult;
use crate::routes::dto::{OfferDto, OfferTermsRequest};
use crate::routes::extract::{ApiJson, ApiPath};
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new().route("/offers", get(list_offers)).route(
        "/offers/{id}",
        get(get_offer)
            .post(create_offer)
            .put(update_offer)
            .delete(delete_offer),
    )
}

async fn list_offers(State(state): State<SharedState>) -> ApiResult<Json<Vec<OfferDto>>> {
    let offers = state.offers().list().await?;
    Ok(Json(offers.into_iter().map(OfferDto::from).collect()))
}

async fn get_offer(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<OfferId>,
) -> ApiResult<Json<OfferDto>> {
    Ok(Json(state.offers().get(id).await?.into()))
}

async fn create_offer(
    State(state): State<SharedState>,
    ApiPath(item_id): ApiPath<ItemId>,
    ApiJson(body): ApiJson<OfferTermsRequest>,
) -> ApiResult<(StatusCode, Json<OfferDto>)> {
    let offer = state
        .offers()
        .create(item_id, body.quantity, body.total_price)
        .await?;
    Ok((StatusCode::CREATED, Json(offer.into())))
}

async fn update_offer(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<OfferId>,
    ApiJson(body): ApiJson<OfferTermsRequest>,
) -> ApiResult<Json<OfferDto>> {
    let offer = state
        .offers()
        .update(id, body.quantity, body.total_price)
        .await?;
    Ok(Json(offer.into()))
}

async fn delete_offer(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<OfferId>,
) -> ApiResult<StatusCode> {
    state.offers().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
