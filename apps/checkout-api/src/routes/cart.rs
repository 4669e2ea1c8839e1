//! # Cart Routes
//!
//! ```text
//! POST   /cart/scan/{itemId}                      → 200 line | 404
//! GET    /cart/contents                           → 200 [line]
//! GET    /cart/total                              → 200 { "total": n }
//! GET    /cart/summary                            → 200 summary
//! DELETE /cart                                    → 204
//! DELETE /cart/items/{itemId}                     → 204 | 404
//! PUT    /cart/items/{itemId}/decrease?quantity=N → 200 line | 204 | 400 | 404
//! ```
//!
//! Every route works on the cart named by `X-Cart-Id`, or the default cart.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use checkout_core::{CartSummary, ItemId};
use checkout_db::DecrementOutcome;

use crate::error::ApiResult;
use crate::routes::dto::{CartLineDto, DecreaseParams, TotalResponse};
use crate::routes::extract::{ApiPath, ApiQuery, CartKey};
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/cart", delete(clear_cart))
        .route("/cart/scan/{item_id}", post(scan_item))
        .route("/cart/contents", get(get_contents))
        .route("/cart/total", get(get_total))
        .route("/cart/summary", get(get_summary))
        .route("/cart/items/{item_id}", delete(remove_line))
        .route("/cart/items/{item_id}/decrease", put(decrease_line))
}

async fn scan_item(
    State(state): State<SharedState>,
    CartKey(cart): CartKey,
    ApiPath(item_id): ApiPath<ItemId>,
) -> ApiResult<Json<CartLineDto>> {
    let line = state.carts().scan(&cart, item_id).await?;
    Ok(Json(line.into()))
}

async fn get_contents(
    State(state): State<SharedState>,
    CartKey(cart): CartKey,
) -> ApiResult<Json<Vec<CartLineDto>>> {
    let lines = state.carts().contents(&cart).await?;
    Ok(Json(lines.into_iter().map(CartLineDto::from).collect()))
}

async fn get_total(
    State(state): State<SharedState>,
    CartKey(cart): CartKey,
) -> ApiResult<Json<TotalResponse>> {
    let total = state.carts().total(&cart).await?;
    Ok(Json(TotalResponse { total }))
}

async fn get_summary(
    State(state): State<SharedState>,
    CartKey(cart): CartKey,
) -> ApiResult<Json<CartSummary>> {
    Ok(Json(state.carts().summary(&cart).await?))
}

async fn clear_cart(
    State(state): State<SharedState>,
    CartKey(cart): CartKey,
) -> ApiResult<StatusCode> {
    state.carts().clear(&cart).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_line(
    State(state): State<SharedState>,
    CartKey(cart): CartKey,
    ApiPath(item_id): ApiPath<ItemId>,
) -> ApiResult<StatusCode> {
    state.carts().remove_line(&cart, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 200 with the line while it survives, 204 once it is gone.
async fn decrease_line(
    State(state): State<SharedState>,
    CartKey(cart): CartKey,
    ApiPath(item_id): ApiPath<ItemId>,
    ApiQuery(params): ApiQuery<DecreaseParams>,
) -> ApiResult<Response> {
    let outcome = state
        .carts()
        .decrement(&cart, item_id, params.quantity)
        .await?;

    Ok(match outcome {
        DecrementOutcome::Updated(line) => Json(CartLineDto::from(line)).into_response(),
        DecrementOutcome::Removed => StatusCode::NO_CONTENT.into_response(),
    })
}
