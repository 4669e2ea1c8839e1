//! Request extractors that reject with [`ApiError`] bodies instead of
//! axum's plain-text rejections.

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use tracing::warn;

use checkout_core::CartId;

use crate::error::ApiError;

/// Header naming the cart a request works on.
pub const CART_ID_HEADER: &str = "x-cart-id";

/// The cart addressed by the request.
///
/// Absent header means [`CartId::default`]. A malformed key is a 400.
#[derive(Debug, Clone)]
pub struct CartKey(pub CartId);

impl<S> FromRequestParts<S> for CartKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(CART_ID_HEADER) else {
            return Ok(CartKey(CartId::default()));
        };

        let raw = value
            .to_str()
            .map_err(|_| ApiError::validation("X-Cart-Id must be visible ASCII"))?;

        CartId::parse(raw).map(CartKey).map_err(|e| {
            warn!(cart_id = raw, error = %e, "Rejected cart key");
            ApiError::from(e)
        })
    }
}

/// `Path` with JSON error bodies.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| ApiPath(value))
            .map_err(|rejection| ApiError::validation(rejection.body_text()))
    }
}

/// `Query` with JSON error bodies.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(|rejection| ApiError::validation(rejection.body_text()))
    }
}

/// `Json` request body with JSON error bodies.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| ApiJson(value))
            .map_err(|rejection| ApiError::validation(rejection.body_text()))
    }
}
