//! Service layer.
//!
//! Each service validates its input, calls the repositories and turns
//! storage errors into [`ApiError`](crate::error::ApiError)s. Handlers stay
//! free of business rules.

pub mod cart_service;
pub mod item_service;
pub mod offer_service;

pub use cart_service::CartService;
pub use item_service::ItemService;
pub use offer_service::OfferService;
