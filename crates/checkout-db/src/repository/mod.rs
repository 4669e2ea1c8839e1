//! # Repository Module
//!
//! Database repository implementations for the checkout.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service (checkout-api)                                                 │
//! │       │                                                                 │
//! │       │  db.carts().scan(&cart_id, item_id)                             │
//! │       ▼                                                                 │
//! │  CartRepository                                                         │
//! │  ├── scan / remove_line / decrement / clear   (mutations, one tx each)  │
//! │  └── contents / lines / line                  (reads)                   │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`](item::ItemRepository) - Inventory CRUD
//! - [`OfferRepository`](offer::OfferRepository) - Bulk offers, one per item
//! - [`CartRepository`](cart::CartRepository) - Cart line state machine

pub mod cart;
pub mod item;
pub mod offer;
