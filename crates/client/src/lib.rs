//! Client state layer for the Basket storefront API.
//!
//! Two pieces:
//!
//! - [`ApiClient`] - a typed reqwest client with a cookie store, one
//!   method per API operation.
//! - [`ProductStore`] - holds the product list a UI renders from,
//!   mirroring catalog responses. State transitions are pure functions so
//!   they can be tested without a server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod http;
pub mod models;
pub mod store;

pub use http::{ApiClient, ClientError};
pub use models::{AuthUser, NewProduct, Product, RecommendedProduct};
pub use store::ProductStore;
