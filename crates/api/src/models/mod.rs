//! Domain types for the API.
//!
//! These types represent validated domain objects separate from database
//! row types. The catalog/coupon/order types also serve as wire types, so
//! they serialize with the camelCase field names the JSON API exposes.

pub mod coupon;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use coupon::Coupon;
pub use order::Order;
pub use product::{Product, RecommendedProduct};
pub use session::{CurrentUser, session_keys};
pub use user::User;
