//! Basket Core - Shared types library.
//!
//! This crate provides common types used across all Basket components:
//! - `api` - Backend HTTP JSON API
//! - `client` - Typed API client and product store
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and roles
//! - [`cart`] - Cart item type and the cart mutation rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{CartError, CartItem};
pub use types::*;
