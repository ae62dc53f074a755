//! Shopora Core - Shared catalog, cart and checkout library.
//!
//! This crate provides the domain shared by all Shopora components:
//! - `storefront` - JSON catalog API (memory or `PostgreSQL` backed)
//! - `cli` - Migrations, seeding, and the command-line shopping client
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no network
//! access, no database access, no file I/O. Cart persistence goes through the
//! [`cart::CartStorage`] trait so callers decide where the cart lives.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and slugs
//! - [`catalog`] - Product and category records plus their read models
//! - [`query`] - Filtering, sorting, relevance and pagination
//! - [`api`] - JSON envelopes exchanged between API and client
//! - [`cart`] - Client-side cart state with injected persistence
//! - [`checkout`] - Mock checkout flow
//! - [`fixtures`] - Built-in demo catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod fixtures;
pub mod query;
pub mod types;

pub use catalog::{Category, CategoryRef, Product, ProductRecord};
pub use types::*;
