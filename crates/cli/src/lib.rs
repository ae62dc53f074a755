//! Shopora CLI library: the storefront API client and local cart storage.
//!
//! The `shopora` binary builds its commands on these; the integration tests
//! drive a running server through the same [`client::ApiClient`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod output;
pub mod storage;

pub use client::{ApiClient, ClientError};
pub use storage::FileStorage;
