//! Core types for Shopora.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod slug;

pub use id::*;
pub use price::{Price, PriceError};
pub use slug::{Slug, SlugError};
