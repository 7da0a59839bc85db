//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A stored token to URL mapping
//! - [`NewShortLink`] - Input for creating a record
//!
//! Entities are plain data structures. Expiry rules live on [`ShortLink`] so
//! that storage backends and services agree on a single boundary.

pub mod short_link;

pub use short_link::{NewShortLink, ShortLink, normalize_expiration, utc_now};
