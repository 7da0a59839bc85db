//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; the PostgreSQL
//! implementation lives in `crate::infrastructure::persistence`.
//! Mock implementations are generated via `mockall` for unit tests.
//!
//! # Testing
//!
//! See integration tests in `tests/repository_short_link.rs` for usage examples.

pub mod short_link_repository;

pub use short_link_repository::ShortLinkRepository;

#[cfg(test)]
pub use short_link_repository::MockShortLinkRepository;
