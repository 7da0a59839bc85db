//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with bound
//! parameters for every query.
//!
//! # Repositories
//!
//! - [`PgShortLinkRepository`] - Short link storage, lookup, counters, and purging

pub mod pg_short_link_repository;

pub use pg_short_link_repository::PgShortLinkRepository;
