//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers, the startup purge, and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::short_link_service::ShortLinkService`] - Token issuance, resolution, view counts, and purging

pub mod services;
