//! Utility functions shared across layers.
//!
//! - [`token_generator`] - Short token generation and reserved-token checks
//! - [`db_error`] - Database error classification

pub mod db_error;
pub mod token_generator;
