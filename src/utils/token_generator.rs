//! Short token generation.
//!
//! Tokens are drawn uniformly from the 62 ASCII alphanumerics. Generators carry
//! no uniqueness guarantee; the caller checks the store and retries on
//! collision.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Default number of characters in a generated token.
pub const DEFAULT_TOKEN_LENGTH: usize = 6;

/// Bounds accepted for `TOKEN_LENGTH`.
pub const MIN_TOKEN_LENGTH: usize = 4;
pub const MAX_TOKEN_LENGTH: usize = 32;

/// Tokens that would be shadowed by fixed routes and are never handed out.
pub const RESERVED_TOKENS: &[&str] = &["health", "shorten", "stats"];

/// Source of candidate short tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random alphanumeric tokens of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct RandomTokenGenerator {
    length: usize,
}

impl RandomTokenGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomTokenGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LENGTH)
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// Returns true if `token` collides with a fixed route segment.
pub fn is_reserved(token: &str) -> bool {
    RESERVED_TOKENS.contains(&token)
}
