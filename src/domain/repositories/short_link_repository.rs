//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Repository interface for short links.
///
/// Every method is a single unit of work: implementations acquire a
/// connection for the duration of the call and release it on every exit path.
/// Time-dependent operations take `now` explicitly so that callers control the
/// clock.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Persists a new short link with a zero view counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the token is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by token if it is still active at `now`.
    ///
    /// Expired and unknown tokens both yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_active_by_token(
        &self,
        token: &str,
        now: NaiveDateTime,
    ) -> Result<Option<ShortLink>, AppError>;

    /// Returns true if any record, expired or not, holds `token`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exists(&self, token: &str) -> Result<bool, AppError>;

    /// Adds one to the view counter of `token`, treating an unset counter as 0.
    ///
    /// Ignores expiry. Does nothing if no record matches.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_view_count(&self, token: &str) -> Result<(), AppError>;

    /// Returns the stored view counter for `token`, ignoring expiry.
    ///
    /// `Ok(None)` means either no such record or an unset counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn get_view_count(&self, token: &str) -> Result<Option<i64>, AppError>;

    /// Deletes every record whose expiry is at or before `now`.
    ///
    /// Returns the number of deleted records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn purge_expired(&self, now: NaiveDateTime) -> Result<u64, AppError>;

    /// Returns true if the backing store answers a trivial query.
    async fn health_check(&self) -> bool;
}
