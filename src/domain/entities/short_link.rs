//! Short link entity representing a token to URL mapping.

use chrono::{DateTime, NaiveDateTime, Utc};

/// A stored mapping between a short token and its destination URL.
///
/// Timestamps are naive UTC; any offset supplied by a client is stripped
/// before the record reaches storage (see [`normalize_expiration`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub id: i64,
    pub long_url: String,
    pub token: String,
    pub expires_at: Option<NaiveDateTime>,
    pub view_count: Option<i64>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(
        id: i64,
        long_url: String,
        token: String,
        expires_at: Option<NaiveDateTime>,
        view_count: Option<i64>,
    ) -> Self {
        Self {
            id,
            long_url,
            token,
            expires_at,
            view_count,
        }
    }

    /// Returns true if the link still resolves at `now`.
    ///
    /// A link without an expiry is always active. The instant of expiry
    /// itself counts as expired. Mirrors the `expires_at IS NULL OR
    /// expires_at > $now` filter of `PgShortLinkRepository::find_active_by_token`.
    pub fn is_active_at(&self, now: NaiveDateTime) -> bool {
        self.expires_at.is_none_or(|e| e > now)
    }

    /// Returns true if the link is eligible for purging at `now`.
    ///
    /// Always the exact complement of [`Self::is_active_at`] for links that
    /// carry an expiry. Mirrors the `expires_at IS NOT NULL AND expires_at <=
    /// $now` filter of `PgShortLinkRepository::purge_expired`.
    pub fn is_expired_at(&self, now: NaiveDateTime) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }
}

/// Input data for creating a new short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortLink {
    pub long_url: String,
    pub token: String,
    pub expires_at: Option<NaiveDateTime>,
}

/// Current time as naive UTC, the representation used for every stored timestamp.
pub fn utc_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Drops the UTC offset from an expiration timestamp, keeping its wall-clock value.
pub fn normalize_expiration<Tz: chrono::TimeZone>(at: DateTime<Tz>) -> NaiveDateTime {
    at.naive_local()
}
