//! DTOs for link shortening endpoint.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortLink;

/// Request to shorten a single URL.
///
/// The URL is treated as opaque text; only its length is checked.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    /// Optional expiry. Offsets are accepted and stripped, see [`optional_iso8601`].
    #[serde(default, with = "optional_iso8601")]
    pub expiration_date: Option<NaiveDateTime>,
}

/// The stored link as returned to the caller.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub id: i64,
    pub url: String,
    pub short_url: String,
    pub expiration_date: Option<NaiveDateTime>,
}

impl From<ShortLink> for ShortenResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            id: link.id,
            url: link.long_url,
            short_url: link.token,
            expiration_date: link.expires_at,
        }
    }
}

/// Serde deserializer for ISO-8601 timestamps with or without a UTC offset.
///
/// Accepts `2024-12-31T00:00:00`, `2024-12-31T00:00:00.250`, `2024-12-31 00:00:00`,
/// `2024-12-31T00:00`, and RFC 3339 values such as `2024-12-31T00:00:00+09:00`.
/// Offsets are dropped and the wall-clock time is kept.
pub mod optional_iso8601 {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    use crate::domain::entities::normalize_expiration;

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        match opt {
            None => Ok(None),
            Some(s) => parse(&s).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid ISO-8601 datetime: '{}'", s))
            }),
        }
    }

    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(normalize_expiration(dt));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    }
}
