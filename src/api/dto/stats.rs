//! DTOs for the view counter endpoint.

use serde::Serialize;

/// View counter of a single short link.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub short_url: String,
    pub view_count: i64,
}
