//! PostgreSQL implementation of the short link repository.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_token;

/// Row shape of the `short_links` table.
#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    id: i64,
    long_url: String,
    token: String,
    expires_at: Option<NaiveDateTime>,
    view_count: Option<i64>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        ShortLink::new(
            row.id,
            row.long_url,
            row.token,
            row.expires_at,
            row.view_count,
        )
    }
}

/// PostgreSQL repository for short links.
///
/// Each method runs a single statement on a pooled connection, so every
/// operation is atomic on its own and the connection goes back to the pool
/// when the call returns. All timestamps are bound as naive UTC values.
pub struct PgShortLinkRepository {
    pool: Arc<PgPool>,
}

impl PgShortLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortLinkRepository for PgShortLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        sqlx::query_as::<_, ShortLinkRow>(
            r#"
            INSERT INTO short_links (long_url, token, expires_at, view_count)
            VALUES ($1, $2, $3, 0)
            RETURNING id, long_url, token, expires_at, view_count
            "#,
        )
        .bind(&new_link.long_url)
        .bind(&new_link.token)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map(ShortLink::from)
        .map_err(|e| {
            if is_unique_violation_on_token(&e) {
                AppError::conflict("Token already exists", json!({ "token": new_link.token }))
            } else {
                e.into()
            }
        })
    }

    async fn find_active_by_token(
        &self,
        token: &str,
        now: NaiveDateTime,
    ) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT id, long_url, token, expires_at, view_count
            FROM short_links
            WHERE token = $1
              AND (expires_at IS NULL OR expires_at > $2)
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn exists(&self, token: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM short_links WHERE token = $1)",
        )
        .bind(token)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn increment_view_count(&self, token: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE short_links
            SET view_count = COALESCE(view_count, 0) + 1
            WHERE token = $1
            "#,
        )
        .bind(token)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn get_view_count(&self, token: &str) -> Result<Option<i64>, AppError> {
        let count = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT view_count FROM short_links WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(count.flatten())
    }

    async fn purge_expired(&self, now: NaiveDateTime) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM short_links
            WHERE expires_at IS NOT NULL
              AND expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
            .is_ok()
    }
}
