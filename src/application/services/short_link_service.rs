//! Short link creation, resolution, and statistics service.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::domain::entities::{NewShortLink, ShortLink, utc_now};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;
use crate::utils::token_generator::{TokenGenerator, is_reserved};

/// Failed token attempts between two "token space is filling up" warnings.
const COLLISION_WARN_INTERVAL: u64 = 50;

/// Service for creating, resolving, and counting views of short links.
///
/// Coordinates the token generator with the repository so that every issued
/// token is unique among all stored records, including expired records that
/// have not been purged yet.
pub struct ShortLinkService {
    repository: Arc<dyn ShortLinkRepository>,
    generator: Arc<dyn TokenGenerator>,
}

impl ShortLinkService {
    /// Creates a new short link service.
    pub fn new(
        repository: Arc<dyn ShortLinkRepository>,
        generator: Arc<dyn TokenGenerator>,
    ) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Creates a short link for `long_url` with a freshly generated token.
    ///
    /// # Token selection
    ///
    /// Candidates are drawn until one is neither reserved nor present in the
    /// store. There is no attempt cap. If the insert still loses a race on the
    /// token's unique constraint, a new candidate is drawn.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors; these abort the
    /// creation instead of triggering another attempt.
    pub async fn create_short_link(
        &self,
        long_url: String,
        expires_at: Option<NaiveDateTime>,
    ) -> Result<ShortLink, AppError> {
        let mut failed_attempts: u64 = 0;

        loop {
            let token = self.next_free_token(&mut failed_attempts).await?;

            let new_link = NewShortLink {
                long_url: long_url.clone(),
                token,
                expires_at,
            };

            match self.repository.create(new_link).await {
                Ok(link) => {
                    metrics::counter!("shortlink_created_total").increment(1);
                    info!(token = %link.token, id = link.id, "Short link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { details, .. }) => {
                    debug!(%details, "Token taken between check and insert, retrying");
                    failed_attempts += 1;
                    self.note_collision(failed_attempts);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Looks up an active link by token without recording a view.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the token is unknown or expired.
    /// Returns [`AppError::Internal`] on database errors during lookup.
    pub async fn find_active(&self, token: &str) -> Result<ShortLink, AppError> {
        self.repository
            .find_active_by_token(token, utc_now())
            .await?
            .ok_or_else(|| AppError::url_not_found(token))
    }

    /// Records one view of `token`.
    ///
    /// Best-effort: a failed counter update is logged and swallowed.
    pub async fn record_view(&self, token: &str) {
        if let Err(e) = self.repository.increment_view_count(token).await {
            warn!(token, error = %e, "Failed to increment view count");
        }

        metrics::counter!("shortlink_redirects_total").increment(1);
    }

    /// Returns the view counter for a token, ignoring expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the token is unknown or its counter is unset.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn view_count(&self, token: &str) -> Result<i64, AppError> {
        self.repository
            .get_view_count(token)
            .await?
            .ok_or_else(|| AppError::url_not_found(token))
    }

    /// Deletes all links whose expiry has passed. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let purged = self.repository.purge_expired(utc_now()).await?;

        metrics::counter!("shortlink_purged_total").increment(purged);

        if purged > 0 {
            info!(purged, "Purged expired short links");
        } else {
            debug!("No expired short links to purge");
        }

        Ok(purged)
    }

    /// Returns true if the backing store is reachable.
    pub async fn health_check(&self) -> bool {
        self.repository.health_check().await
    }

    /// Draws candidates until one is free, counting failed attempts.
    async fn next_free_token(&self, failed_attempts: &mut u64) -> Result<String, AppError> {
        loop {
            let token = self.generator.generate();

            if !is_reserved(&token) && !self.repository.exists(&token).await? {
                return Ok(token);
            }

            *failed_attempts += 1;
            self.note_collision(*failed_attempts);
        }
    }

    fn note_collision(&self, failed_attempts: u64) {
        metrics::counter!("shortlink_token_collisions_total").increment(1);

        if failed_attempts % COLLISION_WARN_INTERVAL == 0 {
            warn!(
                failed_attempts,
                "Unusually many token collisions; the free token space may be running out"
            );
        }
    }
}
