#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use chrono::{Duration, NaiveDateTime};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower_http::normalize_path::NormalizePath;

use shortlink::application::services::ShortLinkService;
use shortlink::domain::entities::{NewShortLink, ShortLink, utc_now};
use shortlink::domain::repositories::ShortLinkRepository;
use shortlink::error::AppError;
use shortlink::routes::{app_router, router};
use shortlink::state::AppState;
use shortlink::utils::token_generator::{RandomTokenGenerator, TokenGenerator};

/// Repository double keeping rows in memory with the same semantics as the
/// PostgreSQL implementation, including the unique token constraint.
pub struct InMemoryShortLinkRepository {
    rows: Mutex<Vec<ShortLink>>,
    next_id: Mutex<i64>,
    healthy: AtomicBool,
}

impl InMemoryShortLinkRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            healthy: AtomicBool::new(true),
        }
    }

    /// Inserts a row directly, bypassing the service.
    pub fn insert_raw(
        &self,
        token: &str,
        url: &str,
        expires_at: Option<NaiveDateTime>,
        view_count: Option<i64>,
    ) -> ShortLink {
        let mut next_id = self.next_id.lock().unwrap();
        let link = ShortLink::new(
            *next_id,
            url.to_string(),
            token.to_string(),
            expires_at,
            view_count,
        );
        *next_id += 1;
        self.rows.lock().unwrap().push(link.clone());
        link
    }

    /// Tokens of every stored row, expired or not.
    pub fn tokens(&self) -> Vec<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .map(|l| l.token.clone())
            .collect()
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl ShortLinkRepository for InMemoryShortLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        if self.tokens().contains(&new_link.token) {
            return Err(AppError::conflict(
                "Token already exists",
                serde_json::json!({ "token": new_link.token }),
            ));
        }

        Ok(self.insert_raw(
            &new_link.token,
            &new_link.long_url,
            new_link.expires_at,
            Some(0),
        ))
    }

    async fn find_active_by_token(
        &self,
        token: &str,
        now: NaiveDateTime,
    ) -> Result<Option<ShortLink>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.token == token && l.is_active_at(now))
            .cloned())
    }

    async fn exists(&self, token: &str) -> Result<bool, AppError> {
        Ok(self.rows.lock().unwrap().iter().any(|l| l.token == token))
    }

    async fn increment_view_count(&self, token: &str) -> Result<(), AppError> {
        if let Some(link) = self
            .rows
            .lock()
            .unwrap()
            .iter_mut()
            .find(|l| l.token == token)
        {
            link.view_count = Some(link.view_count.unwrap_or(0) + 1);
        }
        Ok(())
    }

    async fn get_view_count(&self, token: &str) -> Result<Option<i64>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.token == token)
            .and_then(|l| l.view_count))
    }

    async fn purge_expired(&self, now: NaiveDateTime) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|l| !l.is_expired_at(now));
        Ok((before - rows.len()) as u64)
    }

    async fn health_check(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

/// Generator that replays a fixed script, then falls back to random tokens.
pub struct ScriptedTokenGenerator {
    script: Mutex<VecDeque<String>>,
    fallback: RandomTokenGenerator,
}

impl ScriptedTokenGenerator {
    pub fn new(tokens: &[&str]) -> Self {
        Self {
            script: Mutex::new(tokens.iter().map(|t| t.to_string()).collect()),
            fallback: RandomTokenGenerator::default(),
        }
    }
}

impl TokenGenerator for ScriptedTokenGenerator {
    fn generate(&self) -> String {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.generate())
    }
}

pub fn future(days: i64) -> NaiveDateTime {
    utc_now() + Duration::days(days)
}

pub fn past(days: i64) -> NaiveDateTime {
    utc_now() - Duration::days(days)
}

pub fn create_test_service(
    repo: Arc<InMemoryShortLinkRepository>,
    generator: Arc<dyn TokenGenerator>,
) -> Arc<ShortLinkService> {
    Arc::new(ShortLinkService::new(repo, generator))
}

/// Full application router over an in-memory store.
pub fn create_test_server(
    repo: Arc<InMemoryShortLinkRepository>,
    generator: Arc<dyn TokenGenerator>,
) -> TestServer {
    let state = AppState::new(create_test_service(repo, generator));
    TestServer::new(router(state)).unwrap()
}

pub fn create_default_server() -> (TestServer, Arc<InMemoryShortLinkRepository>) {
    let repo = Arc::new(InMemoryShortLinkRepository::new());
    let server = create_test_server(repo.clone(), Arc::new(RandomTokenGenerator::default()));
    (server, repo)
}

/// Router exactly as served by the binary, trailing-slash normalization included.
pub fn create_test_app(repo: Arc<InMemoryShortLinkRepository>) -> NormalizePath<Router> {
    let service = create_test_service(repo, Arc::new(RandomTokenGenerator::default()));
    app_router(AppState::new(service))
}
