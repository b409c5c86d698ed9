//! Application state shared across handlers

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::response::Html;
use handlebars::Handlebars;
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: SqlitePool,
    sessions: SessionStore,
    templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(pool: SqlitePool, templates: Handlebars<'static>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pool,
                sessions: SessionStore::new(),
                templates,
            }),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Render a registered template into an HTML response body.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<Html<String>, AppError> {
        Ok(Html(self.inner.templates.render(name, data)?))
    }
}

/// In-process session tokens.
///
/// Tokens are random UUIDs issued at login and resolved on every gated
/// request; they die with the process, so a restart logs everyone out.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, i64>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Issue a fresh token for a user.
    pub fn create(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        self.write().insert(token.clone(), user_id);
        token
    }

    /// Resolve a token back to its user id.
    pub fn resolve(&self, token: &str) -> Option<i64> {
        self.read().get(token).copied()
    }

    /// Drop a token. Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.write().remove(token).is_some()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, i64>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, i64>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
