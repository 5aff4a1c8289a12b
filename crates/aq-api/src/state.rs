use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use chrono::Duration;
use sqlx::SqlitePool;

use crate::{ApiConfig, config::Environment, session::SessionStore};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub cookie_key: Key,
    pub sessions: SessionStore,
    pub environment: Environment,
}

impl ApiState {
    /// Build the state from a validated config.
    pub fn new(config: &ApiConfig, pool: SqlitePool) -> Self {
        Self {
            pool,
            cookie_key: Key::from(config.cookie_secret.as_bytes()),
            sessions: SessionStore::new(Duration::minutes(config.session_ttl_minutes)),
            environment: config.env,
        }
    }
}

impl FromRef<ApiState> for Key {
    fn from_ref(state: &ApiState) -> Self {
        state.cookie_key.clone()
    }
}

impl FromRef<ApiState> for SessionStore {
    fn from_ref(state: &ApiState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<ApiState> for Environment {
    fn from_ref(state: &ApiState) -> Self {
        state.environment
    }
}
