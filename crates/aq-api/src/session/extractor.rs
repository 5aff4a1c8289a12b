use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use chrono::Utc;
use uuid::Uuid;

use super::{cookies::session_token, store::{SessionHandle, SessionStore}};
use crate::error::ApiError;

/// Extractor for the caller's live quiz session.
///
/// Rejects with `NoActiveSession` when the cookie is missing, cannot be
/// decrypted, or points at a session that expired or was replaced.
///
/// # Example
/// ```
/// use aq_api::{error::ApiError, session::ActiveSession};
///
/// async fn current(active: ActiveSession) -> Result<String, ApiError> {
///     let session = active.handle.lock().await;
///     Ok(format!("{} questions", session.total()))
/// }
/// ```
pub struct ActiveSession {
    pub token: Uuid,
    pub handle: SessionHandle,
}

impl<S> FromRequestParts<S> for ActiveSession
where
    SessionStore: FromRef<S>,
    Key: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = SessionStore::from_ref(state);

        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NoActiveSession)?;

        let token = session_token(&jar).ok_or(ApiError::NoActiveSession)?;
        let handle = store
            .get(token, Utc::now())
            .await
            .ok_or(ApiError::NoActiveSession)?;

        Ok(Self { token, handle })
    }
}
