use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use axum_extra::extract::PrivateCookieJar;
use chrono::Utc;
use validator::Validate;

use super::{
    model::{
        AnswerFeedback, AnswerRequest, QuestionResponse, SessionDescriptor, StartSessionRequest,
    },
    service,
};
use crate::{
    ApiState,
    error::ApiError,
    metrics, selection,
    session::{ActiveSession, Session, SessionResults, create_session_cookie, session_token},
    validation::{normalize_tags, parse_filter, validate_answer},
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/start-session", post(start_session))
        .route("/question", get(get_question))
        .route("/answer", post(submit_answer))
        .route("/session-results", get(session_results))
}

/// Select questions and start a new session, replacing the caller's
/// previous one
async fn start_session(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
    payload: Result<Json<StartSessionRequest>, JsonRejection>,
) -> Result<(PrivateCookieJar, Json<SessionDescriptor>), ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let filter = parse_filter(&request.filter)?;
    let tags = normalize_tags(request.tags)?;
    let now = Utc::now();

    let question_ids = selection::select_questions(
        &state.pool,
        request.count as usize,
        filter,
        tags.as_deref(),
        now,
    )
    .await?;

    let session = Session::start(question_ids, filter, tags.clone())?;
    let total = session.total();

    let token = state
        .sessions
        .replace(session_token(&jar), session, now)
        .await;

    metrics::record_session_started(filter);
    metrics::set_active_sessions(state.sessions.len().await);
    tracing::info!(session = %token, %filter, total, "session started");

    let jar = jar.add(create_session_cookie(
        token,
        &state.environment,
        state.sessions.ttl(),
    ));

    Ok((jar, Json(SessionDescriptor { total, filter, tags })))
}

async fn get_question(
    State(state): State<ApiState>,
    active: ActiveSession,
) -> Result<Json<QuestionResponse>, ApiError> {
    let session = active.handle.lock().await;
    let response = service::current_question(&state.pool, &session).await?;
    Ok(Json(response))
}

async fn submit_answer(
    State(state): State<ApiState>,
    active: ActiveSession,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerFeedback>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    validate_answer(&request.answer)?;

    let mut session = active.handle.lock().await;
    let feedback =
        service::submit_answer(&state.pool, &mut session, &request.answer, Utc::now()).await?;

    if !feedback.has_next {
        tracing::info!(
            session = %active.token,
            score = feedback.score,
            total = session.total(),
            "session complete"
        );
    }

    Ok(Json(feedback))
}

async fn session_results(active: ActiveSession) -> Json<SessionResults> {
    let session = active.handle.lock().await;
    Json(session.results())
}
