use aq_db::{
    models::Question,
    repositories::{question, stats},
};
use aq_srs::{ReviewStats, answers_match, apply_answer};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::model::{AnswerFeedback, CompletionView, QuestionResponse, QuestionView};
use crate::{
    error::ApiError,
    explanation::explain,
    metrics,
    session::{AnswerResult, Progress, Session},
};

/// Load the question a session is waiting on, or its completion summary.
pub async fn current_question(
    pool: &SqlitePool,
    session: &Session,
) -> Result<QuestionResponse, ApiError> {
    match session.progress() {
        Progress::Complete { score } => Ok(QuestionResponse::Complete(CompletionView {
            complete: true,
            score,
        })),
        Progress::InProgress {
            index,
            total,
            question_id,
        } => {
            let question = question::get_question(pool, question_id)
                .await?
                .ok_or(ApiError::NotFound(question_id))?;

            Ok(QuestionResponse::Question(QuestionView {
                index: index + 1,
                total,
                question_number: question.question_number,
                question_text: question.question_text,
                options: question.options.0,
                tags: question.tags.0,
            }))
        }
    }
}

/// Grade `answer` against the session's current question, persist it, and
/// advance the session.
///
/// The session is only advanced once the answer is stored, so a failed
/// write leaves the same question pending.
pub async fn submit_answer(
    pool: &SqlitePool,
    session: &mut Session,
    answer: &str,
    now: DateTime<Utc>,
) -> Result<AnswerFeedback, ApiError> {
    let question_id = session
        .current_question_id()
        .ok_or(ApiError::SessionComplete)?;

    let question: Question = question::get_question(pool, question_id)
        .await?
        .ok_or(ApiError::NotFound(question_id))?;

    let is_correct = answers_match(answer, &question.correct_answer);
    record_answer(pool, question_id, answer, is_correct, now).await?;

    session.record(AnswerResult {
        question_number: question.question_number,
        given: answer.to_string(),
        correct: question.correct_answer.clone(),
        is_correct,
    })?;
    metrics::record_answer(is_correct);

    tracing::debug!(
        question_number = question.question_number,
        is_correct,
        score = session.score(),
        "answer recorded"
    );

    Ok(AnswerFeedback {
        is_correct,
        explanation: explain(&question),
        correct_answer: question.correct_answer,
        score: session.score(),
        has_next: session.has_next(),
    })
}

/// Apply one answer to a question's review stats and append it to the
/// answer log, atomically.
///
/// The question row is locked first so concurrent answers to the same
/// question are applied one after the other.
pub async fn record_answer(
    pool: &SqlitePool,
    question_id: i64,
    answer_given: &str,
    is_correct: bool,
    now: DateTime<Utc>,
) -> Result<ReviewStats, ApiError> {
    let mut tx = pool.begin().await?;

    if !stats::lock_question(&mut *tx, question_id).await? {
        return Err(ApiError::NotFound(question_id));
    }

    let prior = stats::get_review_stats(&mut *tx, question_id).await?;
    let (updated, record) = apply_answer(prior.as_ref(), is_correct, now);

    stats::upsert_review_stats(&mut *tx, question_id, &updated).await?;
    stats::append_answer_event(&mut *tx, question_id, answer_given, &record).await?;

    tx.commit().await?;

    Ok(updated)
}
