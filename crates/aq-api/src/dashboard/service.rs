use aq_db::repositories::dashboard;
use aq_srs::MASTERY_INTERVAL_DAYS;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use super::model::DashboardStats;

/// Days of answer history shown on the dashboard
pub const ACTIVITY_WINDOW_DAYS: i64 = 7;
/// Number of weakest questions listed
pub const WEAKEST_LIMIT: i64 = 5;

/// Collect every dashboard figure from one read transaction so they agree
/// with each other.
pub async fn dashboard_stats(
    pool: &SqlitePool,
    now: DateTime<Utc>,
) -> Result<DashboardStats, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let summary = dashboard::summary_counts(&mut *tx, now, MASTERY_INTERVAL_DAYS).await?;
    let recent_activity =
        dashboard::recent_activity(&mut *tx, now - Duration::days(ACTIVITY_WINDOW_DAYS)).await?;
    let weakest_questions = dashboard::weakest_questions(&mut *tx, WEAKEST_LIMIT).await?;

    tx.commit().await?;

    Ok(DashboardStats {
        total_questions: summary.total_questions,
        attempted: summary.attempted,
        new_questions: summary.total_questions - summary.attempted,
        total_answers: summary.total_answers,
        correct_answers: summary.correct_answers,
        accuracy: accuracy(summary.correct_answers, summary.total_answers),
        mastered: summary.mastered,
        due_for_review: summary.due_for_review,
        recent_activity,
        weakest_questions,
    })
}

/// `correct / total` as a percentage rounded to one decimal.
pub fn accuracy(correct: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (correct as f64 * 1000.0 / total as f64).round() / 10.0
}
