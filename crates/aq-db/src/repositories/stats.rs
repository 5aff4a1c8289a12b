use aq_srs::{AnswerRecord, ReviewStats};
use chrono::{DateTime, Utc};
use sqlx::{Executor, FromRow, Sqlite};

use crate::db_time;

#[derive(FromRow)]
struct StatsRow {
    times_correct: i32,
    times_wrong: i32,
    last_answered: DateTime<Utc>,
    next_review: DateTime<Utc>,
    ease_factor: f64,
    interval_days: i32,
}

impl From<StatsRow> for ReviewStats {
    fn from(row: StatsRow) -> Self {
        Self {
            times_correct: row.times_correct,
            times_wrong: row.times_wrong,
            last_answered: row.last_answered,
            next_review: row.next_review,
            ease_factor: row.ease_factor,
            interval_days: row.interval_days,
        }
    }
}

/// Take the write lock for a question inside a transaction.
///
/// SQLite grants the database write lock to the first writing statement of a
/// transaction and keeps it until commit, so a no-op update here serializes
/// read-modify-write cycles on review stats. Returns `false` if the question
/// does not exist.
pub async fn lock_question<'e, E>(executor: E, question_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        // language=SQLite
        r#"
            UPDATE questions SET topic = topic WHERE id = ?1
        "#,
    )
    .bind(question_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_review_stats<'e, E>(
    executor: E,
    question_id: i64,
) -> Result<Option<ReviewStats>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: Option<StatsRow> = sqlx::query_as(
        // language=SQLite
        r#"
            SELECT times_correct, times_wrong, last_answered, next_review, ease_factor, interval_days
            FROM question_stats
            WHERE question_id = ?1
        "#,
    )
    .bind(question_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(ReviewStats::from))
}

pub async fn upsert_review_stats<'e, E>(
    executor: E,
    question_id: i64,
    stats: &ReviewStats,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO question_stats
                (question_id, times_correct, times_wrong, last_answered, next_review, ease_factor, interval_days)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (question_id)
            DO UPDATE SET
                times_correct = excluded.times_correct,
                times_wrong = excluded.times_wrong,
                last_answered = excluded.last_answered,
                next_review = excluded.next_review,
                ease_factor = excluded.ease_factor,
                interval_days = excluded.interval_days
        "#,
    )
    .bind(question_id)
    .bind(stats.times_correct)
    .bind(stats.times_wrong)
    .bind(db_time(stats.last_answered))
    .bind(db_time(stats.next_review))
    .bind(stats.ease_factor)
    .bind(stats.interval_days)
    .execute(executor)
    .await?;
    Ok(())
}

/// Append an entry to the answer log and return its id.
pub async fn append_answer_event<'e, E>(
    executor: E,
    question_id: i64,
    answer_given: &str,
    record: &AnswerRecord,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO answer_history (question_id, answer_given, is_correct, answered_at)
            VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question_id)
    .bind(answer_given)
    .bind(record.is_correct)
    .bind(db_time(record.answered_at))
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}
