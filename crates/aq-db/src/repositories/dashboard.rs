use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use crate::{
    db_time,
    models::{DailyActivity, SummaryCounts, WeakQuestion},
};

/// Scalar dashboard counters in a single round trip.
pub async fn summary_counts<'e, E>(
    executor: E,
    now: DateTime<Utc>,
    mastery_interval_days: i32,
) -> Result<SummaryCounts, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT
                (SELECT COUNT(*) FROM questions) AS total_questions,
                (SELECT COUNT(*) FROM question_stats) AS attempted,
                (SELECT COUNT(*) FROM answer_history) AS total_answers,
                (SELECT COUNT(*) FROM answer_history WHERE is_correct) AS correct_answers,
                (
                    SELECT COUNT(*) FROM question_stats
                    WHERE times_correct > times_wrong AND interval_days >= ?2
                ) AS mastered,
                (SELECT COUNT(*) FROM question_stats WHERE next_review <= ?1) AS due_for_review
        "#,
    )
    .bind(db_time(now))
    .bind(mastery_interval_days)
    .fetch_one(executor)
    .await
}

/// Answers per calendar day since `since`, oldest day first.
pub async fn recent_activity<'e, E>(
    executor: E,
    since: DateTime<Utc>,
) -> Result<Vec<DailyActivity>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT
                DATE(answered_at) AS date,
                COUNT(*) AS total,
                COALESCE(SUM(is_correct), 0) AS correct
            FROM answer_history
            WHERE answered_at >= ?1
            GROUP BY DATE(answered_at)
            ORDER BY date
        "#,
    )
    .bind(db_time(since))
    .fetch_all(executor)
    .await
}

/// Questions with the worst wrong-minus-correct balance among those missed at least once.
pub async fn weakest_questions<'e, E>(
    executor: E,
    limit: i64,
) -> Result<Vec<WeakQuestion>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT q.question_number, q.question_text, qs.times_correct, qs.times_wrong
            FROM questions q
            JOIN question_stats qs ON qs.question_id = q.id
            WHERE qs.times_wrong > 0
            ORDER BY (qs.times_wrong - qs.times_correct) DESC, q.question_number
            LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(executor)
    .await
}
