use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use crate::{
    db_time,
    models::{Candidate, FilterCounts, FilterMode},
};

/// Serialize a tag filter for `json_each`; `None` disables the filter.
fn tag_filter(tags: Option<&[String]>) -> Option<String> {
    tags.filter(|tags| !tags.is_empty())
        .and_then(|tags| serde_json::to_string(tags).ok())
}

/// List every question passing `filter` and the tag filter, unordered.
///
/// A question passes the tag filter when it carries at least one of `tags`.
pub async fn list_candidates<'e, E>(
    executor: E,
    filter: FilterMode,
    tags: Option<&[String]>,
    now: DateTime<Utc>,
) -> Result<Vec<Candidate>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT
                q.id,
                qs.times_correct,
                qs.times_wrong,
                qs.next_review
            FROM questions q
            LEFT JOIN question_stats qs ON qs.question_id = q.id
            WHERE (
                ?1 IS NULL OR EXISTS (
                    SELECT 1 FROM question_tags qt
                    WHERE qt.question_id = q.id
                        AND qt.tag IN (SELECT value FROM json_each(?1))
                )
            )
            AND CASE ?2
                WHEN 'new' THEN qs.question_id IS NULL
                WHEN 'wrong' THEN qs.times_wrong > qs.times_correct
                WHEN 'due' THEN qs.next_review <= ?3
                ELSE 1
            END
        "#,
    )
    .bind(tag_filter(tags))
    .bind(filter.as_str())
    .bind(db_time(now))
    .fetch_all(executor)
    .await
}

/// Count the questions matching each filter mode under the tag filter.
pub async fn filter_counts<'e, E>(
    executor: E,
    tags: Option<&[String]>,
    now: DateTime<Utc>,
) -> Result<FilterCounts, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT
                COUNT(*) AS "all",
                COALESCE(SUM(CASE WHEN qs.question_id IS NULL THEN 1 ELSE 0 END), 0) AS new,
                COALESCE(SUM(CASE WHEN qs.times_wrong > qs.times_correct THEN 1 ELSE 0 END), 0) AS wrong,
                COALESCE(SUM(CASE WHEN qs.next_review <= ?2 THEN 1 ELSE 0 END), 0) AS due
            FROM questions q
            LEFT JOIN question_stats qs ON qs.question_id = q.id
            WHERE (
                ?1 IS NULL OR EXISTS (
                    SELECT 1 FROM question_tags qt
                    WHERE qt.question_id = q.id
                        AND qt.tag IN (SELECT value FROM json_each(?1))
                )
            )
        "#,
    )
    .bind(tag_filter(tags))
    .bind(db_time(now))
    .fetch_one(executor)
    .await
}
