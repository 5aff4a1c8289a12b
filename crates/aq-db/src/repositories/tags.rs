use sqlx::{Executor, Sqlite};

use crate::models::TagCount;

/// Every tag with its question count, most common first.
pub async fn tag_counts<'e, E>(executor: E) -> Result<Vec<TagCount>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT tag, COUNT(*) AS count
            FROM question_tags
            GROUP BY tag
            ORDER BY count DESC, tag
        "#,
    )
    .fetch_all(executor)
    .await
}
