use sqlx::{Executor, Sqlite, SqliteConnection, types::Json};

use crate::models::{NewQuestion, Question};

pub async fn get_question<'e, E>(executor: E, question_id: i64) -> Result<Option<Question>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT
                q.id,
                q.question_number,
                q.topic,
                q.question_text,
                q.options,
                q.correct_answer,
                q.community_vote,
                q.explanation,
                (SELECT json_group_array(qt.tag) FROM question_tags qt WHERE qt.question_id = q.id) AS tags
            FROM questions q
            WHERE q.id = ?1
        "#,
    )
    .bind(question_id)
    .fetch_optional(executor)
    .await
    .map(|question| question.map(sort_tags))
}

pub async fn get_question_by_number<'e, E>(
    executor: E,
    question_number: i64,
) -> Result<Option<Question>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT
                q.id,
                q.question_number,
                q.topic,
                q.question_text,
                q.options,
                q.correct_answer,
                q.community_vote,
                q.explanation,
                (SELECT json_group_array(qt.tag) FROM question_tags qt WHERE qt.question_id = q.id) AS tags
            FROM questions q
            WHERE q.question_number = ?1
        "#,
    )
    .bind(question_number)
    .fetch_optional(executor)
    .await
    .map(|question| question.map(sort_tags))
}

pub async fn list_question_numbers<'e, E>(executor: E) -> Result<Vec<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        // language=SQLite
        r#"
            SELECT question_number
            FROM questions
            ORDER BY question_number
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn count_questions<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        // language=SQLite
        r#"
            SELECT COUNT(*) FROM questions
        "#,
    )
    .fetch_one(executor)
    .await
}

/// Insert a question together with its tags and return its id.
///
/// Run this inside a transaction so a question never lands without its tags.
pub async fn insert_question(
    conn: &mut SqliteConnection,
    question: &NewQuestion,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO questions
                (question_number, topic, question_text, options, correct_answer, community_vote, explanation)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(question.question_number)
    .bind(question.topic)
    .bind(&question.question_text)
    .bind(Json(&question.options))
    .bind(&question.correct_answer)
    .bind(question.community_vote.as_ref().map(Json))
    .bind(&question.explanation)
    .execute(&mut *conn)
    .await?;

    let question_id = result.last_insert_rowid();

    for tag in &question.tags {
        sqlx::query(
            // language=SQLite
            r#"
                INSERT OR IGNORE INTO question_tags (question_id, tag)
                VALUES (?1, ?2)
            "#,
        )
        .bind(question_id)
        .bind(tag)
        .execute(&mut *conn)
        .await?;
    }

    Ok(question_id)
}

/// Backfill the explanation of an existing question.
///
/// Returns `false` when no question has that number.
pub async fn set_explanation<'e, E>(
    executor: E,
    question_number: i64,
    explanation: &str,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        // language=SQLite
        r#"
            UPDATE questions
            SET explanation = ?2
            WHERE question_number = ?1
        "#,
    )
    .bind(question_number)
    .bind(explanation)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn ping<'e, E>(executor: E) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("SELECT 1").execute(executor).await?;
    Ok(())
}

fn sort_tags(mut question: Question) -> Question {
    question.tags.0.sort();
    question
}
