use std::collections::HashMap;

use aq_api::quiz::{
    model::{AnswerFeedback, QuestionView, SessionDescriptor},
    service,
};
use aq_db::repositories::{question, stats};
use axum::http::StatusCode;
use chrono::Utc;
use serde_json::{Value, json};

use crate::common::{TestClient, db, test_app};

/// Start a session and return its descriptor
async fn start(client: &TestClient, body: Value) -> SessionDescriptor {
    let response = client.post_json("/api/start-session", &body).await;
    response.assert_status(StatusCode::OK);
    response.json()
}

async fn current(client: &TestClient) -> QuestionView {
    let response = client.get("/api/question").await;
    response.assert_status(StatusCode::OK);
    response.json()
}

async fn answer(client: &TestClient, letters: &str) -> AnswerFeedback {
    let response = client
        .post_json("/api/answer", &json!({ "answer": letters }))
        .await;
    response.assert_status(StatusCode::OK);
    response.json()
}

#[tokio::test]
async fn test_full_session_flow() {
    let (client, state) = test_app().await.unwrap();
    db::seed_three(&state.pool).await.unwrap();

    let descriptor = start(&client, json!({ "count": 3, "filter": "all" })).await;
    assert_eq!(descriptor.total, 3);
    assert!(client.cookie().is_some(), "session cookie should be set");

    // question 2 is answered wrong, the others right
    let replies = HashMap::from([(1, "A"), (2, "B"), (3, "C")]);
    let mut seen = Vec::new();

    for index in 1..=3 {
        let view = current(&client).await;
        assert_eq!(view.index, index);
        assert_eq!(view.total, 3);
        assert_eq!(view.options.len(), 4);
        seen.push(view.question_number);

        let feedback = answer(&client, replies[&view.question_number]).await;
        assert_eq!(feedback.is_correct, view.question_number != 2);
        assert_eq!(feedback.has_next, index < 3);
        assert!(!feedback.explanation.is_empty());
    }

    let response = client.get("/api/question").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "complete": true, "score": 2 })
    );

    let results: Value = client.get("/api/session-results").await.json();
    assert_eq!(results["total"], 3);
    assert_eq!(results["score"], 2);
    let answers = results["answers"].as_array().unwrap();
    assert_eq!(answers.len(), 3);
    // results follow the order the questions were asked in
    for (entry, number) in answers.iter().zip(&seen) {
        assert_eq!(entry["question_number"], *number);
    }
    let wrong = answers.iter().find(|a| a["question_number"] == 2).unwrap();
    assert_eq!(wrong["given"], "B");
    assert_eq!(wrong["correct"], "BD");
    assert_eq!(wrong["is_correct"], false);

    seen.sort();
    assert_eq!(seen, [1, 2, 3]);

    // review state was persisted
    let q1 = question::get_question_by_number(&state.pool, 1)
        .await
        .unwrap()
        .unwrap();
    let q1_stats = stats::get_review_stats(&state.pool, q1.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(q1_stats.times_correct, 1);
    assert_eq!(q1_stats.interval_days, 1);
    assert_eq!(q1_stats.ease_factor, 2.6);

    let q2 = question::get_question_by_number(&state.pool, 2)
        .await
        .unwrap()
        .unwrap();
    let q2_stats = stats::get_review_stats(&state.pool, q2.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(q2_stats.times_wrong, 1);
    assert_eq!(q2_stats.interval_days, 0);
    assert_eq!(q2_stats.ease_factor, 2.3);

    assert_eq!(db::answer_count(&state.pool).await.unwrap(), 3);
}

#[tokio::test]
async fn test_last_answer_wrong() {
    let (client, state) = test_app().await.unwrap();
    db::seed_three(&state.pool).await.unwrap();
    start(&client, json!({ "count": 3 })).await;

    let correct = HashMap::from([(1, "A"), (2, "BD"), (3, "C")]);
    for _ in 0..2 {
        let view = current(&client).await;
        assert!(answer(&client, correct[&view.question_number]).await.is_correct);
    }
    let last = current(&client).await;
    assert_eq!(last.index, 3);
    let feedback = answer(&client, "F").await;
    assert!(!feedback.is_correct);
    assert_eq!(feedback.score, 2);
    assert!(!feedback.has_next);

    let results: Value = client.get("/api/session-results").await.json();
    assert_eq!(results["total"], 3);
    assert_eq!(results["score"], 2);
    let answers = results["answers"].as_array().unwrap();
    assert_eq!(answers.len(), 3);
    assert_eq!(answers[0]["is_correct"], true);
    assert_eq!(answers[1]["is_correct"], true);
    assert_eq!(answers[2]["is_correct"], false);
    assert_eq!(answers[2]["question_number"], last.question_number);

    let stats: Value = client.get("/api/stats").await.json();
    assert_eq!(stats["total_answers"], 3);
    assert_eq!(stats["correct_answers"], 2);
}

#[tokio::test]
async fn test_question_withholds_answer_and_is_idempotent() {
    let (client, state) = test_app().await.unwrap();
    db::seed_three(&state.pool).await.unwrap();
    start(&client, json!({ "count": 2 })).await;

    let first = client.get("/api/question").await;
    let second = client.get("/api/question").await;
    first.assert_status(StatusCode::OK);

    let first: Value = first.json();
    assert!(first.get("correct_answer").is_none());
    assert!(first.get("explanation").is_none());
    assert_eq!(first, second.json::<Value>());
    assert_eq!(db::answer_count(&state.pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_multi_answer_in_any_order() {
    let (client, state) = test_app().await.unwrap();
    db::insert(&state.pool, &db::question(2, "BD", &[]))
        .await
        .unwrap();
    start(&client, json!({ "count": 1 })).await;

    let feedback = answer(&client, "DB").await;

    assert!(feedback.is_correct);
    assert_eq!(feedback.correct_answer, "BD");
    assert_eq!(feedback.score, 1);
    assert!(!feedback.has_next);
    assert_eq!(
        feedback.explanation,
        "Correct answers: BD\nB. Amazon EC2\nD. Amazon DynamoDB"
    );
}

#[tokio::test]
async fn test_answer_after_completion_conflicts() {
    let (client, state) = test_app().await.unwrap();
    db::insert(&state.pool, &db::question(1, "A", &[]))
        .await
        .unwrap();
    start(&client, json!({ "count": 1 })).await;
    answer(&client, "A").await;

    let response = client
        .post_json("/api/answer", &json!({ "answer": "A" }))
        .await;

    response.assert_error(StatusCode::CONFLICT, "session_complete");
    assert_eq!(db::answer_count(&state.pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_requests_without_session() {
    let (client, _state) = test_app().await.unwrap();

    client
        .get("/api/question")
        .await
        .assert_error(StatusCode::BAD_REQUEST, "no_active_session");
    client
        .post_json("/api/answer", &json!({ "answer": "A" }))
        .await
        .assert_error(StatusCode::BAD_REQUEST, "no_active_session");
    client
        .get("/api/session-results")
        .await
        .assert_error(StatusCode::BAD_REQUEST, "no_active_session");
}

#[tokio::test]
async fn test_forged_cookie_is_rejected() {
    let (client, state) = test_app().await.unwrap();
    db::seed_three(&state.pool).await.unwrap();
    client.set_cookie(Some(format!(
        "{}={}",
        aq_api::session::SESSION_COOKIE,
        uuid::Uuid::new_v4()
    )));

    client
        .get("/api/question")
        .await
        .assert_error(StatusCode::BAD_REQUEST, "no_active_session");
}

#[tokio::test]
async fn test_new_session_replaces_previous() {
    let (client, state) = test_app().await.unwrap();
    db::seed_three(&state.pool).await.unwrap();

    start(&client, json!({ "count": 3 })).await;
    answer(&client, "A").await;
    let old_cookie = client.cookie();

    let descriptor = start(&client, json!({ "count": 2 })).await;
    assert_eq!(descriptor.total, 2);
    assert_ne!(client.cookie(), old_cookie);
    assert_eq!(current(&client).await.index, 1);
    assert_eq!(state.sessions.len().await, 1);

    client.set_cookie(old_cookie);
    client
        .get("/api/question")
        .await
        .assert_error(StatusCode::BAD_REQUEST, "no_active_session");
}

#[tokio::test]
async fn test_invalid_start_requests() {
    let (client, state) = test_app().await.unwrap();
    db::seed_three(&state.pool).await.unwrap();

    for body in [
        json!({ "count": 0 }),
        json!({ "count": 101 }),
        json!({ "count": "ten" }),
        json!({ "filter": "bogus" }),
        json!({ "tags": "S3" }),
    ] {
        client
            .post_json("/api/start-session", &body)
            .await
            .assert_error(StatusCode::BAD_REQUEST, "invalid_input");
    }

    client
        .post_raw("/api/start-session", "application/json", "{not json")
        .await
        .assert_error(StatusCode::BAD_REQUEST, "invalid_input");
    client
        .post_raw("/api/start-session", "text/plain", r#"{"count": 3}"#)
        .await
        .assert_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_media_type");

    assert!(client.cookie().is_none());
}

#[tokio::test]
async fn test_invalid_answers() {
    let (client, state) = test_app().await.unwrap();
    db::seed_three(&state.pool).await.unwrap();
    start(&client, json!({ "count": 3 })).await;
    let before = current(&client).await;

    for letters in ["", "A1", "ABCDEF", "A B", "AAB"] {
        client
            .post_json("/api/answer", &json!({ "answer": letters }))
            .await
            .assert_error(StatusCode::BAD_REQUEST, "invalid_input");
    }
    client
        .post_json("/api/answer", &json!({}))
        .await
        .assert_error(StatusCode::BAD_REQUEST, "invalid_input");

    // nothing was recorded and the session did not move
    assert_eq!(db::answer_count(&state.pool).await.unwrap(), 0);
    assert_eq!(current(&client).await.question_number, before.question_number);
}

#[tokio::test]
async fn test_no_matching_questions() {
    let (client, state) = test_app().await.unwrap();

    client
        .post_json("/api/start-session", &json!({}))
        .await
        .assert_error(StatusCode::UNPROCESSABLE_ENTITY, "no_matches");

    db::seed_three(&state.pool).await.unwrap();

    for body in [
        json!({ "filter": "wrong" }),
        json!({ "filter": "due" }),
        json!({ "tags": ["Redshift"] }),
    ] {
        client
            .post_json("/api/start-session", &body)
            .await
            .assert_error(StatusCode::UNPROCESSABLE_ENTITY, "no_matches");
    }
}

#[tokio::test]
async fn test_filters_follow_review_state() {
    let (client, state) = test_app().await.unwrap();
    db::seed_three(&state.pool).await.unwrap();

    // answer question 1 right and question 3 wrong
    let q1 = question::get_question_by_number(&state.pool, 1)
        .await
        .unwrap()
        .unwrap();
    let q3 = question::get_question_by_number(&state.pool, 3)
        .await
        .unwrap()
        .unwrap();
    service::record_answer(&state.pool, q1.id, "A", true, Utc::now())
        .await
        .unwrap();
    service::record_answer(&state.pool, q3.id, "D", false, Utc::now())
        .await
        .unwrap();

    let descriptor = start(&client, json!({ "count": 10, "filter": "new" })).await;
    assert_eq!(descriptor.total, 1);
    assert_eq!(current(&client).await.question_number, 2);

    let descriptor = start(&client, json!({ "filter": "wrong" })).await;
    assert_eq!(descriptor.total, 1);
    assert_eq!(current(&client).await.question_number, 3);

    let descriptor = start(&client, json!({ "filter": "due" })).await;
    assert_eq!(descriptor.total, 1);
    assert_eq!(current(&client).await.question_number, 3);
}

#[tokio::test]
async fn test_tag_filter() {
    let (client, state) = test_app().await.unwrap();
    db::seed_three(&state.pool).await.unwrap();

    let descriptor = start(&client, json!({ "tags": ["S3", "", "S3"] })).await;
    assert_eq!(descriptor.total, 2);
    assert_eq!(descriptor.tags, Some(vec!["S3".to_string()]));

    let mut numbers = Vec::new();
    for _ in 0..2 {
        let view = current(&client).await;
        assert!(view.tags.contains(&"S3".to_string()));
        numbers.push(view.question_number);
        answer(&client, "A").await;
    }
    numbers.sort();
    assert_eq!(numbers, [1, 3]);

    // an empty tag list means no tag filter
    let descriptor = start(&client, json!({ "tags": [] })).await;
    assert_eq!(descriptor.total, 3);
    assert_eq!(descriptor.tags, None);
}

#[tokio::test]
async fn test_answers_from_many_tasks_are_all_counted() {
    let (_client, state) = test_app().await.unwrap();
    let id = db::insert(&state.pool, &db::question(9, "A", &[]))
        .await
        .unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let pool = state.pool.clone();
            tokio::spawn(async move {
                service::record_answer(&pool, id, "A", i % 2 == 0, Utc::now()).await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let stats = stats::get_review_stats(&state.pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stats.times_correct, 4);
    assert_eq!(stats.times_wrong, 4);
    assert_eq!(db::answer_count(&state.pool).await.unwrap(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_answers_to_one_question() {
    let dir = tempfile::TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("quiz.db").display());
    let pool = aq_db::create_pool(&url, 8).await.unwrap();
    aq_db::migrate(&pool).await.unwrap();
    let id = db::insert(&pool, &db::question(9, "A", &[])).await.unwrap();

    let tasks: Vec<_> = (0..40)
        .map(|i| {
            let pool = pool.clone();
            tokio::spawn(async move {
                service::record_answer(&pool, id, "A", i % 2 == 0, Utc::now()).await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let stats = stats::get_review_stats(&pool, id).await.unwrap().unwrap();
    assert_eq!(stats.times_correct, 20);
    assert_eq!(stats.times_wrong, 20);
    assert_eq!(db::answer_count(&pool).await.unwrap(), 40);

    pool.close().await;
}

#[tokio::test]
async fn test_record_answer_unknown_question() {
    let (_client, state) = test_app().await.unwrap();

    let result = service::record_answer(&state.pool, 404, "A", true, Utc::now()).await;

    assert!(matches!(result, Err(aq_api::error::ApiError::NotFound(404))));
    assert_eq!(db::answer_count(&state.pool).await.unwrap(), 0);
}
