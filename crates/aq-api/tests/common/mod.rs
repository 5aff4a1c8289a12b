use std::{collections::BTreeMap, sync::Mutex};

use aq_api::{config::Environment, session::SessionStore, state::ApiState};
use aq_db::{models::NewQuestion, repositories::question};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use axum_extra::extract::cookie::Key;
use http_body_util::BodyExt;
use serde::Deserialize;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const COOKIE_SECRET: &str =
    "test_cookie_secret_minimum_64_characters_long_for_secure_encryption";

/// Build a test ApiState over a fresh in-memory database
pub async fn test_state() -> anyhow::Result<ApiState> {
    let pool = aq_db::create_memory_pool().await?;

    Ok(ApiState {
        pool,
        cookie_key: Key::from(COOKIE_SECRET.as_bytes()),
        sessions: SessionStore::new(chrono::Duration::minutes(30)),
        environment: Environment::Development,
    })
}

/// Router plus state, ready for requests
pub async fn test_app() -> anyhow::Result<(TestClient, ApiState)> {
    let state = test_state().await?;
    let app = aq_api::router::router().with_state(state.clone());
    Ok((TestClient::new(app), state))
}

/// Helper to make requests to the test app.
///
/// Behaves like a browser for the session cookie: it stores whatever the
/// server sets and sends it back on later requests.
pub struct TestClient {
    router: Router,
    cookie: Mutex<Option<String>>,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            cookie: Mutex::new(None),
        }
    }

    /// The `name=value` pair currently sent as the session cookie
    pub fn cookie(&self) -> Option<String> {
        self.cookie.lock().unwrap().clone()
    }

    pub fn set_cookie(&self, cookie: Option<String>) {
        *self.cookie.lock().unwrap() = cookie;
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        let response = TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        };

        if let Some(cookie) = response.get_cookie(aq_api::session::SESSION_COOKIE) {
            self.set_cookie(Some(cookie));
        }

        response
    }

    fn builder(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match self.cookie() {
            Some(cookie) => builder.header("cookie", cookie),
            None => builder,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = self
            .builder("GET", uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = self
            .builder("POST", uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with a raw body and content type
    pub async fn post_raw(&self, uri: &str, content_type: &str, body: &str) -> TestResponse {
        let request = self
            .builder("POST", uri)
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }

    /// Assert an error response of the given status and kind
    pub fn assert_error(&self, expected: StatusCode, kind: &str) {
        self.assert_status(expected);
        let body: serde_json::Value = self.json();
        assert_eq!(body["kind"], kind, "Body: {}", self.text());
    }

    /// Extract the `name=value` pair of a Set-Cookie header
    pub fn get_cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all("set-cookie")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|cookie| cookie.starts_with(&format!("{}=", name)))
            .and_then(|cookie| cookie.split(';').next())
            .map(String::from)
    }
}

/// Database test helper functions
pub mod db {
    use super::*;

    /// A question with options A to D
    pub fn question(number: i64, correct_answer: &str, tags: &[&str]) -> NewQuestion {
        NewQuestion {
            question_number: number,
            topic: 1,
            question_text: format!("Question {number}: which service fits?"),
            options: BTreeMap::from([
                ("A".to_string(), "Amazon S3".to_string()),
                ("B".to_string(), "Amazon EC2".to_string()),
                ("C".to_string(), "AWS Lambda".to_string()),
                ("D".to_string(), "Amazon DynamoDB".to_string()),
            ]),
            correct_answer: correct_answer.to_string(),
            community_vote: None,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            explanation: None,
        }
    }

    pub async fn insert(pool: &SqlitePool, question: &NewQuestion) -> anyhow::Result<i64> {
        let mut tx = pool.begin().await?;
        let id = question::insert_question(&mut tx, question).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Insert questions 1, 2 and 3 answered by "A", "BD" and "C"
    pub async fn seed_three(pool: &SqlitePool) -> anyhow::Result<()> {
        insert(pool, &question(1, "A", &["S3"])).await?;
        insert(pool, &question(2, "BD", &["EC2", "DynamoDB"])).await?;
        insert(pool, &question(3, "C", &["Lambda", "S3"])).await?;
        Ok(())
    }

    pub async fn answer_count(pool: &SqlitePool) -> anyhow::Result<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM answer_history")
            .fetch_one(pool)
            .await?)
    }
}
