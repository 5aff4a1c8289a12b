use aq_db::models::{FilterMode, Options};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_SESSION_SIZE: i64 = 10;
pub const MAX_SESSION_SIZE: i64 = 100;

fn default_count() -> i64 {
    DEFAULT_SESSION_SIZE
}

fn default_filter() -> String {
    FilterMode::All.as_str().to_string()
}

/// Body of `POST /api/start-session`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartSessionRequest {
    #[serde(default = "default_count")]
    #[validate(range(min = 1, max = 100))]
    pub count: i64,
    /// Filter mode name, validated when the session starts
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Returned once a session has started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub total: usize,
    pub filter: FilterMode,
    pub tags: Option<Vec<String>>,
}

/// The current question, without its correct answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    /// Position in the session, starting at 1
    pub index: usize,
    pub total: usize,
    pub question_number: i64,
    pub question_text: String,
    pub options: Options,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionView {
    pub complete: bool,
    pub score: usize,
}

/// Body of `GET /api/question`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionResponse {
    Question(QuestionView),
    Complete(CompletionView),
}

/// Body of `POST /api/answer`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnswerRequest {
    #[validate(length(min = 1, max = 5))]
    pub answer: String,
}

/// Feedback for a submitted answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
    pub score: usize,
    pub has_next: bool,
}
