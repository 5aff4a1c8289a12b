use aq_db::models::FilterMode;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// One graded answer, as listed in the session results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub question_number: i64,
    pub given: String,
    pub correct: String,
    pub is_correct: bool,
}

/// Where a session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// `index` is zero-based, `question_id` is the question to show
    InProgress {
        index: usize,
        total: usize,
        question_id: i64,
    },
    Complete { score: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResults {
    pub total: usize,
    pub score: usize,
    pub answers: Vec<AnswerResult>,
}

/// An in-memory quiz session.
///
/// Holds a fixed sequence of question ids and walks through it one answer at
/// a time. The session is complete once every question has been answered;
/// `score` always equals the number of correct entries in `answers`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    question_ids: Vec<i64>,
    answers: Vec<AnswerResult>,
    score: usize,
    filter: FilterMode,
    tags: Option<Vec<String>>,
}

impl Session {
    /// Start a session over `question_ids`, which must not be empty.
    pub fn start(
        question_ids: Vec<i64>,
        filter: FilterMode,
        tags: Option<Vec<String>>,
    ) -> Result<Self, ApiError> {
        if question_ids.is_empty() {
            return Err(ApiError::NoMatches);
        }

        Ok(Self {
            answers: Vec::with_capacity(question_ids.len()),
            question_ids,
            score: 0,
            filter,
            tags,
        })
    }

    pub fn total(&self) -> usize {
        self.question_ids.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    pub fn question_ids(&self) -> &[i64] {
        &self.question_ids
    }

    fn position(&self) -> usize {
        self.answers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.position() >= self.total()
    }

    pub fn has_next(&self) -> bool {
        !self.is_complete()
    }

    /// The question awaiting an answer, `None` once complete.
    pub fn current_question_id(&self) -> Option<i64> {
        self.question_ids.get(self.position()).copied()
    }

    pub fn progress(&self) -> Progress {
        match self.current_question_id() {
            Some(question_id) => Progress::InProgress {
                index: self.position(),
                total: self.total(),
                question_id,
            },
            None => Progress::Complete { score: self.score },
        }
    }

    /// Record the graded answer to the current question and advance.
    pub fn record(&mut self, result: AnswerResult) -> Result<(), ApiError> {
        if self.is_complete() {
            return Err(ApiError::SessionComplete);
        }

        if result.is_correct {
            self.score += 1;
        }
        self.answers.push(result);
        Ok(())
    }

    pub fn results(&self) -> SessionResults {
        SessionResults {
            total: self.total(),
            score: self.score,
            answers: self.answers.clone(),
        }
    }
}
