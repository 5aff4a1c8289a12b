use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

/// Option letter -> text, kept in letter order.
pub type Options = BTreeMap<String, String>;

/// Question model - one imported exam question
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    /// Unique question identifier
    pub id: i64,
    /// Human-facing question number from the exam dump (unique)
    pub question_number: i64,
    /// Topic number from the exam dump
    pub topic: i64,
    pub question_text: String,
    pub options: Json<Options>,
    /// One or more letters, e.g. "A" or "AB"
    pub correct_answer: String,
    /// Community vote distribution, e.g. {"A": "94%"}
    pub community_vote: Option<Json<BTreeMap<String, String>>>,
    /// Service tags, sorted
    pub tags: Json<Vec<String>>,
    pub explanation: Option<String>,
}

/// Insert struct for Question, also the on-disk JSON format of the importer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question_number: i64,
    #[serde(default = "default_topic")]
    pub topic: i64,
    pub question_text: String,
    pub options: Options,
    pub correct_answer: String,
    #[serde(default)]
    pub community_vote: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

fn default_topic() -> i64 {
    1
}

/// Question selection strategy for a quiz session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Every question
    #[default]
    All,
    /// Questions never answered
    New,
    /// Questions answered wrong more often than right
    Wrong,
    /// Questions whose next review is due
    Due,
}

impl FilterMode {
    pub const ALL: [Self; 4] = [Self::All, Self::New, Self::Wrong, Self::Due];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::New => "new",
            Self::Wrong => "wrong",
            Self::Due => "due",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown filter mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilterMode(pub String);

impl fmt::Display for UnknownFilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown filter mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownFilterMode {}

impl FromStr for FilterMode {
    type Err = UnknownFilterMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownFilterMode(s.to_string()))
    }
}

/// A question that passed a selection filter, with just enough review state
/// to order it
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Candidate {
    pub id: i64,
    pub times_correct: Option<i32>,
    pub times_wrong: Option<i32>,
    pub next_review: Option<DateTime<Utc>>,
}

impl Candidate {
    /// Wrong-minus-correct, 0 for new questions.
    pub fn deficit(&self) -> i32 {
        self.times_wrong.unwrap_or(0) - self.times_correct.unwrap_or(0)
    }
}

/// Number of questions matching each filter mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, FromRow)]
pub struct FilterCounts {
    pub all: i64,
    pub new: i64,
    pub wrong: i64,
    pub due: i64,
}

/// Scalar counters shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, FromRow)]
pub struct SummaryCounts {
    pub total_questions: i64,
    pub attempted: i64,
    pub total_answers: i64,
    pub correct_answers: i64,
    pub mastered: i64,
    pub due_for_review: i64,
}

/// Answers given on one calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub total: i64,
    pub correct: i64,
}

/// A question with more wrong than right answers, for the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WeakQuestion {
    pub question_number: i64,
    pub question_text: String,
    pub times_correct: i32,
    pub times_wrong: i32,
}

/// A tag with the number of questions carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}
