use aq_db::models::{DailyActivity, WeakQuestion};
use serde::{Deserialize, Serialize};

/// Body of `GET /api/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_questions: i64,
    pub attempted: i64,
    /// Questions never answered
    pub new_questions: i64,
    pub total_answers: i64,
    pub correct_answers: i64,
    /// Percentage with one decimal, 0.0 when nothing was answered
    pub accuracy: f64,
    pub mastered: i64,
    pub due_for_review: i64,
    pub recent_activity: Vec<DailyActivity>,
    pub weakest_questions: Vec<WeakQuestion>,
}
