//! SRS (Spaced Repetition System) library for the AWS quiz
//!
//! This crate provides the SM-2 style review scheduler and the answer grading
//! rules. Everything here is pure: callers pass the prior state and the clock
//! reading, and persist whatever comes back.

mod grading;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use grading::{answer_letters, answers_match};

/// Ease factor given to a question on its first answer.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
/// Lower clamp for the ease factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Upper clamp for the ease factor.
pub const MAX_EASE_FACTOR: f64 = 3.0;
/// Interval (in days) from which a question counts as mastered.
pub const MASTERY_INTERVAL_DAYS: i32 = 7;
/// Longest interval the scheduler hands out (ten years).
pub const MAX_INTERVAL_DAYS: i32 = 3650;

const EASE_BONUS: f64 = 0.1;
const EASE_PENALTY: f64 = 0.2;

/// Review statistics for a single question.
///
/// A question without review statistics has never been answered and is
/// considered "new".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    /// Number of correct answers
    pub times_correct: i32,
    /// Number of wrong answers
    pub times_wrong: i32,
    /// When the question was last answered
    pub last_answered: DateTime<Utc>,
    /// When the question is due again
    pub next_review: DateTime<Utc>,
    /// Interval multiplier, always within `[MIN_EASE_FACTOR, MAX_EASE_FACTOR]`
    pub ease_factor: f64,
    /// Days between `last_answered` and `next_review`
    pub interval_days: i32,
}

impl ReviewStats {
    /// Whether the question is due for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    /// How many more times the question was missed than answered correctly.
    pub fn deficit(&self) -> i32 {
        self.times_wrong - self.times_correct
    }

    /// Whether the question counts as mastered on the dashboard.
    pub fn is_mastered(&self) -> bool {
        self.times_correct > self.times_wrong && self.interval_days >= MASTERY_INTERVAL_DAYS
    }
}

/// The history fragment produced alongside updated stats.
///
/// The caller completes it with the letters that were given and appends it to
/// the answer log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// Apply one answer to a question's review statistics.
///
/// # Arguments
///
/// * `prior` - The current stats, or `None` if the question was never answered
/// * `is_correct` - Whether the submitted answer was correct
/// * `now` - The time the answer was given
///
/// # Returns
///
/// The updated stats together with the answer log entry. Both must be
/// persisted together.
///
/// # Algorithm
///
/// * First answer: ease 2.5, interval 1 day if correct, 0 otherwise
/// * Correct: interval 0 → 1, 1 → 3, otherwise `floor(interval × ease)`;
///   ease grows by 0.1 up to 3.0
/// * Wrong: interval resets to 0; ease shrinks by 0.2 down to 1.3
///
/// An interval of 0 means the question is due again immediately.
pub fn apply_answer(
    prior: Option<&ReviewStats>,
    is_correct: bool,
    now: DateTime<Utc>,
) -> (ReviewStats, AnswerRecord) {
    let stats = match prior {
        None => {
            let interval_days = if is_correct { 1 } else { 0 };
            ReviewStats {
                times_correct: i32::from(is_correct),
                times_wrong: i32::from(!is_correct),
                last_answered: now,
                next_review: now + Duration::days(i64::from(interval_days)),
                ease_factor: DEFAULT_EASE_FACTOR,
                interval_days,
            }
        }
        Some(prior) => {
            debug_assert!(prior.interval_days >= 0, "negative review interval");
            debug_assert!(!prior.ease_factor.is_nan(), "NaN ease factor");

            let (interval_days, ease_factor) = if is_correct {
                (
                    next_interval(prior.interval_days, prior.ease_factor),
                    round_ease((prior.ease_factor + EASE_BONUS).min(MAX_EASE_FACTOR)),
                )
            } else {
                (
                    0,
                    round_ease((prior.ease_factor - EASE_PENALTY).max(MIN_EASE_FACTOR)),
                )
            };

            ReviewStats {
                times_correct: prior.times_correct + i32::from(is_correct),
                times_wrong: prior.times_wrong + i32::from(!is_correct),
                last_answered: now,
                next_review: now + Duration::days(i64::from(interval_days)),
                ease_factor,
                interval_days,
            }
        }
    };

    (
        stats,
        AnswerRecord {
            is_correct,
            answered_at: now,
        },
    )
}

/// Get the interval in days after a correct answer.
///
/// # Arguments
///
/// * `interval_days` - The interval before this answer
/// * `ease_factor` - The ease factor before this answer
pub fn next_interval(interval_days: i32, ease_factor: f64) -> i32 {
    match interval_days {
        0 => 1,
        1 => 3,
        // the epsilon absorbs representation error, e.g. 10 × 2.3 = 22.999…
        n => ((f64::from(n) * ease_factor + 1e-9).floor() as i32).min(MAX_INTERVAL_DAYS),
    }
}

/// Keep ease factors on the 0.01 grid.
fn round_ease(ease_factor: f64) -> f64 {
    (ease_factor * 100.0).round() / 100.0
}
