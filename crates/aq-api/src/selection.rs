//! Question selection for new sessions.
//!
//! The store narrows the question set by filter mode and tags, this module
//! decides the order and how many to keep.

use std::cmp::Reverse;

use aq_db::{
    models::{Candidate, FilterMode},
    repositories::selection,
};
use chrono::{DateTime, Utc};
use rand::{Rng, seq::SliceRandom};
use sqlx::SqlitePool;

/// Pick up to `count` question ids for a session.
///
/// An empty result means nothing matched; callers decide how to report it.
pub async fn select_questions(
    pool: &SqlitePool,
    count: usize,
    filter: FilterMode,
    tags: Option<&[String]>,
    now: DateTime<Utc>,
) -> Result<Vec<i64>, sqlx::Error> {
    let candidates = selection::list_candidates(pool, filter, tags, now).await?;
    Ok(order_candidates(
        candidates,
        filter,
        count,
        &mut rand::thread_rng(),
    ))
}

/// Order the matching questions for `filter` and keep the first `count`.
///
/// - `all` and `new`: uniform random sample
/// - `wrong`: largest wrong-minus-correct first, ties in random order
/// - `due`: earliest next review first, ties by id
pub fn order_candidates<R>(
    mut candidates: Vec<Candidate>,
    filter: FilterMode,
    count: usize,
    rng: &mut R,
) -> Vec<i64>
where
    R: Rng + ?Sized,
{
    match filter {
        FilterMode::All | FilterMode::New => candidates.shuffle(rng),
        FilterMode::Wrong => {
            // stable sort keeps the shuffled order among equal deficits
            candidates.shuffle(rng);
            candidates.sort_by_key(|candidate| Reverse(candidate.deficit()));
        }
        FilterMode::Due => {
            candidates.sort_by_key(|candidate| (candidate.next_review, candidate.id));
        }
    }

    candidates.truncate(count);
    candidates.into_iter().map(|candidate| candidate.id).collect()
}
