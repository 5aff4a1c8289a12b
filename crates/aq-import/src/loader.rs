//! Load parsed question files into the question store.

use std::{collections::HashSet, path::Path};

use aq_db::{
    models::{NewQuestion, TagCount},
    repositories::{question, tags},
};
use sqlx::SqlitePool;

use crate::{
    error::{ImportError, ParseError},
    files, tagger,
};

/// Number of tags listed in the import report
pub const TOP_TAGS: usize = 15;

/// What happened to one question file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Imported,
    /// Already stored; its explanation was filled in from the file
    ExplanationUpdated,
    /// Already stored, nothing to change
    Skipped,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub imported: usize,
    pub explanations_updated: usize,
    pub skipped: usize,
    pub failed: Vec<ImportError>,
    pub top_tags: Vec<TagCount>,
}

/// Load every `question_*.json` file from `dir`.
///
/// A file that cannot be read or fails validation is reported in `failed`
/// and does not stop the import; database errors do.
pub async fn load_directory(pool: &SqlitePool, dir: &Path) -> Result<LoadReport, ImportError> {
    let paths = files::list_files(dir, "question_", "json")?;
    tracing::info!(files = paths.len(), dir = %dir.display(), "Loading question files");

    let mut existing: HashSet<i64> = question::list_question_numbers(pool)
        .await?
        .into_iter()
        .collect();
    let mut report = LoadReport::default();

    for path in paths {
        let loaded = files::read_question_file(&path).and_then(|record| {
            validate(&record)
                .map(|()| record)
                .map_err(ImportError::from)
        });

        let record = match loaded {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping question file");
                report.failed.push(e);
                continue;
            }
        };

        match load_question(pool, &existing, &record).await? {
            LoadOutcome::Imported => {
                existing.insert(record.question_number);
                report.imported += 1;
            }
            LoadOutcome::ExplanationUpdated => report.explanations_updated += 1,
            LoadOutcome::Skipped => report.skipped += 1,
        }
    }

    let mut tag_counts = tags::tag_counts(pool).await?;
    tag_counts.truncate(TOP_TAGS);
    report.top_tags = tag_counts;

    Ok(report)
}

/// Insert a question with derived tags, or backfill the explanation of an
/// already stored one.
pub async fn load_question(
    pool: &SqlitePool,
    existing: &HashSet<i64>,
    record: &NewQuestion,
) -> Result<LoadOutcome, ImportError> {
    let explanation = record
        .explanation
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());

    if existing.contains(&record.question_number) {
        return match explanation {
            Some(text) => {
                question::set_explanation(pool, record.question_number, text).await?;
                Ok(LoadOutcome::ExplanationUpdated)
            }
            None => Ok(LoadOutcome::Skipped),
        };
    }

    let mut tagged = record.clone();
    tagged.tags = tagger::tag_question(record);
    tagged.explanation = explanation.map(String::from);

    let mut tx = pool.begin().await?;
    question::insert_question(&mut tx, &tagged).await?;
    tx.commit().await?;

    tracing::debug!(
        question_number = record.question_number,
        tags = ?tagged.tags,
        "Question imported"
    );

    Ok(LoadOutcome::Imported)
}

/// Reject records the store would not accept.
pub fn validate(question: &NewQuestion) -> Result<(), ParseError> {
    let number = question.question_number;

    if question.question_text.trim().is_empty() {
        return Err(ParseError::MissingText(number));
    }
    if question.options.is_empty() {
        return Err(ParseError::MissingOptions(number));
    }
    if question.correct_answer.is_empty() {
        return Err(ParseError::MissingAnswer(number));
    }

    let known_letters = question
        .correct_answer
        .chars()
        .all(|letter| question.options.contains_key(letter.to_string().as_str()));
    if !known_letters {
        return Err(ParseError::InvalidAnswer {
            number,
            answer: question.correct_answer.clone(),
        });
    }

    Ok(())
}
