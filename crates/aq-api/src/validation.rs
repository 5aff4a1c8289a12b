use std::collections::HashSet;

use aq_db::models::FilterMode;

use crate::error::ApiError;

/// Most tags accepted in one tag filter
pub const MAX_FILTER_TAGS: usize = 50;
/// Longest tag accepted in a tag filter
pub const MAX_TAG_LEN: usize = 64;
/// Most letters an answer may select
pub const MAX_ANSWER_LETTERS: usize = 5;

/// Parse a filter mode name.
///
/// # Examples
/// ```
/// use aq_api::validation::parse_filter;
/// use aq_db::models::FilterMode;
///
/// assert_eq!(parse_filter("due").unwrap(), FilterMode::Due);
/// assert!(parse_filter("overdue").is_err());
/// ```
pub fn parse_filter(name: &str) -> Result<FilterMode, ApiError> {
    name.parse().map_err(|_| {
        ApiError::InvalidInput(format!(
            "Invalid filter: '{}'. Must be one of 'all', 'new', 'wrong', 'due'",
            name
        ))
    })
}

/// Clean up a requested tag filter.
///
/// Blank entries and duplicates are dropped; an empty result means no tag
/// filter at all.
pub fn normalize_tags(tags: Option<Vec<String>>) -> Result<Option<Vec<String>>, ApiError> {
    let Some(tags) = tags else {
        return Ok(None);
    };

    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || cleaned.iter().any(|seen| seen == tag) {
            continue;
        }
        if tag.len() > MAX_TAG_LEN || tag.chars().any(char::is_control) {
            return Err(ApiError::InvalidInput(format!("Invalid tag: '{}'", tag)));
        }
        cleaned.push(tag.to_string());
    }

    if cleaned.len() > MAX_FILTER_TAGS {
        return Err(ApiError::InvalidInput(format!(
            "Too many tags: at most {} allowed",
            MAX_FILTER_TAGS
        )));
    }

    Ok((!cleaned.is_empty()).then_some(cleaned))
}

/// Check that an answer is 1 to 5 option letters.
pub fn validate_answer(answer: &str) -> Result<(), ApiError> {
    let letters = answer.chars().count();

    if letters == 0 || letters > MAX_ANSWER_LETTERS {
        return Err(ApiError::InvalidInput(format!(
            "Answer must contain between 1 and {} letters",
            MAX_ANSWER_LETTERS
        )));
    }

    if !answer.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ApiError::InvalidInput(format!(
            "Invalid answer: '{}'. Only option letters are allowed",
            answer
        )));
    }

    let mut seen = HashSet::new();
    if !answer.chars().all(|c| seen.insert(c)) {
        return Err(ApiError::InvalidInput(format!(
            "Invalid answer: '{}'. Each option letter may appear only once",
            answer
        )));
    }

    Ok(())
}
