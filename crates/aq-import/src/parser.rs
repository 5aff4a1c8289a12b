//! Parser for exam dump pages.
//!
//! A page holds any number of questions laid out like:
//!
//! ```text
//! Question #18 Topic 1
//! A company needs ... (Choose two.)
//! A. Amazon SQS Most Voted
//! B. AWS Lambda
//! Correct Answer: AB
//! Community vote distribution
//! AB (94%) 6%
//! ```

use std::{collections::BTreeMap, sync::LazyLock};

use aq_db::models::{NewQuestion, Options};
use regex::Regex;

use crate::error::ParseError;

static QUESTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Question #(\d+)").expect("valid question header pattern"));
static TOPIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Topic\s*(\d+)").expect("valid topic pattern"));
static OPTION_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*([A-F])\.\s+").expect("valid option pattern"));
static OPTIONS_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:Correct Answer|Community vote|🗳)").expect("valid end marker pattern")
});
static CORRECT_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Correct Answer:\s*([A-F]+)").expect("valid correct answer pattern")
});
static VOTE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Community vote distribution\s*\n(.+?)(?:\n\s*\n|\z)")
        .expect("valid vote section pattern")
});
static VOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-F]+)\s*\((\d+)%\)").expect("valid vote pattern"));
static MOST_VOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*Most Voted\s*").expect("valid most voted pattern"));

/// Result of parsing one page
#[derive(Debug, Default)]
pub struct ParsedPage {
    pub questions: Vec<NewQuestion>,
    pub rejected: Vec<ParseError>,
}

/// Parse every `Question #N` block of a page.
pub fn parse_page(content: &str) -> ParsedPage {
    parse_page_with_overrides(content, &BTreeMap::new())
}

/// Like [`parse_page`], with hand-picked answers taking precedence over the
/// ones found in the page.
pub fn parse_page_with_overrides(content: &str, overrides: &BTreeMap<i64, String>) -> ParsedPage {
    let headers: Vec<_> = QUESTION_HEADER.captures_iter(content).collect();
    let mut page = ParsedPage::default();

    for (idx, header) in headers.iter().enumerate() {
        let (Some(whole), Some(number)) = (header.get(0), header.get(1)) else {
            continue;
        };
        let Ok(number) = number.as_str().parse::<i64>() else {
            continue;
        };

        let end = headers
            .get(idx + 1)
            .and_then(|next| next.get(0))
            .map_or(content.len(), |next| next.start());

        let body = &content[whole.end()..end];
        let parsed = match overrides.get(&number) {
            Some(answer) => parse_question_with_answer(number, body, answer),
            None => parse_question(number, body),
        };

        match parsed {
            Ok(question) => page.questions.push(question),
            Err(e) => page.rejected.push(e),
        }
    }

    page
}

/// Parse the body of one question, everything after `Question #N`.
pub fn parse_question(number: i64, body: &str) -> Result<NewQuestion, ParseError> {
    parse_body(number, body, None)
}

/// Parse a question whose correct answer is known from elsewhere.
pub fn parse_question_with_answer(
    number: i64,
    body: &str,
    answer: &str,
) -> Result<NewQuestion, ParseError> {
    parse_body(number, body, Some(answer))
}

fn parse_body(number: i64, body: &str, known_answer: Option<&str>) -> Result<NewQuestion, ParseError> {
    let body = body.trim();

    // the rest of the header line may carry the topic
    let (first_line, rest) = body.split_once('\n').unwrap_or((body, ""));
    let (topic, text) = match TOPIC
        .captures(first_line)
        .and_then(|caps| caps[1].parse::<i64>().ok())
    {
        Some(topic) => (topic, rest.trim()),
        None => (1, body),
    };

    let first_option = OPTION_START
        .find(text)
        .ok_or(ParseError::MissingOptions(number))?;

    let question_text = text[..first_option.start()].trim();
    if question_text.is_empty() {
        return Err(ParseError::MissingText(number));
    }

    let (options, most_voted) = parse_options(&text[first_option.start()..]);
    if options.is_empty() {
        return Err(ParseError::MissingOptions(number));
    }

    let community_vote = parse_votes(text);

    let correct_answer = known_answer
        .map(String::from)
        .or_else(|| CORRECT_ANSWER.captures(text).map(|caps| caps[1].to_string()))
        .or(most_voted)
        .or_else(|| community_vote.as_ref().and_then(top_voted))
        .ok_or(ParseError::MissingAnswer(number))?;

    Ok(NewQuestion {
        question_number: number,
        topic,
        question_text: question_text.to_string(),
        options,
        correct_answer,
        community_vote,
        tags: Vec::new(),
        explanation: None,
    })
}

/// Options by letter, plus the first option flagged "Most Voted".
fn parse_options(section: &str) -> (Options, Option<String>) {
    let section = match OPTIONS_END.find(section) {
        Some(marker) => &section[..marker.start()],
        None => section,
    };

    let starts: Vec<_> = OPTION_START.captures_iter(section).collect();
    let mut options = Options::new();
    let mut most_voted = None;

    for (idx, caps) in starts.iter().enumerate() {
        let (Some(whole), Some(letter)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = starts
            .get(idx + 1)
            .and_then(|next| next.get(0))
            .map_or(section.len(), |next| next.start());

        let raw = section[whole.end()..end].trim();
        if most_voted.is_none() && MOST_VOTED.is_match(raw) {
            most_voted = Some(letter.as_str().to_string());
        }

        let text = MOST_VOTED.replace_all(raw, " ").trim().to_string();
        options.insert(letter.as_str().to_string(), text);
    }

    (options, most_voted)
}

/// `{"AB": "94%", "A": "6%"}` from the community vote section
fn parse_votes(text: &str) -> Option<BTreeMap<String, String>> {
    let section = VOTE_SECTION.captures(text)?;
    let votes: BTreeMap<String, String> = VOTE
        .captures_iter(&section[1])
        .map(|caps| (caps[1].to_string(), format!("{}%", &caps[2])))
        .collect();

    (!votes.is_empty()).then_some(votes)
}

/// Letters with the highest vote share
fn top_voted(votes: &BTreeMap<String, String>) -> Option<String> {
    votes
        .iter()
        .filter_map(|(letters, share)| {
            share
                .trim_end_matches('%')
                .parse::<u32>()
                .ok()
                .map(|percent| (percent, letters))
        })
        // first entry wins on ties
        .fold(None, |best: Option<(u32, &String)>, (percent, letters)| {
            match best {
                Some((top, _)) if top >= percent => best,
                _ => Some((percent, letters)),
            }
        })
        .map(|(_, letters)| letters.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
ExamTopics page 1

Question #18 Topic 1
A company needs to decouple two services. Which TWO services should be used? (Choose two.)
A. Amazon SQS Most Voted
B. AWS Lambda Most Voted
C. Amazon EC2
D. Amazon Route 53
Correct Answer: AB
Community vote distribution
AB (94%)
A (6%)

Question #19 Topic 2
A solutions architect must store logs durably.
A. Amazon S3 Most Voted
B. Amazon EBS
C. Instance store

Question #20 Topic 1
This question lost its options in the dump.
Correct Answer: C
";

    #[test]
    fn test_parse_page() {
        let page = parse_page(PAGE);

        assert_eq!(page.questions.len(), 2);
        assert_eq!(page.rejected, [ParseError::MissingOptions(20)]);

        let first = &page.questions[0];
        assert_eq!(first.question_number, 18);
        assert_eq!(first.topic, 1);
        assert_eq!(
            first.question_text,
            "A company needs to decouple two services. Which TWO services should be used? (Choose two.)"
        );
        assert_eq!(first.options.len(), 4);
        assert_eq!(first.options["A"], "Amazon SQS");
        assert_eq!(first.options["B"], "AWS Lambda");
        assert_eq!(first.options["D"], "Amazon Route 53");
        assert_eq!(first.correct_answer, "AB");
        assert_eq!(
            first.community_vote,
            Some(BTreeMap::from([
                ("AB".to_string(), "94%".to_string()),
                ("A".to_string(), "6%".to_string()),
            ]))
        );
    }

    #[test]
    fn test_most_voted_fallback() {
        let page = parse_page(PAGE);
        let second = &page.questions[1];

        assert_eq!(second.question_number, 19);
        assert_eq!(second.topic, 2);
        assert_eq!(second.correct_answer, "A");
        assert_eq!(second.options["A"], "Amazon S3");
        assert_eq!(second.options["C"], "Instance store");
        assert!(second.community_vote.is_none());
    }

    #[test]
    fn test_community_vote_fallback() {
        let body = " Topic 1
Which storage class is cheapest for archives?
A. S3 Standard
B. S3 Glacier Deep Archive
Community vote distribution
A (12%) B (88%)
";
        let question = parse_question(7, body).unwrap();

        assert_eq!(question.correct_answer, "B");
        assert_eq!(question.options["A"], "S3 Standard");
    }

    #[test]
    fn test_missing_topic_defaults_to_one() {
        let body = "
Pick the compute service.
A. EC2
B. S3
Correct Answer: A
";
        let question = parse_question(3, body).unwrap();

        assert_eq!(question.topic, 1);
        assert_eq!(question.question_text, "Pick the compute service.");
    }

    #[test]
    fn test_missing_answer_and_text() {
        assert_eq!(
            parse_question(4, " Topic 1\nPick one.\nA. EC2\nB. S3\n"),
            Err(ParseError::MissingAnswer(4))
        );
        assert_eq!(
            parse_question(5, " Topic 1\nA. EC2\nB. S3\nCorrect Answer: A\n"),
            Err(ParseError::MissingText(5))
        );
    }

    #[test]
    fn test_answer_override() {
        let overrides = BTreeMap::from([(19, "B".to_string()), (18, "AD".to_string())]);

        let page = parse_page_with_overrides(PAGE, &overrides);

        assert_eq!(page.questions[0].correct_answer, "AD");
        assert_eq!(page.questions[1].correct_answer, "B");
        assert_eq!(
            parse_question_with_answer(4, " Topic 1\nPick one.\nA. EC2\nB. S3\n", "B")
                .unwrap()
                .correct_answer,
            "B"
        );
    }

    #[test]
    fn test_top_voted_tie_keeps_first() {
        let votes = BTreeMap::from([
            ("A".to_string(), "50%".to_string()),
            ("C".to_string(), "50%".to_string()),
        ]);

        assert_eq!(top_voted(&votes), Some("A".to_string()));
    }
}
