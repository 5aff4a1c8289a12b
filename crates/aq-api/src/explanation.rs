use aq_db::models::Question;
use aq_srs::answer_letters;

/// Explanation shown after an answer.
///
/// Uses the stored explanation when there is one, otherwise describes the
/// correct option(s) and the community vote.
pub fn explain(question: &Question) -> String {
    if let Some(text) = question
        .explanation
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
    {
        return text.to_string();
    }

    let letters = answer_letters(&question.correct_answer);
    let label = if letters.len() > 1 {
        "Correct answers"
    } else {
        "Correct answer"
    };

    let mut lines = vec![format!("{label}: {}", question.correct_answer)];
    for letter in letters {
        if let Some(text) = question.options.get(letter.to_string().as_str()) {
            lines.push(format!("{letter}. {text}"));
        }
    }

    if let Some(votes) = question
        .community_vote
        .as_ref()
        .filter(|votes| !votes.is_empty())
    {
        let mut votes: Vec<_> = votes.iter().collect();
        votes.sort_by_key(|(option, share)| (std::cmp::Reverse(vote_percent(share)), *option));

        let summary = votes
            .iter()
            .map(|(option, share)| format!("{option} ({share})"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Community vote: {summary}"));
    }

    lines.join("\n")
}

/// "94%" -> 94, anything unparsable counts as 0
fn vote_percent(share: &str) -> u32 {
    share.trim().trim_end_matches('%').trim().parse().unwrap_or(0)
}
