use std::collections::BTreeSet;

/// The set of option letters in an answer string.
///
/// `"BA"`, `"AB"` and `"ABA"` all yield `{A, B}`. Letters are case-sensitive.
pub fn answer_letters(answer: &str) -> BTreeSet<char> {
    answer.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Grade a submitted answer against the stored correct answer.
///
/// Multi-select answers compare as unordered letter sets, so the order in
/// which the options were picked does not matter.
pub fn answers_match(given: &str, correct: &str) -> bool {
    let correct = answer_letters(correct);
    !correct.is_empty() && answer_letters(given) == correct
}
