//! Turn a directory of page dumps into question files.

use std::{collections::BTreeMap, fs, path::Path};

use crate::{
    error::{ImportError, ParseError},
    files, parser,
};

/// Correct answers looked up by hand, by question number
pub type AnswerOverrides = BTreeMap<i64, String>;

#[derive(Debug, Default)]
pub struct ExtractReport {
    pub pages: usize,
    pub parsed: usize,
    pub saved: usize,
    /// Question files that already existed
    pub skipped: usize,
    pub rejected: Vec<ParseError>,
}

/// Read `answers.json`-style overrides: `{"18": "AB", "19": "D"}`.
pub fn read_overrides(path: &Path) -> Result<AnswerOverrides, ImportError> {
    let content = fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| ImportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse every `page*.txt` in `input` and write one file per question to
/// `output`, leaving existing files untouched.
///
/// Overrides replace the parsed answer and rescue questions that were only
/// rejected for lacking one.
pub fn extract_directory(
    input: &Path,
    output: &Path,
    overrides: &AnswerOverrides,
) -> Result<ExtractReport, ImportError> {
    let pages = files::list_files(input, "page", "txt")?;
    fs::create_dir_all(output).map_err(|e| ImportError::io(output, e))?;

    let mut report = ExtractReport {
        pages: pages.len(),
        ..Default::default()
    };

    for page_path in pages {
        let content = fs::read_to_string(&page_path).map_err(|e| ImportError::io(&page_path, e))?;
        let page = parser::parse_page_with_overrides(&content, overrides);

        tracing::info!(
            page = %page_path.display(),
            questions = page.questions.len(),
            rejected = page.rejected.len(),
            "Parsed page"
        );

        report.parsed += page.questions.len();
        for question in &page.questions {
            if files::write_question_file(output, question)? {
                report.saved += 1;
            } else {
                report.skipped += 1;
            }
        }
        report.rejected.extend(page.rejected);
    }

    Ok(report)
}
