use std::{
    fs,
    path::{Path, PathBuf},
};

use aq_db::models::NewQuestion;

use crate::error::ImportError;

/// Files in `dir` named `<prefix>*.<extension>`, sorted by name.
pub fn list_files(dir: &Path, prefix: &str, extension: &str) -> Result<Vec<PathBuf>, ImportError> {
    let entries = fs::read_dir(dir).map_err(|e| ImportError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ImportError::io(dir, e))?.path();
        let matches = path.is_file()
            && path.extension().is_some_and(|ext| ext == extension)
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(prefix));
        if matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

pub fn question_file_name(question_number: i64) -> String {
    format!("question_{question_number}.json")
}

pub fn read_question_file(path: &Path) -> Result<NewQuestion, ImportError> {
    let content = fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| ImportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `question` to `dir` unless its file already exists.
///
/// Returns `false` when the file was left untouched.
pub fn write_question_file(dir: &Path, question: &NewQuestion) -> Result<bool, ImportError> {
    let path = dir.join(question_file_name(question.question_number));
    if path.exists() {
        return Ok(false);
    }

    let json = serde_json::to_string_pretty(question).map_err(|source| ImportError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, json + "\n").map_err(|e| ImportError::io(&path, e))?;

    Ok(true)
}
