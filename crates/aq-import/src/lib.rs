//! Import pipeline for exam question dumps.
//!
//! `extract` runs `parser` over `page*.txt` text dumps and writes one
//! `question_<n>.json` file per question; `loader` reads those files into
//! the question store with service tags derived by `tagger`.

pub mod error;
pub mod extract;
pub mod files;
pub mod loader;
pub mod parser;
pub mod tagger;

pub use error::{ImportError, ParseError};
