//! CLI support for mdx-lang
//!
//! Provides programmatic access to the `mdx` command's functionality so other
//! tools can embed syntax checking without shelling out.

mod check;
mod docs;

pub use check::{CheckMode, CheckOptions, CheckResult, execute_check, looks_like_statement};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Parser error
    Parse(crate::ParseError),
    /// IO error
    Io(io::Error),
    /// Statement-detection pattern failed to compile
    Pattern(regex::Error),
    /// No input provided
    NoInput,
    /// Unknown documentation category
    UnknownCategory(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Parse(e) => write!(f, "Parse error: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::Pattern(e) => write!(f, "Invalid pattern: {}", e),
            CliError::NoInput => {
                write!(f, "No input provided. Pass MDX as an argument or pipe it to stdin.")
            }
            CliError::UnknownCategory(c) => {
                write!(f, "Unknown category: '{}'\nRun 'mdx docs' to see available categories.", c)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Parse(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Pattern(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::ParseError> for CliError {
    fn from(e: crate::ParseError) -> Self {
        CliError::Parse(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<regex::Error> for CliError {
    fn from(e: regex::Error) -> Self {
        CliError::Pattern(e)
    }
}
