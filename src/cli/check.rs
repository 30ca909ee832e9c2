//! Parse MDX text and report the result

use regex::Regex;
use tracing::debug;

use super::CliError;
use crate::output::{expression_to_json, statement_to_json};
use crate::{Lexer, ParseOptions, Parser};

const STATEMENT_START: &str = r"(?is)^\s*(WITH|SELECT|DRILLTHROUGH|EXPLAIN)\b";

/// What the check command should parse the text as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    /// Decide from the first word
    #[default]
    Auto,
    Expression,
    Statement,
}

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The MDX text to parse
    pub query: String,
    pub mode: CheckMode,
    /// Return the syntax tree instead of a plain verdict
    pub json: bool,
    /// Overrides the default nesting limit
    pub max_depth: Option<usize>,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// The text parsed
    SyntaxValid,
    /// The text parsed and `json` was requested
    Tree(serde_json::Value),
}

/// True when the text starts with a statement keyword rather than being a
/// bare expression.
pub fn looks_like_statement(query: &str) -> Result<bool, CliError> {
    let pattern = Regex::new(STATEMENT_START)?;
    Ok(pattern.is_match(query))
}

/// Execute an mdx check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let query = &options.query;
    if query.trim().is_empty() {
        return Err(CliError::NoInput);
    }

    let statement = match options.mode {
        CheckMode::Auto => looks_like_statement(query)?,
        CheckMode::Expression => false,
        CheckMode::Statement => true,
    };
    debug!(statement, "checking MDX");

    let parse_options = match options.max_depth {
        Some(max_nesting_depth) => ParseOptions { max_nesting_depth },
        None => ParseOptions::default(),
    };
    let mut parser = Parser::with_options(Lexer::new(query), parse_options)?;

    let tree = if statement {
        let parsed = parser.parse_mdx_statement()?;
        options.json.then(|| statement_to_json(&parsed))
    } else {
        let parsed = parser.parse_expression()?;
        options.json.then(|| expression_to_json(&parsed))
    };

    Ok(match tree {
        Some(tree) => CheckResult::Tree(tree),
        None => CheckResult::SyntaxValid,
    })
}
