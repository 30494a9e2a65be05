//! command error types

use crate::config::UnknownFilter;
use crate::filter::FilterError;

use super::exit_codes;

/// error returned by command execution
#[derive(Debug, Clone)]
pub struct CommandError {
    /// exit code (maps to JSON-RPC error code via -32000 - code)
    pub code: i32,
    /// error message
    pub message: String,
    /// suggested alternatives (e.g., similar saved filter names)
    pub suggestions: Vec<String>,
    /// extra context shown under the message, e.g. where a filter went wrong
    pub details: Option<String>,
}

impl CommandError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            suggestions: Vec::new(),
            details: None,
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// a malformed filter, with a caret pointing at the offending position
    pub fn invalid_filter(expression: &str, error: &FilterError) -> Self {
        Self::new(exit_codes::INVALID_FILTER, error.to_string())
            .with_details(caret_line(expression, error.position()))
    }

    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::new(exit_codes::INVALID_ARGS, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(exit_codes::CONFIG_ERROR, message)
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(exit_codes::INPUT_ERROR, message)
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self::new(exit_codes::ERROR, message)
    }

    /// check if this error has suggestions
    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }
}

/// the expression on one line and a caret under `position` on the next
fn caret_line(expression: &str, position: usize) -> String {
    format!("{}\n{}^", expression, " ".repeat(position))
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<anyhow::Error> for CommandError {
    fn from(e: anyhow::Error) -> Self {
        CommandError::general(format!("{:#}", e))
    }
}

impl From<UnknownFilter> for CommandError {
    fn from(e: UnknownFilter) -> Self {
        CommandError::invalid_args(e.to_string()).with_suggestions(e.suggestions)
    }
}
