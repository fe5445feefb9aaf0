use thiserror::Error;

/// Why a unit could not be turned into a `SourceUnit`.
///
/// A failure only removes its own unit from the analysis.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
    #[error("cannot read file: {0}")]
    Unreadable(String),
    #[error("parser unavailable: {0}")]
    Parser(String),
}
