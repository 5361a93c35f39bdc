//! Common lexer module
//!
//! This module contains the error type and the keyword table shared by the lexing stages.

use thiserror::Error;

/// Reserved words of the checked language.
pub const KEYWORDS: &[&str] = &[
    "BEGIN", "END", "alias", "and", "begin", "break", "case", "class", "def", "defined?", "do",
    "else", "elsif", "end", "ensure", "false", "for", "if", "in", "module", "next", "nil", "not",
    "or", "redo", "rescue", "retry", "return", "self", "super", "then", "true", "undef", "unless",
    "until", "when", "while", "yield",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Errors that can occur during lexing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character {text:?} at line {line}, column {column}")]
    UnexpectedCharacter {
        line: usize,
        column: usize,
        text: String,
    },
    #[error("unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },
    #[error("heredoc started at line {line} is missing its terminator {terminator:?}")]
    UnterminatedHeredoc { line: usize, terminator: String },
    #[error("interpolation opened at line {line}, column {column} is never closed")]
    UnbalancedInterpolation { line: usize, column: usize },
}

impl LexError {
    /// The line the error points at.
    pub fn line(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { line, .. }
            | LexError::UnterminatedString { line, .. }
            | LexError::UnterminatedHeredoc { line, .. }
            | LexError::UnbalancedInterpolation { line, .. } => *line,
        }
    }

    /// The column the error points at. Heredoc errors point at the start of the line.
    pub fn column(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { column, .. }
            | LexError::UnterminatedString { column, .. }
            | LexError::UnbalancedInterpolation { column, .. } => *column,
            LexError::UnterminatedHeredoc { .. } => 0,
        }
    }
}
