//! Problem types shared by every rule.
//!
//!     A [Problem] is created once, when a rule detects a violation, and never changed
//!     afterwards. Its message is rendered from the typed detail at construction time so that
//!     every consumer (text report, JSON report, tests) sees the same wording.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity a rule reports its problems with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
    /// The rule still runs but its problems are discarded.
    Off,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of violation a problem reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    Indentation,
    SpacesBeforeLbrace,
    UnnecessaryStringInterpolation,
    LexError,
}

impl ProblemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indentation => "indentation",
            Self::SpacesBeforeLbrace => "spaces_before_lbrace",
            Self::UnnecessaryStringInterpolation => "unnecessary_string_interpolation",
            Self::LexError => "lex_error",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind specific data carried by a problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProblemDetail {
    Indentation {
        actual_indentation: usize,
        should_be_at: usize,
    },
    SpacesBeforeLbrace {
        actual_spaces: usize,
        should_have: usize,
    },
    UnnecessaryInterpolation,
    LexError {
        reason: String,
    },
}

impl ProblemDetail {
    pub fn kind(&self) -> ProblemKind {
        match self {
            Self::Indentation { .. } => ProblemKind::Indentation,
            Self::SpacesBeforeLbrace { .. } => ProblemKind::SpacesBeforeLbrace,
            Self::UnnecessaryInterpolation => ProblemKind::UnnecessaryStringInterpolation,
            Self::LexError { .. } => ProblemKind::LexError,
        }
    }

    fn has_fields(&self) -> bool {
        !matches!(self, Self::UnnecessaryInterpolation)
    }

    fn message(&self) -> String {
        match self {
            Self::Indentation {
                actual_indentation,
                should_be_at,
            } => format!(
                "Line is indented to column {}, but should be at {}.",
                actual_indentation, should_be_at
            ),
            Self::SpacesBeforeLbrace {
                actual_spaces,
                should_have,
            } => format!(
                "Line has {} space(s) before a {{, but should have {}.",
                actual_spaces, should_have
            ),
            Self::UnnecessaryInterpolation => "Variable interpolated unnecessarily".to_string(),
            Self::LexError { reason } => format!("Unable to tokenize source: {}", reason),
        }
    }
}

/// One detected violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    kind: ProblemKind,
    line: usize,
    column: usize,
    message: String,
    level: Level,
    #[serde(skip_serializing_if = "skip_detail")]
    detail: ProblemDetail,
}

fn skip_detail(detail: &ProblemDetail) -> bool {
    !detail.has_fields()
}

impl Problem {
    pub fn new(line: usize, column: usize, detail: ProblemDetail, level: Level) -> Self {
        Problem {
            kind: detail.kind(),
            line,
            column,
            message: detail.message(),
            level,
            detail,
        }
    }

    pub fn kind(&self) -> ProblemKind {
        self.kind
    }

    /// 1-based line the problem was found on.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 0-based column the problem points at.
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn detail(&self) -> &ProblemDetail {
        &self.detail
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} [{}] {}: {}",
            self.line, self.column, self.level, self.kind, self.message
        )
    }
}
