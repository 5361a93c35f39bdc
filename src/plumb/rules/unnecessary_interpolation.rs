//! The `allow_unnecessary_interpolation` rule: flags string literals made of nothing but
//! interpolations, like `"#{name}"`.
//!
//!     String tokens are collected across ignored newlines so a statement spread over several
//!     lines is judged as a whole, then checked when the statement ends. Only quoted strings
//!     are judged: interpolating into a regular expression, a command or a word list converts
//!     the value, so `/#{name}/` is left alone.

use super::{ProblemSink, RuleObserver};
use crate::plumb::config::UnnecessaryInterpolationConfig;
use crate::plumb::dispatch::{Event, EventKind};
use crate::plumb::problem::{Problem, ProblemDetail};
use crate::plumb::token::{Token, TokenKind};

pub struct UnnecessaryInterpolationRule {
    allowed: bool,
    pending: Vec<Token>,
    sink: ProblemSink,
}

impl UnnecessaryInterpolationRule {
    pub const NAME: &'static str = "allow_unnecessary_interpolation";

    pub fn new(config: &UnnecessaryInterpolationConfig) -> Self {
        UnnecessaryInterpolationRule {
            allowed: config.allowed,
            pending: Vec::new(),
            sink: ProblemSink::new(Self::NAME, config.level),
        }
    }

    fn check_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if self.allowed {
            return;
        }
        for string in split_strings(&pending) {
            if is_quoted_string(&string[0]) && is_bare_interpolation(string) {
                let begin = &string[0];
                self.sink.report(
                    begin.line,
                    begin.column + 1,
                    ProblemDetail::UnnecessaryInterpolation,
                );
            }
        }
    }
}

fn is_string_token(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::StringBegin
            | TokenKind::StringContent
            | TokenKind::StringEnd
            | TokenKind::EmbeddedExprBegin
    )
}

/// Cut collected tokens into literals. Each literal runs from a string begin up to the first
/// string end that follows it; a nested begin starts a new literal.
fn split_strings(tokens: &[Token]) -> Vec<&[Token]> {
    let mut strings = Vec::new();
    let mut start: Option<usize> = None;

    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::StringBegin => {
                if let Some(open) = start {
                    strings.push(&tokens[open..index]);
                }
                start = Some(index);
            }
            TokenKind::StringEnd => {
                if let Some(open) = start.take() {
                    strings.push(&tokens[open..=index]);
                }
            }
            _ => {}
        }
    }
    if let Some(open) = start {
        strings.push(&tokens[open..]);
    }
    strings
}

/// `"..."`, `'...'`, `%Q{...}`, `%q{...}` and `%(...)`.
fn is_quoted_string(begin: &Token) -> bool {
    let text = begin.text.as_str();
    match text.strip_prefix('%') {
        Some(rest) => {
            rest.starts_with(['Q', 'q']) || !rest.starts_with(|c: char| c.is_ascii_alphabetic())
        }
        None => text == "\"" || text == "'",
    }
}

/// A literal with at least one interpolation and no text of its own.
fn is_bare_interpolation(string: &[Token]) -> bool {
    string.len() >= 3 && !string.iter().any(|t| t.kind == TokenKind::StringContent)
}

impl RuleObserver for UnnecessaryInterpolationRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn events(&self) -> &'static [EventKind] {
        &[EventKind::Newline, EventKind::IgnoredNewline]
    }

    fn on_event(&mut self, event: &Event<'_>) {
        self.pending.extend(
            event
                .line
                .tokens()
                .iter()
                .filter(|t| is_string_token(t))
                .cloned(),
        );
        if event.kind == EventKind::Newline {
            self.check_pending();
        }
    }

    fn finish(&mut self) {
        if !self.pending.is_empty() {
            self.check_pending();
        }
    }

    fn problems(&self) -> &[Problem] {
        self.sink.problems()
    }

    fn take_problems(&mut self) -> Vec<Problem> {
        self.sink.take()
    }
}
