//! The `spaces_before_lbrace` rule: a `{` is preceded by the configured number of spaces.
//!
//!     A brace is not checked when it starts its line, when only whitespace comes before it,
//!     or when it directly follows `#{`, `(` or `[`.

use super::{ProblemSink, RuleObserver};
use crate::plumb::config::SpacesBeforeLbraceConfig;
use crate::plumb::dispatch::{Event, EventKind};
use crate::plumb::problem::{Problem, ProblemDetail};
use crate::plumb::token::{LineView, Token, TokenKind};
use tracing::trace;

pub struct SpacesBeforeLbraceRule {
    spaces: usize,
    sink: ProblemSink,
}

impl SpacesBeforeLbraceRule {
    pub const NAME: &'static str = "spaces_before_lbrace";

    pub fn new(config: &SpacesBeforeLbraceConfig) -> Self {
        SpacesBeforeLbraceRule {
            spaces: config.spaces,
            sink: ProblemSink::new(Self::NAME, config.level),
        }
    }
}

/// Spaces before the brace, or `None` when the brace is exempt.
fn count_spaces(line: &LineView<'_>, brace: &Token) -> Option<usize> {
    if brace.column == 0 {
        return None;
    }
    let index = line.position_of(brace)?;
    let previous = line.tokens().get(index.checked_sub(1)?)?;

    match previous.kind {
        TokenKind::EmbeddedExprBegin | TokenKind::LeftParen | TokenKind::LeftBracket => None,
        TokenKind::Whitespace if previous.column == 0 => None,
        TokenKind::Whitespace => Some(previous.text.len()),
        _ => Some(0),
    }
}

impl RuleObserver for SpacesBeforeLbraceRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn events(&self) -> &'static [EventKind] {
        &[EventKind::LeftBrace]
    }

    fn on_event(&mut self, event: &Event<'_>) {
        let Some(brace) = event.token else {
            return;
        };
        let Some(count) = count_spaces(&event.line, brace) else {
            trace!(line = brace.line, "brace exempt from spacing");
            return;
        };
        if count != self.spaces {
            self.sink.report(
                brace.line,
                brace.column,
                ProblemDetail::SpacesBeforeLbrace {
                    actual_spaces: count,
                    should_have: self.spaces,
                },
            );
        }
    }

    fn problems(&self) -> &[Problem] {
        self.sink.problems()
    }

    fn take_problems(&mut self) -> Vec<Problem> {
        self.sink.take()
    }
}
