//! Event dispatch
//!
//!     The [Dispatcher] owns the rule observers of one file. Tokens are fed to it in stream
//!     order with [Dispatcher::advance]; it buffers them until a line end arrives, builds the
//!     [LineView] of the finished line, and then delivers, in arrival order, one event per
//!     token of interest followed by the line-end event. Every event carries the view, so
//!     observers can look at the whole line around the token they were called for.
//!
//!     Observers subscribe per [EventKind]. Observers of one kind are called in registration
//!     order. The dispatcher itself keeps nothing between lines but the batch in progress.

use crate::plumb::problem::Problem;
use crate::plumb::rules::RuleObserver;
use crate::plumb::token::{LineView, Token, TokenKind};
use std::collections::HashMap;

/// The closed set of events observers can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Keyword,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    EmbeddedExprBegin,
    EmbeddedExprEnd,
    StringBegin,
    StringEnd,
    Comment,
    Newline,
    IgnoredNewline,
}

impl EventKind {
    /// The event a token of this kind raises, if any.
    pub fn for_token(kind: TokenKind) -> Option<EventKind> {
        let event = match kind {
            TokenKind::Keyword => EventKind::Keyword,
            TokenKind::LeftParen => EventKind::LeftParen,
            TokenKind::RightParen => EventKind::RightParen,
            TokenKind::LeftBracket => EventKind::LeftBracket,
            TokenKind::RightBracket => EventKind::RightBracket,
            TokenKind::LeftBrace => EventKind::LeftBrace,
            TokenKind::RightBrace => EventKind::RightBrace,
            TokenKind::EmbeddedExprBegin => EventKind::EmbeddedExprBegin,
            TokenKind::EmbeddedExprEnd => EventKind::EmbeddedExprEnd,
            TokenKind::StringBegin => EventKind::StringBegin,
            TokenKind::StringEnd => EventKind::StringEnd,
            TokenKind::Comment => EventKind::Comment,
            TokenKind::Newline => EventKind::Newline,
            TokenKind::IgnoredNewline => EventKind::IgnoredNewline,
            _ => return None,
        };
        Some(event)
    }

    pub fn is_line_end(&self) -> bool {
        matches!(self, EventKind::Newline | EventKind::IgnoredNewline)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Keyword => "on_keyword",
            EventKind::LeftParen => "on_left_paren",
            EventKind::RightParen => "on_right_paren",
            EventKind::LeftBracket => "on_left_bracket",
            EventKind::RightBracket => "on_right_bracket",
            EventKind::LeftBrace => "on_left_brace",
            EventKind::RightBrace => "on_right_brace",
            EventKind::EmbeddedExprBegin => "on_embedded_expr_begin",
            EventKind::EmbeddedExprEnd => "on_embedded_expr_end",
            EventKind::StringBegin => "on_string_begin",
            EventKind::StringEnd => "on_string_end",
            EventKind::Comment => "on_comment",
            EventKind::Newline => "on_newline",
            EventKind::IgnoredNewline => "on_ignored_newline",
        }
    }
}

/// One delivered event.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    pub kind: EventKind,
    /// The token that raised the event. `None` for the line end synthesized at end of input.
    pub token: Option<&'a Token>,
    /// The line the token belongs to.
    pub line: LineView<'a>,
    /// Line of the token, or of the end of the line for a synthesized line end.
    pub lineno: usize,
    pub column: usize,
}

/// Index of an observer inside its dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(usize);

pub struct Dispatcher<O: ?Sized + RuleObserver = dyn RuleObserver> {
    observers: Vec<Box<O>>,
    registry: HashMap<EventKind, Vec<ObserverHandle>>,
    batch: Vec<Token>,
}

impl<O: ?Sized + RuleObserver> Default for Dispatcher<O> {
    fn default() -> Self {
        Dispatcher {
            observers: Vec::new(),
            registry: HashMap::new(),
            batch: Vec::new(),
        }
    }
}

impl<O: ?Sized + RuleObserver> Dispatcher<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an observer and subscribe it to every event it declares.
    pub fn add_observer(&mut self, observer: Box<O>) -> ObserverHandle {
        let handle = ObserverHandle(self.observers.len());
        for kind in observer.events() {
            self.register(*kind, handle);
        }
        self.observers.push(observer);
        handle
    }

    /// Subscribe an observer to one more event kind. Subscribing twice has no effect.
    pub fn register(&mut self, kind: EventKind, handle: ObserverHandle) {
        let handles = self.registry.entry(kind).or_default();
        if !handles.contains(&handle) {
            handles.push(handle);
        }
    }

    pub fn observer(&self, handle: ObserverHandle) -> &O {
        &self.observers[handle.0]
    }

    pub fn observers(&self) -> impl Iterator<Item = &O> {
        self.observers.iter().map(|observer| observer.as_ref())
    }

    /// Feed the next token. A line end flushes the line's events.
    pub fn advance(&mut self, token: Token) {
        let ends_line = token.is_newline();
        self.batch.push(token);
        if ends_line {
            self.flush();
        }
    }

    /// Flush an unterminated last line and let every observer finish.
    pub fn finish(&mut self) {
        if !self.batch.is_empty() {
            self.flush();
        }
        for observer in &mut self.observers {
            observer.finish();
        }
    }

    /// Feed a whole token stream and finish.
    pub fn run(&mut self, tokens: impl IntoIterator<Item = Token>) {
        for token in tokens {
            self.advance(token);
        }
        self.finish();
    }

    /// Problems of every observer, ordered by line. Problems on the same line keep the order
    /// of the observers that reported them.
    pub fn into_problems(self) -> Vec<Problem> {
        let mut problems: Vec<Problem> = self
            .observers
            .into_iter()
            .flat_map(|mut observer| observer.take_problems())
            .collect();
        problems.sort_by_key(|problem| problem.line());
        problems
    }

    fn flush(&mut self) {
        let batch = std::mem::take(&mut self.batch);
        let view = LineView::new(&batch);

        for token in &batch {
            let Some(kind) = EventKind::for_token(token.kind) else {
                continue;
            };
            if kind.is_line_end() {
                continue;
            }
            self.deliver(&Event {
                kind,
                token: Some(token),
                line: view,
                lineno: token.line,
                column: token.column,
            });
        }

        let event = match view.terminator() {
            Some(terminator) => Event {
                kind: if terminator.kind == TokenKind::IgnoredNewline {
                    EventKind::IgnoredNewline
                } else {
                    EventKind::Newline
                },
                token: Some(terminator),
                line: view,
                lineno: terminator.line,
                column: terminator.column,
            },
            None => Event {
                kind: EventKind::Newline,
                token: None,
                line: view,
                lineno: view.last_lineno(),
                column: view.tokens().last().map_or(0, |token| token.end_column()),
            },
        };
        self.deliver(&event);
    }

    fn deliver(&mut self, event: &Event<'_>) {
        let Some(handles) = self.registry.get(&event.kind) else {
            return;
        };
        for handle in handles {
            self.observers[handle.0].on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plumb::lexing::tokenize;

    /// Records every event it receives as `(event name, line, token text)`.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<(&'static str, usize, String)>,
    }

    impl RuleObserver for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn events(&self) -> &'static [EventKind] {
            &[
                EventKind::Keyword,
                EventKind::LeftParen,
                EventKind::RightParen,
                EventKind::Newline,
                EventKind::IgnoredNewline,
            ]
        }

        fn on_event(&mut self, event: &Event<'_>) {
            let text = event.token.map(|t| t.text.clone()).unwrap_or_default();
            self.seen.push((event.kind.name(), event.lineno, text));
        }

        fn problems(&self) -> &[Problem] {
            &[]
        }

        fn take_problems(&mut self) -> Vec<Problem> {
            Vec::new()
        }
    }

    fn record(source: &str) -> Vec<(&'static str, usize, String)> {
        let mut dispatcher = Dispatcher::<Recorder>::new();
        let handle = dispatcher.add_observer(Box::default());
        dispatcher.run(tokenize(source).unwrap());
        dispatcher.observer(handle).seen.clone()
    }

    #[test]
    fn test_token_events_precede_line_end() {
        let seen = record("def foo(a)\nend\n");
        let names: Vec<_> = seen.iter().map(|(name, _, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "on_keyword",
                "on_left_paren",
                "on_right_paren",
                "on_newline",
                "on_keyword",
                "on_newline"
            ]
        );
        assert_eq!(seen[4].1, 2);
    }

    #[test]
    fn test_unterminated_last_line_gets_synthetic_newline() {
        let seen = record("foo(\n)");
        assert_eq!(seen.last().unwrap(), &("on_newline", 2, String::new()));
        assert_eq!(seen[1].0, "on_ignored_newline");
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut dispatcher = Dispatcher::<Recorder>::new();
        let handle = dispatcher.add_observer(Box::default());
        dispatcher.register(EventKind::Keyword, handle);
        dispatcher.run(tokenize("end").unwrap());
        assert_eq!(dispatcher.observer(handle).seen.len(), 2);
    }

    #[test]
    fn test_observers_called_in_registration_order() {
        let mut dispatcher = Dispatcher::<Recorder>::new();
        let first = dispatcher.add_observer(Box::default());
        let second = dispatcher.add_observer(Box::default());
        dispatcher.run(tokenize("if x\n").unwrap());
        assert_eq!(
            dispatcher.observer(first).seen,
            dispatcher.observer(second).seen
        );
        assert_eq!(dispatcher.observers().count(), 2);
    }
}
