//! Indentation state machine
//!
//!     The machine consumes the dispatcher's events for one file and predicts, for every
//!     physical line, the column its first token should start at. Two kinds of effects drive
//!     the prediction:
//!
//!         Immediate:
//!             A continuation keyword (`else`, `when`, ...) moves its own line back one level as
//!             soon as it is seen. So does the first line of a leading-period method chain, in
//!             the other direction.
//!
//!         Pending:
//!             Openers and closers only record a delta, counted in indent levels. The deltas are
//!             applied when the line ends: the one for the next line always, the one for this
//!             line only when negative (a closer that leads its line dedents that line).
//!
//!     At each line end the machine first looks at how the line ends to track multi-line
//!     expressions (trailing operator, comma or period), then measures the line, then moves
//!     the expectation on to the next line.
//!
//! Argument Alignment
//!
//!     With argument alignment on, an open paren or bracket group remembers the column of the
//!     first token after its opening delimiter, and lines inside the group are expected at that
//!     column instead of the generic expectation. A group whose delimiter ends its line has no
//!     such column. Argument lists written without parentheses are never aligned.
//!
//! Suspending
//!
//!     A `# plumb:disable indentation` comment stops measuring and freezes the expectations
//!     until `# plumb:enable indentation`. Nesting stacks keep being maintained meanwhile.

use super::keywords;
use super::state::{shift, IndentationState, OpenGroup};
use crate::plumb::dispatch::{Event, EventKind};
use crate::plumb::token::{LineView, Token, TokenKind};
use tracing::{trace, warn};

/// Comment that suspends indentation checking.
pub const DISABLE_DIRECTIVE: &str = "plumb:disable indentation";
/// Comment that resumes indentation checking.
pub const ENABLE_DIRECTIVE: &str = "plumb:enable indentation";

/// A measured line whose indentation differs from the expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub line: usize,
    pub actual: usize,
    pub expected: usize,
}

#[derive(Debug, Clone)]
pub struct IndentationStateMachine {
    state: IndentationState,
    unit: usize,
    argument_alignment: bool,
}

impl IndentationStateMachine {
    pub fn new(unit: usize, argument_alignment: bool) -> Self {
        IndentationStateMachine {
            state: IndentationState::new(),
            unit,
            argument_alignment,
        }
    }

    pub fn state(&self) -> &IndentationState {
        &self.state
    }

    pub fn unit(&self) -> usize {
        self.unit
    }

    /// Advance the machine by one event. Returns a measurement when the event ends a line
    /// that is not indented as expected.
    pub fn handle(&mut self, event: &Event<'_>) -> Option<Measurement> {
        let token = match (event.kind, event.token) {
            (kind, _) if kind.is_line_end() => return self.on_line_end(event),
            (_, Some(token)) => token,
            (_, None) => return None,
        };
        let line = &event.line;

        match event.kind {
            EventKind::Keyword => self.on_keyword(token, line),
            EventKind::LeftParen | EventKind::LeftBracket | EventKind::LeftBrace => {
                self.on_opener(event.kind, token, line)
            }
            EventKind::RightParen | EventKind::RightBracket | EventKind::RightBrace => {
                self.on_closer(event.kind, token, line)
            }
            EventKind::EmbeddedExprBegin => {
                let depth = self.state.brace_lines.len();
                self.state.embedded_expr_open.push(depth);
            }
            EventKind::EmbeddedExprEnd => {
                if self.state.embedded_expr_open.pop().is_none() {
                    warn!(line = token.line, "interpolation closed but none is open");
                }
            }
            EventKind::StringBegin => self.state.string_nesting.push(token.line),
            EventKind::StringEnd => {
                if self.state.string_nesting.pop().is_none() {
                    warn!(line = token.line, "string closed but none is open");
                }
            }
            EventKind::Comment => self.on_comment(token),
            EventKind::Newline | EventKind::IgnoredNewline => {}
        }
        None
    }

    fn on_keyword(&mut self, token: &Token, line: &LineView<'_>) {
        let word = token.text.as_str();
        if word == "end" {
            self.on_end(token, line);
            return;
        }
        if !keywords::is_indent_keyword(word) {
            return;
        }
        let Some(index) = line.position_of(token) else {
            return;
        };

        if keywords::is_modifier_keyword(word) && keywords::is_trailing_modifier(line, index) {
            trace!(line = token.line, word, "modifier");
            self.state.modifier_in_line = true;
            return;
        }
        if word == "do" && keywords::do_is_for_a_loop(line, index) {
            trace!(line = token.line, "do of a loop");
            return;
        }
        if word == "def" && keywords::is_endless_def(line, index) {
            trace!(line = token.line, "endless def");
            return;
        }

        self.state.indent_keyword_line = Some(token.line);
        self.state.indent_keyword_this_line = true;

        if keywords::is_continuation_keyword(word) {
            if self.state.running && line.leads_line(token) {
                self.state.expected_this_line =
                    self.state.expected_this_line.saturating_sub(self.unit);
                trace!(
                    line = token.line,
                    word,
                    expected = self.state.expected_this_line,
                    "continuation keyword"
                );
            }
            return;
        }

        let counted = self.opens_next_level();
        self.state.keyword_lines.push(OpenGroup {
            line: token.line,
            column: token.column,
            counted,
            align_column: None,
        });
        trace!(line = token.line, word, counted, "block opened");
    }

    fn on_end(&mut self, token: &Token, line: &LineView<'_>) {
        let group = self.state.keyword_lines.pop();
        if group.is_none() {
            warn!(line = token.line, "`end` without an open block");
        }
        if !self.state.running {
            return;
        }

        let opened_on = group.map(|g| g.line).or(self.state.indent_keyword_line);
        let single_line = opened_on == Some(token.line);
        if !single_line && line.leads_line(token) {
            self.state.pending_delta_this_line -= 1;
        }
        if group.map_or(true, |g| g.counted) {
            self.state.pending_delta_next_line -= 1;
        }
        trace!(line = token.line, single_line, "block closed");
    }

    fn on_opener(&mut self, kind: EventKind, token: &Token, line: &LineView<'_>) {
        let align_column = if self.argument_alignment && kind != EventKind::LeftBrace {
            line.position_of(token)
                .and_then(|index| line.next_significant(index))
                .filter(|next| next.line == token.line)
                .map(|next| next.column)
        } else {
            None
        };
        let counted = self.opens_next_level();
        let group = OpenGroup {
            line: token.line,
            column: token.column,
            counted,
            align_column,
        };
        trace!(line = token.line, column = token.column, counted, ?align_column, "group opened");
        self.stack_mut(kind).push(group);
    }

    fn on_closer(&mut self, kind: EventKind, token: &Token, line: &LineView<'_>) {
        if kind == EventKind::RightBrace
            && self.state.embedded_expr_open.last() == Some(&self.state.brace_lines.len())
        {
            self.state.embedded_expr_open.pop();
            return;
        }

        let Some(group) = self.stack_mut(kind).pop() else {
            warn!(line = token.line, column = token.column, "closer without an open group");
            return;
        };
        if !self.state.running {
            return;
        }
        if group.line < token.line && line.leads_line(token) {
            self.state.pending_delta_this_line -= 1;
        }
        if group.counted {
            self.state.pending_delta_next_line -= 1;
        }
        trace!(line = token.line, column = token.column, "group closed");
    }

    fn on_comment(&mut self, token: &Token) {
        let text = token.text.trim_start_matches('#').trim();
        if text == DISABLE_DIRECTIVE {
            trace!(line = token.line, "indentation checking suspended");
            self.state.running = false;
        } else if text == ENABLE_DIRECTIVE {
            trace!(line = token.line, "indentation checking resumed");
            self.state.running = true;
        }
    }

    /// Only the first opener of a line raises the next line.
    fn opens_next_level(&mut self) -> bool {
        let counted = self.state.running && self.state.pending_delta_next_line <= 0;
        if counted {
            self.state.pending_delta_next_line += 1;
        }
        counted
    }

    fn stack_mut(&mut self, kind: EventKind) -> &mut Vec<OpenGroup> {
        match kind {
            EventKind::LeftParen | EventKind::RightParen => &mut self.state.paren_lines,
            EventKind::LeftBracket | EventKind::RightBracket => &mut self.state.bracket_lines,
            _ => &mut self.state.brace_lines,
        }
    }

    fn on_line_end(&mut self, event: &Event<'_>) -> Option<Measurement> {
        let line = &event.line;
        let mut measurement = None;
        let code_line = !line.is_blank() && !line.in_string_tail() && !line.is_comment_only();

        if line.is_blank() || line.in_string_tail() {
            trace!(line = line.lineno(), "not measured");
        } else if self.state.running {
            if code_line && self.state.string_nesting.is_empty() {
                self.track_continuations(line, event.lineno);
            }
            if self.state.pending_delta_this_line < 0 {
                self.state.expected_this_line = shift(
                    self.state.expected_this_line,
                    self.state.pending_delta_this_line,
                    self.unit,
                );
            }
            measurement = self.measure(line);
        }

        self.transition();
        measurement
    }

    fn measure(&mut self, line: &LineView<'_>) -> Option<Measurement> {
        let first = line.first_non_whitespace()?;
        self.state.actual_indentation = first.column;

        let expected = match self.state.aligned_expectation {
            Some(column) if !first.is_closer() => column,
            _ => self.state.expected_this_line,
        };
        trace!(
            line = line.lineno(),
            actual = first.column,
            expected,
            "measured"
        );

        (first.column != expected).then_some(Measurement {
            line: line.lineno(),
            actual: first.column,
            expected,
        })
    }

    fn transition(&mut self) {
        let state = &mut self.state;
        if state.running {
            state.expected_next_line =
                shift(state.expected_next_line, state.pending_delta_next_line, self.unit);
            state.expected_this_line = state.expected_next_line;
            state.line_start_expectation = state.expected_this_line;
            state.aligned_expectation = state.innermost_alignment();
        }
        state.pending_delta_this_line = 0;
        state.pending_delta_next_line = 0;
        state.modifier_in_line = false;
        state.indent_keyword_this_line = false;
    }

    /// Track the multi-line expressions the line starts, continues or ends.
    fn track_continuations(&mut self, line: &LineView<'_>, lineno: usize) {
        let Some(last) = line.last_significant() else {
            return;
        };
        let opened_here = self.state.group_open_since(line.lineno());

        if ends_with_operator(line, last) {
            if !opened_here {
                self.start_op_continuation(lineno);
            }
        } else if let Some(start) = self.state.op_continuation_line.take() {
            if !std::mem::take(&mut self.state.in_keyword_plus_op) {
                self.state.pending_delta_next_line -= 1;
            }
            trace!(line = lineno, start, "operator continuation ended");
        }

        if last.kind == TokenKind::Comma {
            if self.state.groups_closed() {
                self.start_comma_continuation(lineno);
            }
        } else if let Some(start) = self.state.last_comma_continuation_line.take() {
            if !std::mem::take(&mut self.state.in_keyword_plus_comma) {
                self.state.pending_delta_next_line -= 1;
            }
            trace!(line = lineno, start, "comma continuation ended");
        }

        if last.kind == TokenKind::Period {
            if !opened_here {
                self.start_period_continuation(lineno);
            }
        } else if let Some(start) = self.state.last_period_continuation_line.take() {
            if !std::mem::take(&mut self.state.in_keyword_plus_period) {
                self.state.pending_delta_next_line -= 1;
            }
            trace!(line = lineno, start, "period continuation ended");
        }

        self.track_period_chain(line);
    }

    fn start_op_continuation(&mut self, lineno: usize) {
        if self.state.op_continuation_line.is_none() {
            if self.state.indent_keyword_this_line {
                self.state.in_keyword_plus_op = true;
            } else {
                self.state.pending_delta_next_line += 1;
            }
            trace!(line = lineno, "operator continuation started");
        }
        self.state.op_continuation_line = Some(lineno);
    }

    fn start_comma_continuation(&mut self, lineno: usize) {
        if self.state.last_comma_continuation_line.is_none() {
            if self.state.indent_keyword_this_line {
                self.state.in_keyword_plus_comma = true;
            } else {
                self.state.pending_delta_next_line += 1;
            }
            trace!(line = lineno, "comma continuation started");
        }
        self.state.last_comma_continuation_line = Some(lineno);
    }

    fn start_period_continuation(&mut self, lineno: usize) {
        if self.state.last_period_continuation_line.is_none() {
            if self.state.indent_keyword_this_line {
                self.state.in_keyword_plus_period = true;
            } else {
                self.state.pending_delta_next_line += 1;
            }
            trace!(line = lineno, "period continuation started");
        }
        self.state.last_period_continuation_line = Some(lineno);
    }

    /// Lines starting with a period continue a method chain one level deeper than the line
    /// the chain hangs off. The chain ends at the first line that neither starts with a
    /// period nor sits deeper than the chain.
    fn track_period_chain(&mut self, line: &LineView<'_>) {
        let leads_with_period = line
            .first_significant()
            .is_some_and(|first| first.kind == TokenKind::Period);

        match self.state.period_chain {
            None if leads_with_period => {
                self.state.period_chain = Some(self.state.line_start_expectation);
                self.state.expected_this_line += self.unit;
                self.state.pending_delta_next_line += 1;
                trace!(line = line.lineno(), "method chain started");
            }
            Some(base)
                if !leads_with_period && self.state.line_start_expectation <= base + self.unit =>
            {
                self.state.period_chain = None;
                self.state.expected_this_line =
                    self.state.expected_this_line.saturating_sub(self.unit);
                self.state.pending_delta_next_line -= 1;
                trace!(line = line.lineno(), "method chain ended");
            }
            _ => {}
        }
    }
}

fn ends_with_operator(line: &LineView<'_>, last: &Token) -> bool {
    match last.kind {
        TokenKind::Operator => !(last.text == "|" && opens_block_params(line)),
        TokenKind::Keyword => last.text == "and" || last.text == "or",
        _ => false,
    }
}

/// True if the line opens a block with parameters, so that a trailing `|` closes the
/// parameter list rather than continuing an expression.
fn opens_block_params(line: &LineView<'_>) -> bool {
    line.tokens()
        .iter()
        .any(|token| token.is_keyword("do") || token.kind == TokenKind::LeftBrace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plumb::testing::replay_indentation;

    fn expectations(source: &str) -> Vec<Measurement> {
        replay_indentation(source, 2, false).1
    }

    #[test]
    fn test_simple_block() {
        assert!(expectations("def foo\n  true\nend").is_empty());
    }

    #[test]
    fn test_misindented_body() {
        assert_eq!(
            expectations("def foo\n    true\nend\n"),
            vec![Measurement {
                line: 2,
                actual: 4,
                expected: 2
            }]
        );
    }

    #[test]
    fn test_continuation_keywords_align_with_opener() {
        let source = "if a\n  x\nelsif b\n  y\nelse\n  z\nend\n";
        assert!(expectations(source).is_empty());
        let source = "case x\nwhen 1\n  a\nwhen 2 then b\nelse\n  c\nend\n";
        assert!(expectations(source).is_empty());
    }

    #[test]
    fn test_modifier_does_not_indent() {
        assert!(expectations("def foo\n  return if x\n  bar\nend\n").is_empty());
    }

    #[test]
    fn test_single_line_block() {
        assert!(expectations("if a then b end\nfoo\n").is_empty());
        assert!(expectations("def foo; end\nbar\n").is_empty());
        assert!(expectations("def x\n  y = if a then b else c end\n  z\nend\n").is_empty());
    }

    #[test]
    fn test_brackets_and_braces() {
        let source = "x = {\n  a: [\n    1,\n    2,\n  ],\n}\ny\n";
        assert!(expectations(source).is_empty());
    }

    #[test]
    fn test_block_inside_call() {
        let source = "foo(bar do\n  x\nend)\ny\n";
        assert!(expectations(source).is_empty());
    }

    #[test]
    fn test_operator_continuation() {
        assert!(expectations("x = a +\n  b +\n  c\ny\n").is_empty());
        assert_eq!(
            expectations("x = a +\nb\n"),
            vec![Measurement {
                line: 2,
                actual: 0,
                expected: 2
            }]
        );
    }

    #[test]
    fn test_keyword_plus_operator_is_not_counted_twice() {
        assert!(expectations("if a &&\n  b\n  c\nend\n").is_empty());
    }

    #[test]
    fn test_block_params_pipe_is_not_an_operator() {
        assert!(expectations("items.each do |item|\n  puts item\nend\n").is_empty());
        assert!(expectations("items.each { |item|\n  puts item\n}\n").is_empty());
    }

    #[test]
    fn test_trailing_comma_without_parens() {
        assert!(expectations("puts a,\n  b\nc\n").is_empty());
    }

    #[test]
    fn test_trailing_period() {
        assert!(expectations("foo.\n  bar\nbaz\n").is_empty());
    }

    #[test]
    fn test_trailing_period_ending_on_a_paren_line() {
        // the continuation ends on the line that opens the paren, taking the paren's raise
        // with it, so the arguments sit at the continuation level and the closer one below
        assert!(expectations("x = a.\n  b(\n  c\n)\n").is_empty());
        assert_eq!(
            expectations("x = a.\n  b(\n    c\n  )\n"),
            vec![
                Measurement {
                    line: 3,
                    actual: 4,
                    expected: 2
                },
                Measurement {
                    line: 4,
                    actual: 2,
                    expected: 0
                }
            ]
        );
    }

    #[test]
    fn test_leading_period_chain() {
        assert!(expectations("foo\n  .bar\n  .baz\nqux\n").is_empty());
        assert!(expectations("def x\n  foo\n    .bar\nend\n").is_empty());
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert!(expectations("def foo\n\n  # note\n  x\nend\n").is_empty());
        assert_eq!(
            expectations("def foo\n# note\n  x\nend\n"),
            vec![Measurement {
                line: 2,
                actual: 0,
                expected: 2
            }]
        );
    }

    #[test]
    fn test_multiline_string_tail_is_not_measured() {
        assert!(expectations("x = \"a\n      b\"\ny\n").is_empty());
        assert!(expectations("def foo\n  x = <<~EOS\n    text\n  EOS\n  y\nend\n").is_empty());
    }

    #[test]
    fn test_interpolation_brace() {
        assert!(expectations("def foo\n  \"#{x}\"\n  y\nend\n").is_empty());
    }

    #[test]
    fn test_endless_def_and_loop_do() {
        assert!(expectations("def one = 1\ntwo\n").is_empty());
        assert!(expectations("while x do\n  y\nend\nz\n").is_empty());
    }

    #[test]
    fn test_disable_directive() {
        let source = "# plumb:disable indentation\n      weird\n# plumb:enable indentation\nok\n";
        assert!(expectations(source).is_empty());
    }

    #[test]
    fn test_stray_closers_never_panic() {
        let (machine, _) = replay_indentation("end\n)\n}\n]\n", 2, false);
        assert!(machine.state().is_balanced());
        assert_eq!(machine.state().expected_next_line, 0);
    }

    #[test]
    fn test_unbalanced_input_leaves_stack_open() {
        let (machine, _) = replay_indentation("foo(\n  bar\n", 2, false);
        assert_eq!(machine.state().paren_lines.len(), 1);
    }

    #[test]
    fn test_alignment_column() {
        let source = "foo(a,\n    b)\n";
        assert!(replay_indentation(source, 2, true).1.is_empty());
        assert_eq!(
            replay_indentation(source, 2, false).1,
            vec![Measurement {
                line: 2,
                actual: 4,
                expected: 2
            }]
        );
    }
}
