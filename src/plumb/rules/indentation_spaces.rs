//! The `indentation_spaces` rule: every line starts at the column the
//! [IndentationStateMachine] expects.

use super::{ProblemSink, RuleObserver};
use crate::plumb::config::IndentationSpacesConfig;
use crate::plumb::dispatch::{Event, EventKind};
use crate::plumb::indentation::IndentationStateMachine;
use crate::plumb::problem::{Problem, ProblemDetail};

pub struct IndentationSpacesRule {
    machine: IndentationStateMachine,
    sink: ProblemSink,
}

impl IndentationSpacesRule {
    pub const NAME: &'static str = "indentation_spaces";

    pub fn new(config: &IndentationSpacesConfig) -> Self {
        IndentationSpacesRule {
            machine: IndentationStateMachine::new(
                config.spaces,
                config.argument_alignment.is_on(),
            ),
            sink: ProblemSink::new(Self::NAME, config.level),
        }
    }

    pub fn machine(&self) -> &IndentationStateMachine {
        &self.machine
    }
}

impl RuleObserver for IndentationSpacesRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn events(&self) -> &'static [EventKind] {
        &[
            EventKind::Keyword,
            EventKind::LeftParen,
            EventKind::RightParen,
            EventKind::LeftBracket,
            EventKind::RightBracket,
            EventKind::LeftBrace,
            EventKind::RightBrace,
            EventKind::EmbeddedExprBegin,
            EventKind::EmbeddedExprEnd,
            EventKind::StringBegin,
            EventKind::StringEnd,
            EventKind::Comment,
            EventKind::Newline,
            EventKind::IgnoredNewline,
        ]
    }

    fn on_event(&mut self, event: &Event<'_>) {
        if let Some(measurement) = self.machine.handle(event) {
            self.sink.report(
                measurement.line,
                measurement.actual,
                ProblemDetail::Indentation {
                    actual_indentation: measurement.actual,
                    should_be_at: measurement.expected,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plumb::config::Toggle;
    use crate::plumb::problem::{Level, ProblemKind};
    use crate::plumb::testing::run_rule;

    #[test]
    fn test_reports_problem_fields() {
        let rule = IndentationSpacesRule::new(&IndentationSpacesConfig::default());
        let problems = run_rule(
            rule,
            "def something(waka, baka, bing\n              bla, goop, foop)\n  stuff\nend\n",
        );
        assert_eq!(problems.len(), 1);
        let problem = &problems[0];
        assert_eq!(problem.kind(), ProblemKind::Indentation);
        assert_eq!((problem.line(), problem.column()), (2, 14));
        assert_eq!(
            problem.message(),
            "Line is indented to column 14, but should be at 2."
        );
        assert_eq!(problem.level(), Level::Error);
    }

    #[test]
    fn test_argument_alignment_config() {
        let config = IndentationSpacesConfig {
            argument_alignment: Toggle(true),
            ..Default::default()
        };
        let problems = run_rule(
            IndentationSpacesRule::new(&config),
            "def something(waka, baka, bing\n              bla, goop, foop)\n  stuff\nend\n",
        );
        assert!(problems.is_empty());
    }

    #[test]
    fn test_off_level_runs_silently() {
        let config = IndentationSpacesConfig {
            level: Level::Off,
            ..Default::default()
        };
        let problems = run_rule(IndentationSpacesRule::new(&config), "def foo\n      x\nend\n");
        assert!(problems.is_empty());
    }

    #[test]
    fn test_four_space_unit() {
        let config = IndentationSpacesConfig {
            spaces: 4,
            ..Default::default()
        };
        let rule = IndentationSpacesRule::new(&config);
        assert!(run_rule(rule, "class Foo\n    def bar\n        1\n    end\nend\n").is_empty());
    }
}
