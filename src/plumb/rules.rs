//! Rules
//!
//!     Every style rule is a [RuleObserver]: it declares the events it wants, receives them
//!     from the [Dispatcher](crate::plumb::dispatch::Dispatcher) and collects the problems it
//!     finds. Rules never look at each other's state.
//!
//!     A rule whose level is `off` keeps running, so whatever it tracks stays consistent, but
//!     its [ProblemSink] drops everything it reports.
//!
//! Shipped Rules
//!
//!     indentation_spaces:
//!         Expected indentation of every line. See [indentation_spaces].
//!     spaces_before_lbrace:
//!         Number of spaces before a `{`. See [spaces_before_lbrace].
//!     allow_unnecessary_interpolation:
//!         Strings made of nothing but one interpolation. See [unnecessary_interpolation].

pub mod indentation_spaces;
pub mod spaces_before_lbrace;
pub mod unnecessary_interpolation;

pub use indentation_spaces::IndentationSpacesRule;
pub use spaces_before_lbrace::SpacesBeforeLbraceRule;
pub use unnecessary_interpolation::UnnecessaryInterpolationRule;

use crate::plumb::config::StyleConfig;
use crate::plumb::dispatch::{Event, EventKind};
use crate::plumb::problem::{Level, Problem, ProblemDetail};
use tracing::debug;

/// The contract every rule implements.
pub trait RuleObserver {
    /// Configuration name of the rule.
    fn name(&self) -> &'static str;

    /// Events the rule subscribes to.
    fn events(&self) -> &'static [EventKind];

    fn on_event(&mut self, event: &Event<'_>);

    /// Called once after the last event of the file.
    fn finish(&mut self) {}

    fn problems(&self) -> &[Problem];

    fn take_problems(&mut self) -> Vec<Problem>;
}

/// Problem accumulator honouring a rule's level.
#[derive(Debug, Clone)]
pub struct ProblemSink {
    rule: &'static str,
    level: Level,
    problems: Vec<Problem>,
}

impl ProblemSink {
    pub fn new(rule: &'static str, level: Level) -> Self {
        ProblemSink {
            rule,
            level,
            problems: Vec::new(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn report(&mut self, line: usize, column: usize, detail: ProblemDetail) {
        if self.level == Level::Off {
            debug!(rule = self.rule, line, column, "problem dropped, rule is off");
            return;
        }
        debug!(rule = self.rule, line, column, ?detail, "problem");
        self.problems.push(Problem::new(line, column, detail, self.level));
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn take(&mut self) -> Vec<Problem> {
        std::mem::take(&mut self.problems)
    }
}

/// A fresh set of rules for one file, in the order their problems are reported.
pub fn build_rules(config: &StyleConfig) -> Vec<Box<dyn RuleObserver>> {
    vec![
        Box::new(IndentationSpacesRule::new(&config.indentation_spaces)),
        Box::new(SpacesBeforeLbraceRule::new(&config.spaces_before_lbrace)),
        Box::new(UnnecessaryInterpolationRule::new(
            &config.allow_unnecessary_interpolation,
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_drops_when_off() {
        let mut sink = ProblemSink::new("test", Level::Off);
        sink.report(1, 0, ProblemDetail::UnnecessaryInterpolation);
        assert!(sink.problems().is_empty());
    }

    #[test]
    fn test_sink_keeps_level() {
        let mut sink = ProblemSink::new("test", Level::Warning);
        sink.report(4, 2, ProblemDetail::UnnecessaryInterpolation);
        let problems = sink.take();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].level(), Level::Warning);
        assert!(sink.problems().is_empty());
    }

    #[test]
    fn test_build_rules_names() {
        let rules = build_rules(&StyleConfig::default());
        let names: Vec<_> = rules.iter().map(|rule| rule.name()).collect();
        assert_eq!(
            names,
            vec![
                "indentation_spaces",
                "spaces_before_lbrace",
                "allow_unnecessary_interpolation"
            ]
        );
    }
}
