//! Testing utilities
//!
//!     Rules are tested by feeding them real source, never hand built token streams: the
//!     tokenizer is part of what a rule relies on, and a rule that only works on invented
//!     tokens is not tested at all.
//!
//!     [run_rule] drives one rule over a source string and returns its problems.
//!     [replay_indentation] does the same for the indentation state machine and also hands back
//!     the machine, so tests can inspect the state it ended in.
//!
//!     Problems are checked with the fluent [assert_problems] API:
//!
//!     ```rust-example
//!     let problems = checker.check_source("if x\n    y\nend\n");
//!     assert_problems(&problems)
//!         .count(1)
//!         .problem(0, |p| p.kind(ProblemKind::Indentation).line(2).column(4));
//!     ```

mod testing_assertions;

pub use testing_assertions::{assert_problems, ProblemAssertion, ProblemsAssertion};

use crate::plumb::config::{IndentationSpacesConfig, Toggle};
use crate::plumb::dispatch::Dispatcher;
use crate::plumb::indentation::{IndentationStateMachine, Measurement};
use crate::plumb::lexing::tokenize;
use crate::plumb::problem::{Problem, ProblemDetail};
use crate::plumb::rules::{IndentationSpacesRule, RuleObserver};
use crate::plumb::token::Token;

/// Tokenize test source, panicking with the lexer error on failure.
pub fn tokens_of(source: &str) -> Vec<Token> {
    tokenize(source).unwrap_or_else(|err| panic!("test source failed to tokenize: {}", err))
}

/// Run a single rule over `source` and return the problems it reported, ordered by line.
pub fn run_rule<R: RuleObserver + 'static>(rule: R, source: &str) -> Vec<Problem> {
    let mut dispatcher = Dispatcher::<R>::new();
    dispatcher.add_observer(Box::new(rule));
    dispatcher.run(tokens_of(source));
    dispatcher.into_problems()
}

/// Run the indentation state machine over `source`. Returns the machine as it was after the
/// last event, and every line whose indentation did not match.
pub fn replay_indentation(
    source: &str,
    unit: usize,
    argument_alignment: bool,
) -> (IndentationStateMachine, Vec<Measurement>) {
    let config = IndentationSpacesConfig {
        spaces: unit,
        argument_alignment: Toggle(argument_alignment),
        ..Default::default()
    };
    let mut dispatcher = Dispatcher::<IndentationSpacesRule>::new();
    let handle = dispatcher.add_observer(Box::new(IndentationSpacesRule::new(&config)));
    dispatcher.run(tokens_of(source));

    let machine = dispatcher.observer(handle).machine().clone();
    let measurements = dispatcher
        .into_problems()
        .into_iter()
        .filter_map(|problem| match problem.detail() {
            ProblemDetail::Indentation {
                actual_indentation,
                should_be_at,
            } => Some(Measurement {
                line: problem.line(),
                actual: *actual_indentation,
                expected: *should_be_at,
            }),
            _ => None,
        })
        .collect();
    (machine, measurements)
}
