//! Fluent assertion API for problem lists

use crate::plumb::problem::{Level, Problem, ProblemKind};

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder for a list of problems
pub fn assert_problems(problems: &[Problem]) -> ProblemsAssertion<'_> {
    ProblemsAssertion { problems }
}

fn summarize(problems: &[Problem]) -> String {
    problems
        .iter()
        .map(|p| format!("{}:{} {}", p.line(), p.column(), p.kind()))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// List Assertions
// ============================================================================

pub struct ProblemsAssertion<'a> {
    problems: &'a [Problem],
}

impl<'a> ProblemsAssertion<'a> {
    /// Assert the number of problems
    pub fn count(self, expected: usize) -> Self {
        assert_eq!(
            self.problems.len(),
            expected,
            "Expected {} problems, found {}: [{}]",
            expected,
            self.problems.len(),
            summarize(self.problems)
        );
        self
    }

    pub fn none(self) -> Self {
        self.count(0)
    }

    /// Assert the lines problems were reported on, in order
    pub fn lines(self, expected: &[usize]) -> Self {
        let actual: Vec<usize> = self.problems.iter().map(|p| p.line()).collect();
        assert_eq!(
            actual,
            expected,
            "Problem lines differ: [{}]",
            summarize(self.problems)
        );
        self
    }

    /// Assert on a specific problem by index
    pub fn problem<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ProblemAssertion<'a>) -> ProblemAssertion<'a>,
    {
        assert!(
            index < self.problems.len(),
            "Problem index {} out of bounds (found {}: [{}])",
            index,
            self.problems.len(),
            summarize(self.problems)
        );
        assertion(ProblemAssertion {
            problem: &self.problems[index],
            context: format!("problems[{}]", index),
        });
        self
    }
}

// ============================================================================
// Single Problem Assertions
// ============================================================================

pub struct ProblemAssertion<'a> {
    problem: &'a Problem,
    context: String,
}

impl<'a> ProblemAssertion<'a> {
    pub fn kind(self, expected: ProblemKind) -> Self {
        assert_eq!(
            self.problem.kind(),
            expected,
            "{}: expected kind {}, found {}",
            self.context,
            expected,
            self.problem.kind()
        );
        self
    }

    pub fn line(self, expected: usize) -> Self {
        assert_eq!(
            self.problem.line(),
            expected,
            "{}: expected line {}, found {}",
            self.context,
            expected,
            self.problem.line()
        );
        self
    }

    pub fn column(self, expected: usize) -> Self {
        assert_eq!(
            self.problem.column(),
            expected,
            "{}: expected column {}, found {}",
            self.context,
            expected,
            self.problem.column()
        );
        self
    }

    pub fn level(self, expected: Level) -> Self {
        assert_eq!(
            self.problem.level(),
            expected,
            "{}: expected level {}, found {}",
            self.context,
            expected,
            self.problem.level()
        );
        self
    }

    pub fn message(self, expected: &str) -> Self {
        assert_eq!(
            self.problem.message(),
            expected,
            "{}: message differs",
            self.context
        );
        self
    }

    pub fn message_contains(self, needle: &str) -> Self {
        assert!(
            self.problem.message().contains(needle),
            "{}: expected message to contain {:?}, found {:?}",
            self.context,
            needle,
            self.problem.message()
        );
        self
    }
}
