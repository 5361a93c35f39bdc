//! Checker
//!
//!     The [Checker] is the driver: it owns a validated [StyleConfig] and turns sources, files
//!     and directory trees into problems. Every file gets a fresh tokenizer run, a fresh set of
//!     rules and a fresh dispatcher, so nothing a file does can leak into the next one. That is
//!     also what makes per-file parallelism safe: [Checker::check_style] checks the discovered
//!     files on the rayon pool and merges the results into a [Report] once all of them are done.

use crate::plumb::config::{ConfigError, StyleConfig};
use crate::plumb::discovery;
use crate::plumb::dispatch::Dispatcher;
use crate::plumb::lexing::tokenize;
use crate::plumb::problem::{Level, Problem, ProblemDetail};
use crate::plumb::rules::build_rules;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },
}

/// Problems per checked file. Files without problems are kept with an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    files: BTreeMap<PathBuf, Vec<Problem>>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: PathBuf, problems: Vec<Problem>) {
        self.files.insert(path, problems);
    }

    /// Add every file of `other`. A file present in both keeps the problems from `other`.
    pub fn merge(&mut self, other: Report) {
        self.files.extend(other.files);
    }

    pub fn files(&self) -> &BTreeMap<PathBuf, Vec<Problem>> {
        &self.files
    }

    pub fn problems_for(&self, path: &Path) -> Option<&[Problem]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn problem_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn error_count(&self) -> usize {
        self.files
            .values()
            .flatten()
            .filter(|problem| problem.level() == Level::Error)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.problem_count() == 0
    }
}

#[derive(Debug, Clone)]
pub struct Checker {
    config: StyleConfig,
}

impl Checker {
    pub fn new(config: StyleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Checker { config })
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Check one source text.
    ///
    /// Source that cannot be tokenized yields a single `lex_error` problem, or nothing when
    /// invalid source is allowed.
    pub fn check_source(&self, source: &str) -> Vec<Problem> {
        let tokens = match tokenize(source) {
            Ok(tokens) => tokens,
            Err(err) => {
                let invalid = &self.config.allow_invalid_source;
                if invalid.allowed || invalid.level == Level::Off {
                    debug!(%err, "skipping source that cannot be tokenized");
                    return Vec::new();
                }
                return vec![Problem::new(
                    err.line(),
                    err.column(),
                    ProblemDetail::LexError {
                        reason: err.to_string(),
                    },
                    invalid.level,
                )];
            }
        };

        let mut dispatcher = Dispatcher::new();
        for rule in build_rules(&self.config) {
            dispatcher.add_observer(rule);
        }
        dispatcher.run(tokens);
        dispatcher.into_problems()
    }

    pub fn check_file(&self, path: impl AsRef<Path>) -> Result<Vec<Problem>, CheckError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let problems = self.check_source(&source);
        debug!(path = %path.display(), problems = problems.len(), "checked file");
        Ok(problems)
    }

    /// Check a file, or every source file below a directory.
    ///
    /// A file that cannot be read is logged and left out of the report.
    pub fn check_style(&self, path: impl AsRef<Path>) -> Result<Report, CheckError> {
        let files = discovery::discover(path.as_ref())?;
        info!(files = files.len(), "checking");

        let results: Vec<(PathBuf, Result<Vec<Problem>, CheckError>)> = files
            .into_par_iter()
            .map(|file| {
                let result = self.check_file(&file);
                (file, result)
            })
            .collect();

        let mut report = Report::new();
        for (file, result) in results {
            match result {
                Ok(problems) => report.insert(file, problems),
                Err(err) => warn!(%err, "skipping file"),
            }
        }
        Ok(report)
    }
}
