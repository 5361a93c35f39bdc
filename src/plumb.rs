//! Main module for plumb library functionality
//!
//!     The checker never builds a syntax tree. Every decision is made from a line grouped token
//!     stream: the tokenizer produces position tagged tokens, the dispatcher slices them into
//!     lines and hands each token and each line end to the registered rules as events, and the
//!     rules turn what they see into problems.
//!
//!     Data only flows one way:
//!
//!         tokenizer -> Dispatcher -> rules (indentation state machine, others) -> Problems -> Checker

pub mod checker;
pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod formats;
pub mod indentation;
pub mod lexing;
pub mod logging;
pub mod problem;
pub mod rules;
pub mod testing;
pub mod token;

pub use checker::{CheckError, Checker, Report};
pub use config::{ConfigError, StyleConfig};
pub use problem::{Level, Problem, ProblemDetail, ProblemKind};
