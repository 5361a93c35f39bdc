//! Indentation expectations
//!
//!     Predicting how deep a line should be indented without a syntax tree. The prediction is
//!     built from what the lines before it opened and closed: keyword blocks (`def` ... `end`),
//!     paren, bracket and brace groups, and multi-line expressions continued by a trailing
//!     operator, comma or period or by a leading period.
//!
//!     See [machine](machine) for how events move the expectation, [state](state) for what is
//!     tracked and [keywords](keywords) for the keyword tables and the tests telling a block
//!     opener from a statement modifier.

pub mod keywords;
pub mod machine;
pub mod state;

pub use machine::{IndentationStateMachine, Measurement};
pub use state::{IndentationState, OpenGroup};
