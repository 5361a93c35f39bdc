//! Report rendering
//!
//! This module contains the formats a [Report](crate::plumb::checker::Report) can be rendered
//! to for the command line:
//! - text: one block per file with problems and a summary line
//! - json: the report as a map from file path to its problems

pub mod json;
pub mod registry;
pub mod text;

pub use json::{render_json, JsonFormatter};
pub use registry::{FormatError, FormatRegistry, ReportFormatter};
pub use text::{render_text, TextFormatter};
