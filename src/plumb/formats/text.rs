//! Plain text report
//!
//!     Files without problems are left out. Each file with problems gets a header line and one
//!     numbered line per problem; a summary line closes the report.

use super::registry::{FormatError, ReportFormatter};
use crate::plumb::checker::Report;
use std::fmt::Write;

pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn render(&self, report: &Report) -> Result<String, FormatError> {
        Ok(render_text(report))
    }

    fn description(&self) -> &str {
        "Human readable problem listing"
    }
}

pub fn render_text(report: &Report) -> String {
    if report.is_clean() {
        return "Your files are in style.\n".to_string();
    }

    let mut out = String::new();
    for (path, problems) in report.files() {
        if problems.is_empty() {
            continue;
        }
        let _ = writeln!(out, "# File: {}", path.display());
        for (index, problem) in problems.iter().enumerate() {
            let _ = writeln!(
                out,
                "#  {:>3}  {}:{}  [{}] {}: {}",
                index + 1,
                problem.line(),
                problem.column(),
                problem.level(),
                problem.kind(),
                problem.message()
            );
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "{} problem(s), {} error(s) in {} file(s) checked.",
        report.problem_count(),
        report.error_count(),
        report.file_count()
    );
    out
}
