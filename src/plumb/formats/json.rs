//! JSON report: an object mapping each checked file to the list of its problems.

use super::registry::{FormatError, ReportFormatter};
use crate::plumb::checker::Report;

pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn render(&self, report: &Report) -> Result<String, FormatError> {
        Ok(render_json(report)?)
    }

    fn description(&self) -> &str {
        "Machine readable report"
    }
}

pub fn render_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plumb::problem::{Level, Problem, ProblemDetail};
    use serde_json::{json, Value};
    use std::path::PathBuf;

    #[test]
    fn test_problem_fields() {
        let mut report = Report::new();
        report.insert(
            PathBuf::from("a.rb"),
            vec![
                Problem::new(
                    3,
                    49,
                    ProblemDetail::Indentation {
                        actual_indentation: 49,
                        should_be_at: 2,
                    },
                    Level::Error,
                ),
                Problem::new(4, 5, ProblemDetail::UnnecessaryInterpolation, Level::Warning),
            ],
        );
        report.insert(PathBuf::from("b.rb"), Vec::new());

        let value: Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "a.rb": [
                    {
                        "type": "indentation",
                        "line": 3,
                        "column": 49,
                        "message": "Line is indented to column 49, but should be at 2.",
                        "level": "error",
                        "detail": {"actual_indentation": 49, "should_be_at": 2}
                    },
                    {
                        "type": "unnecessary_string_interpolation",
                        "line": 4,
                        "column": 5,
                        "message": "Variable interpolated unnecessarily",
                        "level": "warning"
                    }
                ],
                "b.rb": []
            })
        );
    }
}
