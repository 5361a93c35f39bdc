//! Format registry for report rendering
//!
//! Each format implements the `ReportFormatter` trait and can be registered with
//! `FormatRegistry`.

use crate::plumb::checker::Report;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for report formatters
pub trait ReportFormatter: Send + Sync {
    /// The name of this format (e.g., "text", "json")
    fn name(&self) -> &str;

    fn render(&self, report: &Report) -> Result<String, FormatError>;

    fn description(&self) -> &str {
        ""
    }
}

/// Registry of report formatters, looked up by name.
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn ReportFormatter>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter
    ///
    /// If a formatter with the same name already exists, it will be replaced.
    pub fn register<F: ReportFormatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn ReportFormatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn render(&self, report: &Report, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.render(report)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::TextFormatter);
        registry.register(super::JsonFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestFormatter;
    impl ReportFormatter for TestFormatter {
        fn name(&self) -> &str {
            "test"
        }
        fn render(&self, _report: &Report) -> Result<String, FormatError> {
            Ok("test output".to_string())
        }
    }

    #[test]
    fn test_registry_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["json", "text"]);
    }

    #[test]
    fn test_registry_register_and_render() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormatter);
        assert!(registry.has("test"));
        assert_eq!(
            registry.render(&Report::new(), "test").unwrap(),
            "test output"
        );
    }

    #[test]
    fn test_registry_render_not_found() {
        let registry = FormatRegistry::new();
        match registry.render(&Report::new(), "nonexistent") {
            Err(FormatError::FormatNotFound(name)) => assert_eq!(name, "nonexistent"),
            other => panic!("Expected FormatNotFound error, got {:?}", other),
        }
    }
}
