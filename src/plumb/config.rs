//! Style configuration
//!
//!     `defaults/plumb.default.yml` is embedded into the crate so that the documented defaults
//!     and the runtime defaults cannot drift apart. A project file (usually `.plumb.yml`) only
//!     lists what it changes: every section and every field falls back to its default, and
//!     unknown keys are rejected so that typos surface as errors instead of silently checking
//!     with the wrong settings.
//!
//!     Configuration is validated once, before any file is checked.

use crate::plumb::problem::Level;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_YAML: &str = include_str!("../../defaults/plumb.default.yml");

/// Name of the project configuration file looked up in the working directory.
pub const PROJECT_FILE: &str = ".plumb.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid value for {rule}: {reason}")]
    Invalid { rule: &'static str, reason: String },
}

/// Top-level configuration, one section per rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub indentation_spaces: IndentationSpacesConfig,
    pub spaces_before_lbrace: SpacesBeforeLbraceConfig,
    pub allow_unnecessary_interpolation: UnnecessaryInterpolationConfig,
    pub allow_invalid_source: InvalidSourceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndentationSpacesConfig {
    /// Columns one nesting level adds.
    pub spaces: usize,
    /// Align continuation lines of parenthesized argument lists with the first argument.
    pub argument_alignment: Toggle,
    pub level: Level,
}

impl Default for IndentationSpacesConfig {
    fn default() -> Self {
        IndentationSpacesConfig {
            spaces: 2,
            argument_alignment: Toggle(false),
            level: Level::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpacesBeforeLbraceConfig {
    pub spaces: usize,
    pub level: Level,
}

impl Default for SpacesBeforeLbraceConfig {
    fn default() -> Self {
        SpacesBeforeLbraceConfig {
            spaces: 1,
            level: Level::Error,
        }
    }
}

/// `"#{x}"` is reported unless allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnnecessaryInterpolationConfig {
    pub allowed: bool,
    pub level: Level,
}

impl Default for UnnecessaryInterpolationConfig {
    fn default() -> Self {
        UnnecessaryInterpolationConfig {
            allowed: false,
            level: Level::Warning,
        }
    }
}

/// Source that cannot be tokenized is one problem for the file, or skipped when allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InvalidSourceConfig {
    pub allowed: bool,
    pub level: Level,
}

impl Default for InvalidSourceConfig {
    fn default() -> Self {
        InvalidSourceConfig {
            allowed: false,
            level: Level::Error,
        }
    }
}

/// A boolean that also reads `on` and `off`, which is how YAML users tend to write switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ToggleRepr", into = "bool")]
pub struct Toggle(pub bool);

impl Toggle {
    pub fn is_on(&self) -> bool {
        self.0
    }
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> bool {
        toggle.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ToggleRepr {
    Bool(bool),
    Word(String),
}

impl TryFrom<ToggleRepr> for Toggle {
    type Error = String;

    fn try_from(repr: ToggleRepr) -> Result<Self, Self::Error> {
        match repr {
            ToggleRepr::Bool(value) => Ok(Toggle(value)),
            ToggleRepr::Word(word) => match word.to_ascii_lowercase().as_str() {
                "on" | "true" | "yes" => Ok(Toggle(true)),
                "off" | "false" | "no" => Ok(Toggle(false)),
                other => Err(format!("expected on, off, true or false, got {:?}", other)),
            },
        }
    }
}

impl StyleConfig {
    /// The embedded defaults.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_yaml_str(DEFAULT_YAML)
    }

    /// Parse and validate a configuration document. Missing sections and fields keep their
    /// defaults; an empty document is the default configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: StyleConfig = if yaml.trim().is_empty() {
            StyleConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Load `path` if given, else the project file in `dir` if there is one, else the
    /// defaults.
    pub fn discover(path: Option<&Path>, dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let project = dir.as_ref().join(PROJECT_FILE);
        if project.is_file() {
            Self::load(project)
        } else {
            Self::defaults()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indentation_spaces.spaces == 0 {
            return Err(ConfigError::Invalid {
                rule: "indentation_spaces",
                reason: "spaces must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
