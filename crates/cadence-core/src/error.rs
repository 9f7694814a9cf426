//! Error types for Cadence

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using CadenceError
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Main error type for Cadence operations
#[derive(Debug, Error)]
pub enum CadenceError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Tag template errors
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Manifest validation and merge errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// A change type bumps a part the schema does not define
    #[error("Change type '{change_type}' bumps unknown schema part '{part}'")]
    UnknownBumpPart { change_type: String, part: String },

    /// Base version does not match the schema length
    #[error("Base version has {actual} parts but the version schema has {expected}")]
    BaseVersionLength { expected: usize, actual: usize },

    /// A tag format references a variable that cannot be bound
    #[error("Tag format '{format}' uses unknown variable '{variable}'")]
    UnknownTagVariable { format: String, variable: String },

    /// The tag format itself is malformed
    #[error("Invalid tag format: {0}")]
    InvalidTagFormat(#[from] TemplateError),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Shorthand for an [`ConfigError::InvalidValue`]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Version-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// String is not a version
    #[error("Invalid version format: {0}")]
    InvalidFormat(String),

    /// Part index outside the version
    #[error("Version part index {index} is out of range for {len} parts")]
    InvalidIndex { index: usize, len: usize },

    /// Incrementing would overflow a part
    #[error("Version part {0} cannot be incremented further")]
    Overflow(usize),
}

/// Tag template errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// `{{` without a matching `}}`
    #[error("Unclosed placeholder starting at offset {offset} in '{template}'")]
    UnclosedPlaceholder { template: String, offset: usize },

    /// `}}` without a matching `{{`
    #[error("Unmatched '}}}}' at offset {offset} in '{template}'")]
    UnmatchedClose { template: String, offset: usize },

    /// `{{?` section that is never closed
    #[error("Unclosed optional section starting at offset {offset} in '{template}'")]
    UnclosedSection { template: String, offset: usize },

    /// `{{}}` or a placeholder with only filters
    #[error("Empty placeholder at offset {offset} in '{template}'")]
    EmptyPlaceholder { template: String, offset: usize },

    /// Placeholder name is not an identifier
    #[error("Invalid variable name '{name}' in '{template}'")]
    InvalidVariable { template: String, name: String },

    /// Filter is unknown or has malformed arguments
    #[error("Unknown or malformed filter '{filter}' in '{template}'")]
    InvalidFilter { template: String, filter: String },

    /// Template exceeds the maximum length
    #[error("Template is {length} characters long, the maximum is {max}")]
    TooLong { length: usize, max: usize },

    /// The lookup could not provide a value while printing
    #[error("No value for template variable '{0}'")]
    UnboundVariable(String),
}

/// Manifest validation and merge failures.
///
/// These are ordinary outcomes of assembling the package list and are
/// returned to the caller rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// Two manifests for the same package customize a key differently
    #[error("Package '{package}' has conflicting values for '{key}' across manifests")]
    Conflict { package: String, key: String },

    /// Manifest fails structural validation
    #[error("Package '{package}' has an invalid manifest: {reason}")]
    Invalid { package: String, reason: String },

    /// Manifest record could not be read
    #[error("Manifest at {path} could not be parsed: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

impl ManifestError {
    /// Human-readable reason suitable for surfacing to users
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Package the failure refers to, if known
    pub fn package(&self) -> Option<&str> {
        match self {
            Self::Conflict { package, .. } | Self::Invalid { package, .. } => Some(package),
            Self::Malformed { .. } => None,
        }
    }
}

impl CadenceError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}
