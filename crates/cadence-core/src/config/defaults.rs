//! Default configuration values

use super::types::{ChangeType, ReleaseConfig};

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "cadence.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "cadence.yaml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".cadence.toml";

/// Maximum number of parts a version schema may have
pub const MAX_SCHEMA_PARTS: usize = 16;

/// Maximum number of configured change types
pub const MAX_CHANGE_TYPES: usize = 64;

/// Template variable reserved for the package name
pub const PACKAGE_NAME_VARIABLE: &str = "PACKAGE_NAME";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ALT_CONFIG_FILE,
        ".cadence.yaml",
    ]
}

/// Semantic-versioning part names
pub fn default_schema_parts() -> Vec<&'static str> {
    vec!["MAJOR", "MINOR", "PATCH"]
}

/// Change types used when none are configured
pub fn default_change_types() -> Vec<ChangeType> {
    vec![
        ChangeType::new("breaking", "Breaking Changes", "MAJOR"),
        ChangeType::new("feat", "Features", "MINOR"),
        ChangeType::new("fix", "Bug Fixes", "PATCH"),
        ChangeType::silent("docs", "Documentation"),
        ChangeType::silent("chore", "Chores"),
    ]
}

/// Generate default configuration TOML
pub fn default_config_toml() -> String {
    let config = ReleaseConfig::default();
    toml::to_string_pretty(&config).unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string())
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Cadence Configuration

version_schema = ["MAJOR", "MINOR", "PATCH"]
base_version = [1, 0, 0]

[[change_types]]
id = "breaking"
plural = "Breaking Changes"
bumps = "MAJOR"

[[change_types]]
id = "feat"
plural = "Features"
bumps = "MINOR"

[[change_types]]
id = "fix"
plural = "Bug Fixes"
bumps = "PATCH"

[[change_types]]
id = "docs"
plural = "Documentation"

[[change_types]]
id = "chore"
plural = "Chores"
"#;
