//! Configuration validation

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::defaults::{MAX_CHANGE_TYPES, MAX_SCHEMA_PARTS, PACKAGE_NAME_VARIABLE};
use super::types::{BaseVersion, ChangeType, ReleaseConfig, VersionSchema};

/// Schema part names double as template variable names
static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex"));

/// Validate configuration
pub fn validate_config(config: &ReleaseConfig) -> Result<()> {
    debug!("validating configuration");
    validate_release_config(config)?;
    debug!("configuration validation passed");
    Ok(())
}

/// Validate every structural constraint of a release configuration
pub fn validate_release_config(config: &ReleaseConfig) -> std::result::Result<(), ConfigError> {
    validate_schema(&config.version_schema)?;
    validate_change_types(&config.change_types, &config.version_schema)?;
    validate_base_version(&config.base_version, &config.version_schema)?;
    Ok(())
}

/// Schema must have 1..=16 unique identifier-like part names
pub fn validate_schema(schema: &VersionSchema) -> std::result::Result<(), ConfigError> {
    if schema.is_empty() || schema.len() > MAX_SCHEMA_PARTS {
        return Err(ConfigError::invalid(
            "version_schema",
            format!(
                "must have between 1 and {} parts, found {}",
                MAX_SCHEMA_PARTS,
                schema.len()
            ),
        ));
    }

    let mut seen = HashSet::new();
    for part in schema.parts() {
        if !IDENTIFIER_REGEX.is_match(part) {
            return Err(ConfigError::invalid(
                "version_schema",
                format!("part '{}' is not a valid identifier", part),
            ));
        }
        if part == PACKAGE_NAME_VARIABLE {
            return Err(ConfigError::invalid(
                "version_schema",
                format!("'{}' is reserved", PACKAGE_NAME_VARIABLE),
            ));
        }
        if !seen.insert(part.as_str()) {
            return Err(ConfigError::invalid(
                "version_schema",
                format!("part '{}' appears more than once", part),
            ));
        }
    }

    Ok(())
}

/// Change types must be unique and bump only parts the schema defines
pub fn validate_change_types(
    change_types: &[ChangeType],
    schema: &VersionSchema,
) -> std::result::Result<(), ConfigError> {
    if change_types.len() > MAX_CHANGE_TYPES {
        return Err(ConfigError::invalid(
            "change_types",
            format!("at most {} change types are allowed", MAX_CHANGE_TYPES),
        ));
    }

    let mut seen = HashSet::new();
    for (i, change_type) in change_types.iter().enumerate() {
        if change_type.id.is_empty() {
            return Err(ConfigError::invalid(
                format!("change_types[{}].id", i),
                "change type id cannot be empty",
            ));
        }
        if !seen.insert(change_type.id.as_str()) {
            return Err(ConfigError::invalid(
                format!("change_types[{}].id", i),
                format!("change type '{}' is defined more than once", change_type.id),
            ));
        }
        if let Some(part) = &change_type.bumps {
            if !schema.contains(part) {
                return Err(ConfigError::UnknownBumpPart {
                    change_type: change_type.id.clone(),
                    part: part.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Base version must have exactly one entry per schema part
pub fn validate_base_version(
    base: &BaseVersion,
    schema: &VersionSchema,
) -> std::result::Result<(), ConfigError> {
    if base.len() != schema.len() {
        return Err(ConfigError::BaseVersionLength {
            expected: schema.len(),
            actual: base.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = ReleaseConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_schema() {
        let config = ReleaseConfig::new(VersionSchema::new(Vec::<String>::new()), vec![]);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_schema_too_long() {
        let parts: Vec<String> = (0..17).map(|i| format!("P{}", i)).collect();
        let config = ReleaseConfig::new(VersionSchema::new(parts), vec![]);
        assert!(validate_schema(&config.version_schema).is_err());

        let parts: Vec<String> = (0..16).map(|i| format!("P{}", i)).collect();
        assert!(validate_schema(&VersionSchema::new(parts)).is_ok());
    }

    #[test]
    fn test_validate_duplicate_and_reserved_parts() {
        assert!(validate_schema(&VersionSchema::new(["MAJOR", "MAJOR"])).is_err());
        assert!(validate_schema(&VersionSchema::new(["MAJOR", "PACKAGE_NAME"])).is_err());
        assert!(validate_schema(&VersionSchema::new(["MAJOR", "not valid"])).is_err());
    }

    #[test]
    fn test_validate_identifier_parts() {
        assert!(validate_schema(&VersionSchema::new(["_internal", "Part2"])).is_ok());
        for bad in ["2MAJOR", "MAJOR-X", "", "ÄPFEL"] {
            assert!(
                validate_schema(&VersionSchema::new(["MAJOR", bad])).is_err(),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_validate_unknown_bump_part() {
        let config = ReleaseConfig::new(
            VersionSchema::default(),
            vec![ChangeType::new("feat", "Features", "FEATURE")],
        );

        let err = validate_release_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBumpPart { ref part, .. } if part == "FEATURE"));
    }

    #[test]
    fn test_validate_duplicate_change_type() {
        let config = ReleaseConfig::new(
            VersionSchema::default(),
            vec![
                ChangeType::new("fix", "Bug Fixes", "PATCH"),
                ChangeType::silent("fix", "Fixes"),
            ],
        );
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_base_version_length() {
        let config =
            ReleaseConfig::default().with_base_version(BaseVersion::new(vec![0, 1]));

        let err = validate_release_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::BaseVersionLength {
                expected: 3,
                actual: 2
            }
        ));
    }
}
