//! Structural validation of manifests

use crate::config::validate_release_config;
use crate::error::ManifestError;

use super::types::Manifest;

/// Maximum package name length
pub const MAX_PACKAGE_NAME_LEN: usize = 214;

/// Maximum tag format length
pub const MAX_TAG_FORMAT_LEN: usize = 256;

/// Maximum entries in each dependency list
pub const MAX_DEPENDENCIES: usize = 256;

/// Maximum number of publish targets
pub const MAX_TARGETS: usize = 64;

/// Maximum entries in each script list
pub const MAX_SCRIPTS: usize = 64;

/// Maximum length of a single script
pub const MAX_SCRIPT_LEN: usize = 1024;

/// Validate a freshly parsed or merged manifest
pub fn validate_manifest(manifest: &Manifest) -> Result<(), ManifestError> {
    let invalid = |reason: String| ManifestError::Invalid {
        package: manifest.package_name.clone(),
        reason,
    };

    let name_len = manifest.package_name.chars().count();
    if name_len == 0 || name_len > MAX_PACKAGE_NAME_LEN {
        return Err(invalid(format!(
            "package name must be 1 to {} characters",
            MAX_PACKAGE_NAME_LEN
        )));
    }

    if let Some(format) = manifest.tag_format() {
        if format.is_empty() || format.chars().count() > MAX_TAG_FORMAT_LEN {
            return Err(invalid(format!(
                "tagFormat must be 1 to {} characters",
                MAX_TAG_FORMAT_LEN
            )));
        }
    }

    for (label, names) in [
        ("dependencies", &manifest.dependencies.required),
        ("optionalDependencies", &manifest.dependencies.optional),
        ("devDependencies", &manifest.dependencies.development),
    ] {
        if names.len() > MAX_DEPENDENCIES {
            return Err(invalid(format!(
                "{} has more than {} entries",
                label, MAX_DEPENDENCIES
            )));
        }
        if names.iter().any(|n| n.is_empty()) {
            return Err(invalid(format!("{} contains an empty name", label)));
        }
    }

    if manifest.targets.len() > MAX_TARGETS {
        return Err(invalid(format!(
            "targets has more than {} entries",
            MAX_TARGETS
        )));
    }
    if manifest.targets.iter().any(|t| t.target_type.is_empty()) {
        return Err(invalid("target type cannot be empty".to_string()));
    }

    for (label, scripts) in [
        ("preRelease", &manifest.pre_release),
        ("postRelease", &manifest.post_release),
    ] {
        if scripts.len() > MAX_SCRIPTS {
            return Err(invalid(format!(
                "{} has more than {} entries",
                label, MAX_SCRIPTS
            )));
        }
        if scripts.iter().any(|s| s.chars().count() > MAX_SCRIPT_LEN) {
            return Err(invalid(format!(
                "{} entries must be at most {} characters",
                label, MAX_SCRIPT_LEN
            )));
        }
    }

    validate_release_config(&manifest.release_config()).map_err(|e| invalid(e.to_string()))
}
