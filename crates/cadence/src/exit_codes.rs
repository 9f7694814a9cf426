//! Exit codes for the CLI

use cadence_core::error::{
    CadenceError, ConfigError, ManifestError, TemplateError, VersionError,
};

use crate::cli::commands::{CycleError, ValidationFailed};

/// Success
pub const SUCCESS: u8 = 0;

/// General error
pub const ERROR: u8 = 1;

/// Configuration error
pub const CONFIG_ERROR: u8 = 2;

/// Version error
pub const VERSION_ERROR: u8 = 4;

/// Validation error
pub const VALIDATION_ERROR: u8 = 5;

/// Publish order has an unresolvable dependency cycle
pub const CYCLE_ERROR: u8 = 6;

/// Pick the exit code for a failed command
pub fn for_error(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<CycleError>().is_some() {
        return CYCLE_ERROR;
    }
    if err.downcast_ref::<ManifestError>().is_some()
        || err.downcast_ref::<ValidationFailed>().is_some()
    {
        return VALIDATION_ERROR;
    }
    if err.downcast_ref::<ConfigError>().is_some() || err.downcast_ref::<TemplateError>().is_some()
    {
        return CONFIG_ERROR;
    }
    if err.downcast_ref::<VersionError>().is_some() {
        return VERSION_ERROR;
    }

    match err.downcast_ref::<CadenceError>() {
        Some(CadenceError::Config(_) | CadenceError::Template(_)) => CONFIG_ERROR,
        Some(CadenceError::Toml(_) | CadenceError::Yaml(_)) => CONFIG_ERROR,
        Some(CadenceError::Version(_)) => VERSION_ERROR,
        Some(CadenceError::Manifest(_)) => VALIDATION_ERROR,
        _ => ERROR,
    }
}
