//! Cadence Core - Core library for release computation
//!
//! This crate provides the foundational types, error handling, configuration,
//! manifest merging and publish-order planning for the Cadence release engine.

pub mod config;
pub mod error;
pub mod manifest;
pub mod planner;

pub use config::{BaseVersion, ChangeType, ReleaseConfig, VersionSchema};
pub use error::{
    CadenceError, ConfigError, ManifestError, Result, TemplateError, VersionError,
};
pub use manifest::{
    merge_manifests, Dependencies, Manifest, ManifestRecord, SettingKey, TargetConfig,
};
pub use planner::{plan_release_order, Cycle, DependencyItem, DependencyKind, PlanResult};
