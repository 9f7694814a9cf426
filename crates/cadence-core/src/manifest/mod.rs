//! Package manifests
//!
//! A package may be described by several manifest files. Each is parsed into
//! a [`Manifest`], validated, and manifests sharing a package name are merged
//! into one before planning.

mod merge;
mod record;
mod types;
pub mod validation;

pub use merge::{merge_manifests, merge_pair};
pub use record::ManifestRecord;
pub use types::{Dependencies, Manifest, PackageSettings, SettingKey, TargetConfig};
