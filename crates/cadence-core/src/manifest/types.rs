//! Manifest types

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{BaseVersion, ChangeType, ReleaseConfig, VersionSchema};
use crate::planner::DependencyItem;

/// Per-package dependency name lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    /// Must be released first
    #[serde(default)]
    pub required: Vec<String>,
    /// Optional dependencies
    #[serde(default)]
    pub optional: Vec<String>,
    /// Development-only dependencies
    #[serde(default)]
    pub development: Vec<String>,
}

/// A publish target declared by a manifest (e.g. an npm registry or a container image)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Target kind, interpreted by the publish driver
    #[serde(rename = "type")]
    pub target_type: String,
    /// Remaining target options, opaque to the engine
    #[serde(flatten)]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl TargetConfig {
    /// Create a target with no options
    pub fn new(target_type: impl Into<String>) -> Self {
        Self {
            target_type: target_type.into(),
            options: BTreeMap::new(),
        }
    }
}

/// Settings a manifest may customize
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingKey {
    /// `versionSchema`
    VersionSchema,
    /// `changeTypes`
    ChangeTypes,
    /// `baseVersion`
    BaseVersion,
    /// `tagFormat`
    TagFormat,
}

impl SettingKey {
    /// Key as written in manifest files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VersionSchema => "versionSchema",
            Self::ChangeTypes => "changeTypes",
            Self::BaseVersion => "baseVersion",
            Self::TagFormat => "tagFormat",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective release settings of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSettings {
    /// Version part names
    pub version_schema: VersionSchema,
    /// Change types in display order
    pub change_types: Vec<ChangeType>,
    /// First-release version
    pub base_version: BaseVersion,
    /// Custom tag template
    pub tag_format: Option<String>,
}

impl PackageSettings {
    /// Settings inherited from a repository-wide configuration
    pub fn inherit(config: &ReleaseConfig) -> Self {
        Self {
            version_schema: config.version_schema.clone(),
            change_types: config.change_types.clone(),
            base_version: config.base_version.clone(),
            tag_format: None,
        }
    }

    /// Whether two settings agree on one key
    pub fn same_value(&self, other: &Self, key: SettingKey) -> bool {
        match key {
            SettingKey::VersionSchema => self.version_schema == other.version_schema,
            SettingKey::ChangeTypes => self.change_types == other.change_types,
            SettingKey::BaseVersion => self.base_version == other.base_version,
            SettingKey::TagFormat => self.tag_format == other.tag_format,
        }
    }

    /// Copy one key's value from another settings value
    pub fn take_value(&mut self, other: &Self, key: SettingKey) {
        match key {
            SettingKey::VersionSchema => self.version_schema = other.version_schema.clone(),
            SettingKey::ChangeTypes => self.change_types = other.change_types.clone(),
            SettingKey::BaseVersion => self.base_version = other.base_version.clone(),
            SettingKey::TagFormat => self.tag_format = other.tag_format.clone(),
        }
    }

    /// Re-derive an inherited base version after the schema changed
    pub(crate) fn align_base_version(&mut self, customized: &BTreeSet<SettingKey>) {
        if customized.contains(&SettingKey::VersionSchema)
            && !customized.contains(&SettingKey::BaseVersion)
        {
            self.base_version = BaseVersion::for_schema(&self.version_schema);
        }
    }

    /// Settings as a release configuration
    pub fn release_config(&self) -> ReleaseConfig {
        ReleaseConfig {
            version_schema: self.version_schema.clone(),
            base_version: self.base_version.clone(),
            change_types: self.change_types.clone(),
        }
    }
}

/// Configuration of one package, possibly merged from several files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Package name
    pub package_name: String,
    /// Dependency names
    pub dependencies: Dependencies,
    /// Publish targets
    pub targets: Vec<TargetConfig>,
    /// Effective settings
    pub settings: PackageSettings,
    /// Settings explicitly set by a manifest file rather than inherited
    pub customized: BTreeSet<SettingKey>,
    /// Commands run before publishing
    pub pre_release: Vec<String>,
    /// Commands run after publishing
    pub post_release: Vec<String>,
    /// Files this manifest was assembled from
    pub sources: Vec<PathBuf>,
}

impl Manifest {
    /// Create a manifest that inherits every setting
    pub fn new(package_name: impl Into<String>, config: &ReleaseConfig) -> Self {
        Self {
            package_name: package_name.into(),
            dependencies: Dependencies::default(),
            targets: Vec::new(),
            settings: PackageSettings::inherit(config),
            customized: BTreeSet::new(),
            pre_release: Vec::new(),
            post_release: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Set a custom tag format and mark it customized
    pub fn with_tag_format(mut self, format: impl Into<String>) -> Self {
        self.settings.tag_format = Some(format.into());
        self.customized.insert(SettingKey::TagFormat);
        self
    }

    /// Set dependencies
    pub fn with_dependencies(mut self, dependencies: Dependencies) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Whether a setting was explicitly customized
    pub fn is_customized(&self, key: SettingKey) -> bool {
        self.customized.contains(&key)
    }

    /// Custom tag format, if any
    pub fn tag_format(&self) -> Option<&str> {
        self.settings.tag_format.as_deref()
    }

    /// Effective release configuration of this package
    pub fn release_config(&self) -> ReleaseConfig {
        self.settings.release_config()
    }

    /// Planner input for this package
    pub fn dependency_item(&self) -> DependencyItem {
        DependencyItem {
            name: self.package_name.clone(),
            required: self.dependencies.required.clone(),
            optional: self.dependencies.optional.clone(),
            development: self.dependencies.development.clone(),
        }
    }
}
