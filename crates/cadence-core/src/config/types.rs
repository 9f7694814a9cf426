//! Configuration types

use serde::{Deserialize, Serialize};

use super::defaults::{default_change_types, default_schema_parts};

/// Ordered, named positions of a version number (e.g. `MAJOR`, `MINOR`, `PATCH`).
///
/// The position of a name is both the index into
/// `VersionNumber::numerical` and the tag template variable bound to it.
/// Index 0 is the most significant part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionSchema(Vec<String>);

impl VersionSchema {
    /// Create a schema from part names. Not validated; see [`super::validate_schema`].
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the schema has no parts
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of a part by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|p| p == name)
    }

    /// Part name at an index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Whether the schema defines the given part
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Part names in significance order
    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl Default for VersionSchema {
    fn default() -> Self {
        Self::new(default_schema_parts())
    }
}

/// A kind of change-log entry and the schema part it bumps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeType {
    /// Identifier used by change-set entries (e.g. `feat`)
    pub id: String,
    /// Plural label used as the section heading (e.g. `Features`)
    pub plural: String,
    /// Schema part this change bumps; `None` never triggers a release alone
    #[serde(default)]
    pub bumps: Option<String>,
}

impl ChangeType {
    /// Create a change type that bumps a schema part
    pub fn new(id: impl Into<String>, plural: impl Into<String>, bumps: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            plural: plural.into(),
            bumps: Some(bumps.into()),
        }
    }

    /// Create a change type that is listed but never releases on its own
    pub fn silent(id: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            plural: plural.into(),
            bumps: None,
        }
    }
}

/// Version assigned on a package's first release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseVersion(Vec<u64>);

impl BaseVersion {
    /// Create a base version from explicit parts
    pub fn new(parts: Vec<u64>) -> Self {
        Self(parts)
    }

    /// `1` followed by zeros, one entry per schema part
    pub fn for_schema(schema: &VersionSchema) -> Self {
        let mut parts = vec![0; schema.len()];
        if let Some(first) = parts.first_mut() {
            *first = 1;
        }
        Self(parts)
    }

    /// Numeric parts
    pub fn parts(&self) -> &[u64] {
        &self.0
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parts
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Release configuration: version schema, change types and base version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawReleaseConfig")]
pub struct ReleaseConfig {
    /// Names of the version parts
    pub version_schema: VersionSchema,

    /// Version used for a first release
    pub base_version: BaseVersion,

    /// Change types in display order
    pub change_types: Vec<ChangeType>,
}

impl ReleaseConfig {
    /// Create a configuration with the default base version for the schema
    pub fn new(version_schema: VersionSchema, change_types: Vec<ChangeType>) -> Self {
        let base_version = BaseVersion::for_schema(&version_schema);
        Self {
            version_schema,
            base_version,
            change_types,
        }
    }

    /// Replace the base version
    pub fn with_base_version(mut self, base_version: BaseVersion) -> Self {
        self.base_version = base_version;
        self
    }

    /// Look up a change type by id
    pub fn change_type(&self, id: &str) -> Option<&ChangeType> {
        self.change_types.iter().find(|t| t.id == id)
    }

    /// Schema index bumped by a change type, if it bumps anything
    pub fn bump_index(&self, change_type: &str) -> Option<usize> {
        self.change_type(change_type)
            .and_then(|t| t.bumps.as_deref())
            .and_then(|part| self.version_schema.index_of(part))
    }
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self::new(VersionSchema::default(), default_change_types())
    }
}

/// Serialized form; the base version defaults from the schema length
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawReleaseConfig {
    version_schema: VersionSchema,
    change_types: Vec<ChangeType>,
    base_version: Option<BaseVersion>,
}

impl Default for RawReleaseConfig {
    fn default() -> Self {
        Self {
            version_schema: VersionSchema::default(),
            change_types: default_change_types(),
            base_version: None,
        }
    }
}

impl From<RawReleaseConfig> for ReleaseConfig {
    fn from(raw: RawReleaseConfig) -> Self {
        let config = ReleaseConfig::new(raw.version_schema, raw.change_types);
        match raw.base_version {
            Some(base) => config.with_base_version(base),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_version() {
        let config = ReleaseConfig::default();
        assert_eq!(config.base_version.parts(), &[1, 0, 0]);

        let schema = VersionSchema::new(["YEAR", "RELEASE"]);
        assert_eq!(BaseVersion::for_schema(&schema).parts(), &[1, 0]);
    }

    #[test]
    fn test_bump_index() {
        let config = ReleaseConfig::default();
        assert_eq!(config.bump_index("breaking"), Some(0));
        assert_eq!(config.bump_index("feat"), Some(1));
        assert_eq!(config.bump_index("fix"), Some(2));
        assert_eq!(config.bump_index("docs"), None);
        assert_eq!(config.bump_index("unknown"), None);
    }

    #[test]
    fn test_deserialize_defaults_base_version_from_schema() {
        let config: ReleaseConfig = serde_json::from_str(
            r#"{"version_schema": ["MAJOR", "MINOR"], "change_types": [{"id": "feat", "plural": "Features", "bumps": "MINOR"}]}"#,
        )
        .unwrap();

        assert_eq!(config.base_version.parts(), &[1, 0]);
        assert_eq!(config.change_types.len(), 1);
    }

    #[test]
    fn test_deserialize_null_bump() {
        let config: ReleaseConfig = serde_json::from_str(
            r#"{"change_types": [{"id": "docs", "plural": "Documentation", "bumps": null}]}"#,
        )
        .unwrap();

        assert!(config.change_types[0].bumps.is_none());
        assert_eq!(config.version_schema, VersionSchema::default());
    }
}
