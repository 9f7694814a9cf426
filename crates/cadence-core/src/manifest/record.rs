//! Raw manifest records

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BaseVersion, ChangeType, ReleaseConfig, VersionSchema};
use crate::error::ManifestError;

use super::types::{Dependencies, Manifest, PackageSettings, SettingKey, TargetConfig};
use super::validation::validate_manifest;

/// A discovered manifest file: its path and parsed content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRecord {
    /// Where the manifest was found
    pub path: PathBuf,
    /// Parsed content
    pub content: serde_json::Value,
}

impl ManifestRecord {
    /// Create a record from already-parsed content
    pub fn new(path: impl Into<PathBuf>, content: serde_json::Value) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }

    /// Read a JSON, YAML or TOML manifest file, chosen by extension
    pub fn read(path: &Path) -> Result<Self, ManifestError> {
        let malformed = |reason: String| ManifestError::Malformed {
            path: path.to_path_buf(),
            reason,
        };

        let text = std::fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {
                toml::from_str::<serde_json::Value>(&text).map_err(|e| malformed(e.to_string()))?
            }
            Some("yaml") | Some("yml") => serde_yaml::from_str::<serde_json::Value>(&text)
                .map_err(|e| malformed(e.to_string()))?,
            _ => serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?,
        };

        debug!(path = %path.display(), "read manifest record");
        Ok(Self::new(path, content))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawManifest {
    name: String,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    optional_dependencies: Vec<String>,
    #[serde(default)]
    dev_dependencies: Vec<String>,
    #[serde(default)]
    targets: Vec<TargetConfig>,
    version_schema: Option<VersionSchema>,
    change_types: Option<Vec<ChangeType>>,
    base_version: Option<BaseVersion>,
    tag_format: Option<String>,
    #[serde(default)]
    pre_release: Vec<String>,
    #[serde(default)]
    post_release: Vec<String>,
}

impl Manifest {
    /// Build a validated manifest from a record.
    ///
    /// Settings present in the record are marked customized; the rest are
    /// inherited from `defaults`.
    pub fn from_record(
        record: &ManifestRecord,
        defaults: &ReleaseConfig,
    ) -> Result<Self, ManifestError> {
        let raw: RawManifest =
            serde_json::from_value(record.content.clone()).map_err(|e| {
                ManifestError::Malformed {
                    path: record.path.clone(),
                    reason: e.to_string(),
                }
            })?;

        let mut settings = PackageSettings::inherit(defaults);
        let mut customized = BTreeSet::new();

        if let Some(schema) = raw.version_schema {
            settings.version_schema = schema;
            customized.insert(SettingKey::VersionSchema);
        }
        if let Some(change_types) = raw.change_types {
            settings.change_types = change_types;
            customized.insert(SettingKey::ChangeTypes);
        }
        if let Some(base) = raw.base_version {
            settings.base_version = base;
            customized.insert(SettingKey::BaseVersion);
        }
        if let Some(format) = raw.tag_format {
            settings.tag_format = Some(format);
            customized.insert(SettingKey::TagFormat);
        }
        settings.align_base_version(&customized);

        let manifest = Manifest {
            package_name: raw.name,
            dependencies: Dependencies {
                required: raw.dependencies,
                optional: raw.optional_dependencies,
                development: raw.dev_dependencies,
            },
            targets: raw.targets,
            settings,
            customized,
            pre_release: raw.pre_release,
            post_release: raw.post_release,
            sources: vec![record.path.clone()],
        };

        validate_manifest(&manifest)?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(content: serde_json::Value) -> ManifestRecord {
        ManifestRecord::new("packages/pkg/cadence.json", content)
    }

    #[test]
    fn test_minimal_record_inherits_everything() {
        let defaults = ReleaseConfig::default();
        let manifest = Manifest::from_record(&record(json!({"name": "pkg"})), &defaults).unwrap();

        assert_eq!(manifest.package_name, "pkg");
        assert!(manifest.customized.is_empty());
        assert_eq!(manifest.release_config(), defaults);
        assert_eq!(
            manifest.sources,
            vec![PathBuf::from("packages/pkg/cadence.json")]
        );
    }

    #[test]
    fn test_record_marks_customized_keys() {
        let manifest = Manifest::from_record(
            &record(json!({
                "name": "pkg",
                "tagFormat": "v{{MAJOR}}.{{MINOR}}",
                "dependencies": ["core"],
                "devDependencies": ["fixtures"],
                "targets": [{"type": "npm", "access": "public"}],
                "preRelease": ["npm run build"]
            })),
            &ReleaseConfig::default(),
        )
        .unwrap();

        assert!(manifest.is_customized(SettingKey::TagFormat));
        assert!(!manifest.is_customized(SettingKey::VersionSchema));
        assert_eq!(manifest.tag_format(), Some("v{{MAJOR}}.{{MINOR}}"));
        assert_eq!(manifest.dependencies.required, vec!["core"]);
        assert_eq!(manifest.dependencies.development, vec!["fixtures"]);
        assert_eq!(manifest.targets[0].target_type, "npm");
        assert_eq!(manifest.pre_release, vec!["npm run build"]);
    }

    #[test]
    fn test_custom_schema_derives_base_version() {
        let manifest = Manifest::from_record(
            &record(json!({
                "name": "pkg",
                "versionSchema": ["RELEASE", "FIX"],
                "changeTypes": [{"id": "fix", "plural": "Fixes", "bumps": "FIX"}]
            })),
            &ReleaseConfig::default(),
        )
        .unwrap();

        assert_eq!(manifest.settings.base_version.parts(), &[1, 0]);
        assert!(!manifest.is_customized(SettingKey::BaseVersion));
    }

    #[test]
    fn test_record_with_inconsistent_settings_is_invalid() {
        let err = Manifest::from_record(
            &record(json!({"name": "pkg", "versionSchema": ["RELEASE"]})),
            &ReleaseConfig::default(),
        )
        .unwrap_err();

        // default change types bump MAJOR/MINOR/PATCH, which the schema lacks
        assert_eq!(err.package(), Some("pkg"));
        assert!(matches!(err, ManifestError::Invalid { .. }));
    }

    #[test]
    fn test_record_unknown_key_is_malformed() {
        let err = Manifest::from_record(
            &record(json!({"name": "pkg", "tag_format": "x"})),
            &ReleaseConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::Malformed { .. }));
    }

    #[test]
    fn test_read_toml_record() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("cadence.toml");
        std::fs::write(&path, "name = \"pkg\"\ndependencies = [\"core\"]\n").unwrap();

        let record = ManifestRecord::read(&path).unwrap();
        assert_eq!(record.content["name"], "pkg");

        let manifest = Manifest::from_record(&record, &ReleaseConfig::default()).unwrap();
        assert_eq!(manifest.dependencies.required, vec!["core"]);
    }

    #[test]
    fn test_read_missing_file() {
        let err = ManifestRecord::read(Path::new("/nonexistent/cadence.json")).unwrap_err();
        assert!(matches!(err, ManifestError::Malformed { .. }));
    }
}
