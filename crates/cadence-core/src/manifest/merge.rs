//! Merging manifests that describe the same package

use std::collections::HashSet;

use tracing::{debug, info, instrument};

use crate::error::ManifestError;

use super::types::{Dependencies, Manifest};
use super::validation::validate_manifest;

/// Merge two manifests for the same package.
///
/// Customized keys are unioned; a key customized by both sides must hold the
/// same value. Dependency lists are unioned keeping first-seen order, while
/// targets and scripts are concatenated as-is. The result is re-validated.
pub fn merge_pair(first: &Manifest, second: &Manifest) -> Result<Manifest, ManifestError> {
    if first.package_name != second.package_name {
        return Err(ManifestError::Invalid {
            package: first.package_name.clone(),
            reason: format!(
                "cannot merge with a manifest for '{}'",
                second.package_name
            ),
        });
    }

    let mut merged = first.clone();

    for &key in &second.customized {
        if first.is_customized(key) {
            if !first.settings.same_value(&second.settings, key) {
                return Err(ManifestError::Conflict {
                    package: first.package_name.clone(),
                    key: key.to_string(),
                });
            }
        } else {
            merged.settings.take_value(&second.settings, key);
            merged.customized.insert(key);
        }
    }
    merged.settings.align_base_version(&merged.customized);

    merged.dependencies = Dependencies {
        required: union(&first.dependencies.required, &second.dependencies.required),
        optional: union(&first.dependencies.optional, &second.dependencies.optional),
        development: union(
            &first.dependencies.development,
            &second.dependencies.development,
        ),
    };
    merged.targets.extend(second.targets.iter().cloned());
    merged.pre_release.extend(second.pre_release.iter().cloned());
    merged.post_release.extend(second.post_release.iter().cloned());
    merged.sources.extend(second.sources.iter().cloned());

    validate_manifest(&merged)?;
    debug!(
        package = %merged.package_name,
        customized = merged.customized.len(),
        "merged manifests"
    );
    Ok(merged)
}

/// Merge all manifests sharing a package name.
///
/// Packages keep the order in which they were first seen. Fails on the first
/// conflicting or invalid package.
#[instrument(skip(manifests), fields(count = manifests.len()))]
pub fn merge_manifests(manifests: Vec<Manifest>) -> Result<Vec<Manifest>, ManifestError> {
    let mut merged: Vec<Manifest> = Vec::new();

    for manifest in manifests {
        match merged
            .iter_mut()
            .find(|m| m.package_name == manifest.package_name)
        {
            Some(existing) => *existing = merge_pair(existing, &manifest)?,
            None => merged.push(manifest),
        }
    }

    info!(packages = merged.len(), "manifests merged");
    Ok(merged)
}

fn union(first: &[String], second: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    first
        .iter()
        .chain(second)
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChangeType, ReleaseConfig, VersionSchema};
    use crate::manifest::{SettingKey, TargetConfig};

    fn manifest(name: &str) -> Manifest {
        Manifest::new(name, &ReleaseConfig::default())
    }

    #[test]
    fn test_conflicting_tag_format() {
        let a = manifest("pkg").with_tag_format("v{{MAJOR}}");
        let b = manifest("pkg").with_tag_format("release-{{MAJOR}}");

        let err = merge_pair(&a, &b).unwrap_err();
        assert_eq!(
            err,
            ManifestError::Conflict {
                package: "pkg".to_string(),
                key: "tagFormat".to_string()
            }
        );
        let reason = err.reason();
        assert!(reason.contains("pkg"));
        assert!(reason.contains("tagFormat"));
    }

    #[test]
    fn test_one_sided_customization_wins() {
        let a = manifest("pkg");
        let b = manifest("pkg").with_tag_format("v{{MAJOR}}.{{MINOR}}.{{PATCH}}");

        let merged = merge_pair(&a, &b).unwrap();
        assert_eq!(merged.tag_format(), Some("v{{MAJOR}}.{{MINOR}}.{{PATCH}}"));
        assert!(merged.is_customized(SettingKey::TagFormat));

        let merged = merge_pair(&b, &a).unwrap();
        assert_eq!(merged.tag_format(), Some("v{{MAJOR}}.{{MINOR}}.{{PATCH}}"));
    }

    #[test]
    fn test_equal_customizations_merge() {
        let a = manifest("pkg").with_tag_format("v{{MAJOR}}");
        let b = manifest("pkg").with_tag_format("v{{MAJOR}}");
        assert!(merge_pair(&a, &b).is_ok());
    }

    #[test]
    fn test_dependency_union_preserves_first_seen_order() {
        let mut a = manifest("pkg");
        a.dependencies.required = vec!["b".into(), "a".into()];
        let mut b = manifest("pkg");
        b.dependencies.required = vec!["c".into(), "b".into(), "d".into()];

        let merged = merge_pair(&a, &b).unwrap();
        assert_eq!(merged.dependencies.required, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_targets_and_scripts_concatenate() {
        let mut a = manifest("pkg");
        a.targets.push(TargetConfig::new("npm"));
        a.pre_release.push("make".into());
        let mut b = manifest("pkg");
        b.targets.push(TargetConfig::new("npm"));
        b.pre_release.push("make".into());

        let merged = merge_pair(&a, &b).unwrap();
        assert_eq!(merged.targets.len(), 2);
        assert_eq!(merged.pre_release, vec!["make", "make"]);
    }

    #[test]
    fn test_schema_from_second_realigns_base_version() {
        let a = manifest("pkg");
        let mut b = manifest("pkg");
        b.settings.version_schema = VersionSchema::new(["MAJOR", "MINOR"]);
        b.settings.change_types = vec![ChangeType::new("feat", "Features", "MINOR")];
        b.customized.insert(SettingKey::VersionSchema);
        b.customized.insert(SettingKey::ChangeTypes);

        let merged = merge_pair(&a, &b).unwrap();
        assert_eq!(merged.settings.base_version.parts(), &[1, 0]);
    }

    #[test]
    fn test_merged_result_is_revalidated() {
        let mut a = manifest("pkg");
        a.settings.version_schema = VersionSchema::new(["MAJOR", "MINOR"]);
        a.customized.insert(SettingKey::VersionSchema);
        a.settings.change_types = vec![];
        a.customized.insert(SettingKey::ChangeTypes);
        a.settings.base_version = crate::config::BaseVersion::new(vec![1, 0]);
        let mut b = manifest("pkg");
        b.customized.insert(SettingKey::BaseVersion);

        // b insists on a three-part base version, a on a two-part schema
        let err = merge_pair(&a, &b).unwrap_err();
        assert!(matches!(err, ManifestError::Invalid { .. }));
    }

    #[test]
    fn test_merge_manifests_groups_by_name() {
        let mut core_a = manifest("core");
        core_a.dependencies.development = vec!["fixtures".into()];
        let app = manifest("app");
        let core_b = manifest("core").with_tag_format("core-v{{MAJOR}}");

        let merged = merge_manifests(vec![core_a, app, core_b]).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].package_name, "core");
        assert_eq!(merged[0].tag_format(), Some("core-v{{MAJOR}}"));
        assert_eq!(merged[0].dependencies.development, vec!["fixtures"]);
        assert_eq!(merged[1].package_name, "app");
    }

    #[test]
    fn test_merge_manifests_reports_conflict() {
        let result = merge_manifests(vec![
            manifest("pkg").with_tag_format("a-{{MAJOR}}"),
            manifest("pkg").with_tag_format("b-{{MAJOR}}"),
        ]);
        assert!(matches!(result, Err(ManifestError::Conflict { .. })));
    }

    #[test]
    fn test_different_packages_rejected() {
        assert!(merge_pair(&manifest("a"), &manifest("b")).is_err());
    }
}
