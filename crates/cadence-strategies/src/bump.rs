//! Change-set driven version bumps

use cadence_changelog::ChangeSet;
use cadence_core::config::ReleaseConfig;
use cadence_core::error::VersionError;
use tracing::{debug, instrument};

use crate::version::VersionNumber;

/// Most significant schema index bumped by any entry in the change set.
///
/// Index 0 is the most significant part. Returns `None` when no entry has
/// a change type that bumps anything.
pub fn bump_index<C>(changes: &ChangeSet<C>, config: &ReleaseConfig) -> Option<usize> {
    changes
        .iter()
        .filter_map(|entry| config.bump_index(&entry.change_type))
        .min()
}

/// Compute the next version for a package.
///
/// Returns `Ok(None)` when no release is due. A package without a current
/// version, or one below the base version, is released at the base version
/// exactly.
#[instrument(skip_all, fields(current = ?current, entries = changes.len()))]
pub fn get_next_version<C>(
    current: Option<&VersionNumber>,
    changes: &ChangeSet<C>,
    config: &ReleaseConfig,
) -> Result<Option<VersionNumber>, VersionError> {
    let Some(index) = bump_index(changes, config) else {
        debug!("no change bumps the version");
        return Ok(None);
    };

    let base = VersionNumber::new(config.base_version.parts().to_vec());
    let next = match current {
        Some(current) if current.gte(&base) => current
            .normalize(config.version_schema.len())
            .increment(index)?,
        _ => base,
    };

    debug!(next = %next, index, "computed next version");
    Ok(Some(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_changelog::ChangeSetEntry;
    use cadence_core::config::{BaseVersion, ChangeType, VersionSchema};

    fn changes(types: &[&str]) -> ChangeSet {
        types
            .iter()
            .map(|t| ChangeSetEntry::new(*t, format!("{} change", t)))
            .collect()
    }

    fn v(s: &str) -> VersionNumber {
        VersionNumber::parse(s).unwrap()
    }

    #[test]
    fn test_bump_index_takes_most_significant() {
        let config = ReleaseConfig::default();
        assert_eq!(bump_index(&changes(&["fix", "feat", "docs"]), &config), Some(1));
        assert_eq!(bump_index(&changes(&["breaking", "fix"]), &config), Some(0));
        assert_eq!(bump_index(&changes(&["docs", "chore"]), &config), None);
        assert_eq!(bump_index(&changes(&["unknown"]), &config), None);
    }

    #[test]
    fn test_empty_change_set_never_releases() {
        let config = ReleaseConfig::default();
        assert_eq!(get_next_version(Some(&v("1.2.3")), &changes(&[]), &config), Ok(None));
        assert_eq!(get_next_version(None, &changes(&[]), &config), Ok(None));
    }

    #[test]
    fn test_silent_changes_never_release() {
        let config = ReleaseConfig::default();
        let next = get_next_version(Some(&v("1.2.3")), &changes(&["docs"]), &config);
        assert_eq!(next, Ok(None));
    }

    #[test]
    fn test_first_release_is_base_version() {
        let config = ReleaseConfig::default();
        let next = get_next_version(None, &changes(&["feat"]), &config)
            .unwrap()
            .unwrap();
        assert_eq!(next.to_string(), "1.0.0");
    }

    #[test]
    fn test_below_base_jumps_to_base() {
        let config = ReleaseConfig::default();
        let next = get_next_version(Some(&v("0.9.4")), &changes(&["fix"]), &config)
            .unwrap()
            .unwrap();
        assert_eq!(next.to_string(), "1.0.0");
    }

    #[test]
    fn test_increments_most_significant_part() {
        let config = ReleaseConfig::default();
        let current = v("1.2.3");

        let next = get_next_version(Some(&current), &changes(&["fix"]), &config).unwrap();
        assert_eq!(next.unwrap().to_string(), "1.2.4");

        let next = get_next_version(Some(&current), &changes(&["fix", "feat"]), &config).unwrap();
        assert_eq!(next.unwrap().to_string(), "1.3.0");

        let next = get_next_version(Some(&current), &changes(&["breaking"]), &config).unwrap();
        assert_eq!(next.unwrap().to_string(), "2.0.0");
    }

    #[test]
    fn test_normalizes_to_schema_length() {
        let config = ReleaseConfig::default();

        let next = get_next_version(Some(&v("1.2")), &changes(&["fix"]), &config).unwrap();
        assert_eq!(next.unwrap().to_string(), "1.2.1");

        let next = get_next_version(Some(&v("1.2.3.4")), &changes(&["feat"]), &config).unwrap();
        assert_eq!(next.unwrap().to_string(), "1.3.0");
    }

    #[test]
    fn test_prerelease_current_is_dropped() {
        let config = ReleaseConfig::default();
        let current = v("2.0.0-beta.1+build.5");
        let next = get_next_version(Some(&current), &changes(&["fix"]), &config)
            .unwrap()
            .unwrap();
        assert_eq!(next.to_string(), "2.0.1");
    }

    #[test]
    fn test_custom_schema() {
        let config = ReleaseConfig::new(
            VersionSchema::new(["GENERATION", "RELEASE"]),
            vec![
                ChangeType::new("epoch", "New Generation", "GENERATION"),
                ChangeType::new("change", "Changes", "RELEASE"),
            ],
        )
        .with_base_version(BaseVersion::new(vec![3, 0]));

        let first = get_next_version(None, &changes(&["change"]), &config).unwrap();
        assert_eq!(first.unwrap().to_string(), "3.0");

        let next = get_next_version(Some(&v("3.4")), &changes(&["change"]), &config).unwrap();
        assert_eq!(next.unwrap().to_string(), "3.5");

        let next = get_next_version(Some(&v("3.4")), &changes(&["change", "epoch"]), &config)
            .unwrap();
        assert_eq!(next.unwrap().to_string(), "4.0");
    }

    #[test]
    fn test_overflow_is_reported() {
        let config = ReleaseConfig::default();
        let current = VersionNumber::new(vec![1, 2, u64::MAX]);
        let next = get_next_version(Some(&current), &changes(&["fix"]), &config);
        assert_eq!(next, Err(VersionError::Overflow(2)));
    }
}
