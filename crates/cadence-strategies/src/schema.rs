//! Schema-driven version strategy

use cadence_changelog::ChangeSet;
use cadence_core::config::ReleaseConfig;
use cadence_core::error::{Result, VersionError};

use crate::bump::{bump_index, get_next_version};
use crate::traits::VersionStrategy;
use crate::version::VersionNumber;

/// Version strategy over a configured version schema
#[derive(Debug, Clone, Default)]
pub struct SchemaStrategy {
    config: ReleaseConfig,
}

impl SchemaStrategy {
    /// Create a strategy for a release configuration
    pub fn new(config: ReleaseConfig) -> Self {
        Self { config }
    }

    /// The release configuration
    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// Schema index the change set bumps, if any
    pub fn bump_index<C>(&self, changes: &ChangeSet<C>) -> Option<usize> {
        bump_index(changes, &self.config)
    }

    /// Next version for the change set, `None` when no release is due
    pub fn next_version<C>(
        &self,
        current: Option<&VersionNumber>,
        changes: &ChangeSet<C>,
    ) -> Result<Option<VersionNumber>> {
        Ok(get_next_version(current, changes, &self.config)?)
    }
}

impl VersionStrategy for SchemaStrategy {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn parse(&self, version: &str) -> Result<VersionNumber> {
        Ok(VersionNumber::parse(version)
            .ok_or_else(|| VersionError::InvalidFormat(version.to_string()))?)
    }

    fn format(&self, version: &VersionNumber) -> String {
        version.normalize(self.config.version_schema.len()).to_string()
    }

    fn bump(&self, current: &VersionNumber, index: usize) -> Result<VersionNumber> {
        Ok(current
            .normalize(self.config.version_schema.len())
            .increment(index)?)
    }
}
