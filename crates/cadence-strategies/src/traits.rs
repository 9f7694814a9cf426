//! Version strategy traits

use std::cmp::Ordering;

use cadence_core::error::Result;

use crate::version::VersionNumber;

/// Trait for version strategies
pub trait VersionStrategy: Send + Sync {
    /// Get the name of this strategy
    fn name(&self) -> &'static str;

    /// Parse a version string
    fn parse(&self, version: &str) -> Result<VersionNumber>;

    /// Format a version into a string
    fn format(&self, version: &VersionNumber) -> String {
        version.to_string()
    }

    /// Bump the schema part at `index`
    fn bump(&self, current: &VersionNumber, index: usize) -> Result<VersionNumber>;

    /// Check if a version string is valid for this strategy
    fn is_valid(&self, version: &str) -> bool {
        self.parse(version).is_ok()
    }

    /// Compare two version strings
    fn compare(&self, a: &str, b: &str) -> Result<Ordering> {
        Ok(self.parse(a)?.compare(&self.parse(b)?))
    }
}
