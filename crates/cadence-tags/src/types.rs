//! Known tags and latest-version lookup

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use cadence_core::error::ConfigError;
use cadence_strategies::VersionNumber;

use crate::resolver::{parse_tag, TagContext};
use crate::template::TemplateCache;

/// An existing tag, as fetched from the repository host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// Commit hash the tag points to
    pub commit_hash: String,
    /// Tag message (for annotated tags)
    #[serde(default)]
    pub message: Option<String>,
    /// Tagger name (for annotated tags)
    #[serde(default)]
    pub tagger: Option<String>,
    /// Tag timestamp
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TagInfo {
    /// Create a new TagInfo
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_hash: commit_hash.into(),
            message: None,
            tagger: None,
            timestamp: None,
        }
    }

    /// Set the tag message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the tagger
    pub fn with_tagger(mut self, tagger: impl Into<String>) -> Self {
        self.tagger = Some(tagger.into());
        self
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Highest version among the tags that belong to the package.
///
/// Tags that do not parse under the context are skipped. Among tags with
/// equal versions the first one wins.
#[instrument(skip(tags, cache), fields(package = ctx.package_name, tags = tags.len()))]
pub fn latest_version<'t>(
    tags: &'t [TagInfo],
    ctx: &TagContext<'_>,
    allow_bare: bool,
    cache: &TemplateCache,
) -> Result<Option<(VersionNumber, &'t TagInfo)>, ConfigError> {
    let mut latest: Option<(VersionNumber, &'t TagInfo)> = None;

    for tag in tags {
        let Some(version) = parse_tag(&tag.name, ctx, allow_bare, cache)? else {
            continue;
        };
        let is_newer = latest
            .as_ref()
            .map_or(true, |(best, _)| version.gt(best));
        if is_newer {
            latest = Some((version, tag));
        }
    }

    if let Some((version, tag)) = &latest {
        debug!(version = %version, tag = %tag.name, "found latest tag");
    }
    Ok(latest)
}
