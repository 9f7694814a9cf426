//! Change set types

use cadence_core::config::{ChangeType, ReleaseConfig};
use serde::{Deserialize, Serialize};

/// Section heading for entries whose type is not configured
pub const OTHER_CHANGES: &str = "Other Changes";

/// One change-log entry plus caller-defined context (e.g. a pull request)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "C: Deserialize<'de> + Default"))]
pub struct ChangeSetEntry<C = ()> {
    /// Change type id (e.g. `feat`)
    #[serde(rename = "type")]
    pub change_type: String,
    /// One-line summary
    pub title: String,
    /// Longer description, may be empty
    #[serde(default)]
    pub body: String,
    /// Caller context carried alongside the entry
    #[serde(default)]
    pub context: C,
}

impl ChangeSetEntry<()> {
    /// Create an entry without context
    pub fn new(change_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self::with_context(change_type, title, ())
    }
}

impl<C> ChangeSetEntry<C> {
    /// Create an entry carrying context
    pub fn with_context(
        change_type: impl Into<String>,
        title: impl Into<String>,
        context: C,
    ) -> Self {
        Self {
            change_type: change_type.into(),
            title: title.into(),
            body: String::new(),
            context,
        }
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Ordered change-log entries for a package's next release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent, bound(deserialize = "C: Deserialize<'de> + Default"))]
pub struct ChangeSet<C = ()> {
    entries: Vec<ChangeSetEntry<C>>,
}

impl<C> Default for ChangeSet<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C> ChangeSet<C> {
    /// Create an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, entry: ChangeSetEntry<C>) {
        self.entries.push(entry);
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[ChangeSetEntry<C>] {
        &self.entries
    }

    /// Iterate over entries
    pub fn iter(&self) -> std::slice::Iter<'_, ChangeSetEntry<C>> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Concatenate another change set after this one
    pub fn merge(mut self, other: ChangeSet<C>) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Concatenate change sets in order
    pub fn merge_all<I>(sets: I) -> Self
    where
        I: IntoIterator<Item = ChangeSet<C>>,
    {
        sets.into_iter().fold(Self::new(), Self::merge)
    }

    /// Split into entries matching `predicate` and the rest, keeping relative order
    pub fn extract<F>(self, mut predicate: F) -> (Self, Self)
    where
        F: FnMut(&ChangeSetEntry<C>) -> bool,
    {
        let (matching, rest): (Vec<_>, Vec<_>) =
            self.entries.into_iter().partition(|e| predicate(e));
        (Self { entries: matching }, Self { entries: rest })
    }

    /// Distinct change type ids in first-seen order
    pub fn change_type_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !ids.contains(&entry.change_type.as_str()) {
                ids.push(&entry.change_type);
            }
        }
        ids
    }

    /// Group entries by configured change type order.
    ///
    /// Empty groups are omitted. Entries with an unconfigured type are
    /// collected in a trailing "Other Changes" group.
    pub fn grouped<'a>(&'a self, config: &'a ReleaseConfig) -> Vec<ChangeGroup<'a, C>> {
        let mut groups: Vec<ChangeGroup<'a, C>> = config
            .change_types
            .iter()
            .map(|change_type| ChangeGroup {
                change_type: Some(change_type),
                entries: self
                    .entries
                    .iter()
                    .filter(|e| e.change_type == change_type.id)
                    .collect(),
            })
            .filter(|g| !g.entries.is_empty())
            .collect();

        let other: Vec<&ChangeSetEntry<C>> = self
            .entries
            .iter()
            .filter(|e| config.change_type(&e.change_type).is_none())
            .collect();
        if !other.is_empty() {
            groups.push(ChangeGroup {
                change_type: None,
                entries: other,
            });
        }

        groups
    }
}

impl<C> FromIterator<ChangeSetEntry<C>> for ChangeSet<C> {
    fn from_iter<I: IntoIterator<Item = ChangeSetEntry<C>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<C> IntoIterator for ChangeSet<C> {
    type Item = ChangeSetEntry<C>;
    type IntoIter = std::vec::IntoIter<ChangeSetEntry<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, C> IntoIterator for &'a ChangeSet<C> {
    type Item = &'a ChangeSetEntry<C>;
    type IntoIter = std::slice::Iter<'a, ChangeSetEntry<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Entries of one change type, for display
#[derive(Debug)]
pub struct ChangeGroup<'a, C> {
    /// Configured type, `None` for unconfigured types
    pub change_type: Option<&'a ChangeType>,
    /// Entries in change-set order
    pub entries: Vec<&'a ChangeSetEntry<C>>,
}

impl<C> ChangeGroup<'_, C> {
    /// Section heading for the group
    pub fn title(&self) -> &str {
        self.change_type
            .map(|t| t.plural.as_str())
            .unwrap_or(OTHER_CHANGES)
    }
}
