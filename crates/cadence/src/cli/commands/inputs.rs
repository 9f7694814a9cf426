//! Reading already-fetched inputs: change sets, known tags and manifests

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use tracing::debug;

use cadence_changelog::ChangeSet;
use cadence_core::config::{load_config_or_default, ReleaseConfig};
use cadence_core::manifest::{merge_manifests, Manifest, ManifestRecord};
use cadence_tags::TagInfo;

/// Load the repository configuration, using defaults when there is none
pub fn release_config(dir: &Path) -> anyhow::Result<ReleaseConfig> {
    let (config, path) = load_config_or_default(dir)?;
    debug!(path = ?path, "using release configuration");
    Ok(config)
}

/// Read a JSON or YAML document, chosen by extension
fn read_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let value = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?,
        _ => serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?,
    };
    Ok(value)
}

/// Read change set files and concatenate them in order
pub fn change_sets(paths: &[PathBuf]) -> anyhow::Result<ChangeSet> {
    let sets = paths
        .iter()
        .map(|path| read_document::<ChangeSet>(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let changes = ChangeSet::merge_all(sets);
    debug!(files = paths.len(), entries = changes.len(), "loaded change sets");
    Ok(changes)
}

/// Known tags from `--tag` names and an optional tags file
pub fn known_tags(names: &[String], file: Option<&Path>) -> anyhow::Result<Vec<TagInfo>> {
    let mut tags: Vec<TagInfo> = match file {
        Some(path) => read_document(path)?,
        None => Vec::new(),
    };
    tags.extend(names.iter().map(|name| TagInfo::new(name.as_str(), "")));
    Ok(tags)
}

/// Expand glob patterns into distinct paths, in pattern order
pub fn expand_patterns(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let mut matched = false;
        for entry in glob::glob(pattern).with_context(|| format!("Invalid pattern '{}'", pattern))? {
            let path = entry?;
            matched = true;
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        if !matched {
            anyhow::bail!("No manifest matches '{}'", pattern);
        }
    }

    Ok(paths)
}

/// Read every manifest matching the patterns and merge them by package
pub fn manifests(patterns: &[String], defaults: &ReleaseConfig) -> anyhow::Result<Vec<Manifest>> {
    let mut manifests = Vec::new();
    for path in expand_patterns(patterns)? {
        let record = ManifestRecord::read(&path)?;
        manifests.push(Manifest::from_record(&record, defaults)?);
    }
    Ok(merge_manifests(manifests)?)
}
