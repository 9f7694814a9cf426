//! Two-generation cache of compiled templates

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cadence_core::error::TemplateError;
use tracing::debug;

use super::compiled::Template;

/// Entries the primary generation holds before it is rotated out
pub const CACHE_CAPACITY: usize = 20;

/// Cache of compiled templates keyed by source.
///
/// Lookups hit the primary generation first; a hit in the secondary
/// generation is promoted. When the primary grows past [`CACHE_CAPACITY`]
/// it becomes the secondary and the old secondary is dropped, so at most
/// about twice the capacity is retained.
///
/// Construct one per process and share it by reference. Two threads
/// compiling the same new source may both compile it; either result is
/// kept.
#[derive(Debug, Default)]
pub struct TemplateCache {
    generations: Mutex<Generations>,
}

#[derive(Debug, Default)]
struct Generations {
    primary: HashMap<String, Arc<Template>>,
    secondary: HashMap<String, Arc<Template>>,
}

impl Generations {
    fn get(&mut self, source: &str) -> Option<Arc<Template>> {
        if let Some(template) = self.primary.get(source) {
            return Some(Arc::clone(template));
        }
        let template = self.secondary.remove(source)?;
        self.insert(source.to_string(), Arc::clone(&template));
        Some(template)
    }

    fn insert(&mut self, source: String, template: Arc<Template>) {
        self.primary.insert(source, template);
        if self.primary.len() > CACHE_CAPACITY {
            debug!(entries = self.primary.len(), "rotating template cache");
            self.secondary = std::mem::take(&mut self.primary);
        }
    }
}

impl TemplateCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the compiled template for `source`, compiling it on a miss
    pub fn get_or_compile(&self, source: &str) -> Result<Arc<Template>, TemplateError> {
        if let Some(template) = self.lock().get(source) {
            return Ok(template);
        }

        let template = Arc::new(Template::compile(source)?);
        self.lock().insert(source.to_string(), Arc::clone(&template));
        Ok(template)
    }

    /// Number of cached templates across both generations
    pub fn len(&self) -> usize {
        let generations = self.lock();
        generations.primary.len() + generations.secondary.len()
    }

    /// Whether the cache holds nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached template
    pub fn clear(&self) {
        let mut generations = self.lock();
        generations.primary.clear();
        generations.secondary.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Generations> {
        self.generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
