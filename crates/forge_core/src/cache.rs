//! Prompt-keyed cache of completed generations.

use std::collections::HashMap;

use forge_workspace::GenerationId;
use tracing::debug;

/// A finished generation: the preview URL it produced and the workspace
/// generation it belongs to.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub preview_url: String,
    pub generation: GenerationId,
}

/// Unbounded process-lifetime cache keyed by exact prompt text.
///
/// Because the workspace holds only one generation, an entry is valid only
/// while its generation is still the one on disk. Lookups evict entries
/// whose generation has been replaced.
#[derive(Debug, Default)]
pub struct GenerationCache {
    entries: HashMap<String, CacheEntry>,
}

impl GenerationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the entry for `prompt` if its workspace generation is still
    /// current. Stale entries are evicted and reported as a miss.
    pub fn get_valid(&mut self, prompt: &str, current: Option<GenerationId>) -> Option<CacheEntry> {
        match self.entries.get(prompt) {
            Some(entry) if Some(entry.generation) == current => Some(entry.clone()),
            Some(entry) => {
                debug!(
                    stale = %entry.generation,
                    "evicting cache entry for replaced workspace generation"
                );
                self.entries.remove(prompt);
                None
            }
            None => None,
        }
    }

    pub fn insert(&mut self, prompt: impl Into<String>, entry: CacheEntry) {
        self.entries.insert(prompt.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
