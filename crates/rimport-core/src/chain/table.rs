//! Per-run resolution table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

use crate::fetch::CachedModule;

/// Specifier -> resolved network module for the current run, plus a reverse
/// index from local path to URL so relative imports inside a fetched module can
/// be resolved in URL space.
#[derive(Debug, Default)]
pub struct ResolutionTable {
    by_specifier: HashMap<String, CachedModule>,
    by_path: HashMap<PathBuf, Url>,
}

impl ResolutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, specifier: &str) -> Option<&CachedModule> {
        self.by_specifier.get(specifier)
    }

    /// URL of the network module materialized at `path`, if any.
    pub fn url_for_path(&self, path: &Path) -> Option<&Url> {
        self.by_path.get(path)
    }

    pub fn insert(&mut self, specifier: impl Into<String>, module: CachedModule) {
        self.by_path
            .entry(module.path.clone())
            .or_insert_with(|| module.url.clone());
        self.by_specifier.insert(specifier.into(), module);
    }

    pub fn len(&self) -> usize {
        self.by_specifier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_specifier.is_empty()
    }
}
