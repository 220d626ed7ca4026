//! Vendor manifest: `{ "imports": { specifier: path relative to the vendor root } }`.
//!
//! Keys are the specifiers exactly as written in source. Two spellings of the
//! same URL are two entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::storage;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorManifest {
    #[serde(default)]
    pub imports: BTreeMap<String, String>,
}

impl VendorManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, specifier: &str) -> Option<&str> {
        self.imports.get(specifier).map(String::as_str)
    }

    pub fn contains(&self, specifier: &str) -> bool {
        self.imports.contains_key(specifier)
    }

    /// Adds an entry. An existing entry for the same specifier is kept.
    pub fn insert(&mut self, specifier: impl Into<String>, relative_path: impl Into<String>) -> bool {
        let specifier = specifier.into();
        if self.imports.contains_key(&specifier) {
            return false;
        }
        self.imports.insert(specifier, relative_path.into());
        true
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Pretty-printed JSON with sorted keys and a trailing newline.
    pub fn to_file_text(&self) -> String {
        let mut text = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string());
        text.push('\n');
        text
    }

    /// Writes the manifest, replacing any previous file at `path`.
    pub async fn save(&self, path: &Path) -> io::Result<()> {
        storage::write_atomic(path, self.to_file_text().as_bytes()).await
    }

    /// Reads a manifest. Missing or unparsable files yield None (logged), never an error.
    pub async fn load(path: &Path) -> Option<Self> {
        let bytes = match tokio::fs::read(path).await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("no usable manifest at {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!("ignoring unparsable manifest {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// A manifest loaded for replay together with the vendor root its paths are relative to.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub root: PathBuf,
    pub manifest: VendorManifest,
}

impl LoadedManifest {
    /// Loads `path`; the vendor root is the directory containing it.
    pub async fn load(path: &Path) -> Option<Self> {
        let manifest = VendorManifest::load(path).await?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        tracing::debug!(
            "loaded manifest {} ({} entries)",
            path.display(),
            manifest.len()
        );
        Some(Self { root, manifest })
    }

    /// Vendored file for `specifier`, if the manifest maps it.
    pub fn resolve(&self, specifier: &str) -> Option<PathBuf> {
        self.manifest
            .get(specifier)
            .map(|rel| self.root.join(rel.trim_start_matches("./")))
    }
}
