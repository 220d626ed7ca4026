//! Metadata cache: one JSON sidecar per module identity under the cache root.
//!
//! Layout: `<root>/<hash>.<ext>` is the artifact, `<root>/<hash>.metadata.json`
//! the sidecar. A sidecar is written once, after its artifact is in place, and
//! never rewritten. Anything unreadable is treated as a miss so a damaged cache
//! heals by re-fetching.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use url::Url;

use crate::error::ModuleError;
use crate::identity::url_hash;
use crate::storage;

const SIDECAR_SUFFIX: &str = "metadata.json";

/// Sidecar record for one cached module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Artifact filename relative to the cache root.
    pub path: String,
    /// Identity hash of the URL the record belongs to.
    pub hash: String,
    /// Final URL after redirects; relative imports inside the module resolve against it.
    #[serde(default)]
    pub url: Option<String>,
    /// Content-Type of the response the artifact came from.
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MetadataCache {
    root: PathBuf,
}

impl MetadataCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sidecar location for `url`. Independent of the extension so it can be found before fetching.
    pub fn sidecar_path(&self, url: &Url) -> PathBuf {
        self.root.join(format!("{}.{}", url_hash(url), SIDECAR_SUFFIX))
    }

    /// Absolute artifact path for a record.
    pub fn artifact_path(&self, record: &MetadataRecord) -> PathBuf {
        self.root.join(&record.path)
    }

    /// Reads the record for `url`. Missing, unparsable, foreign or dangling records are a miss.
    pub async fn lookup(&self, url: &Url) -> Option<MetadataRecord> {
        let sidecar = self.sidecar_path(url);
        let bytes = match tokio::fs::read(&sidecar).await {
            Ok(b) => b,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("unreadable metadata {}: {}", sidecar.display(), e);
                }
                return None;
            }
        };
        let record: MetadataRecord = match serde_json::from_slice(&bytes) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("ignoring corrupt metadata {}: {}", sidecar.display(), e);
                return None;
            }
        };
        if record.hash != url_hash(url) || !is_plain_filename(&record.path) {
            tracing::warn!("ignoring mismatched metadata {}", sidecar.display());
            return None;
        }
        match tokio::fs::metadata(self.artifact_path(&record)).await {
            Ok(m) if m.is_file() => Some(record),
            _ => {
                tracing::debug!("metadata for {} points at a missing artifact", url);
                None
            }
        }
    }

    /// Persists the record for `url`. Call only after the artifact is fully written.
    pub async fn store(&self, url: &Url, record: &MetadataRecord) -> Result<(), ModuleError> {
        let sidecar = self.sidecar_path(url);
        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| ModuleError::io(&sidecar, std::io::Error::other(e)))?;
        storage::write_atomic(&sidecar, &json)
            .await
            .map_err(|e| ModuleError::io(&sidecar, e))
    }
}

/// Records only ever name a file directly under the root.
fn is_plain_filename(path: &str) -> bool {
    let mut components = Path::new(path).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
