//! Fetching remote modules into the cache.
//!
//! The fetcher asks the metadata cache first and only goes to the network on a
//! miss. A fetched body is written atomically under its identity filename and
//! the sidecar record is stored afterwards, so a record never points at a
//! partial artifact.

mod curl_client;
mod parse;
#[cfg(test)]
pub(crate) mod testing;

pub use curl_client::CurlClient;

use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

use crate::error::ModuleError;
use crate::identity::{extension_from_content_type, filename_for, resolve_extension, url_hash};
use crate::metadata::{MetadataCache, MetadataRecord};
use crate::storage;

/// Response of a single GET (after redirects).
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub content_type: Option<String>,
    /// URL of the last hop when redirects were followed.
    pub final_url: Option<Url>,
    pub body: Vec<u8>,
}

/// Blocking HTTP GET. Implemented by [`CurlClient`]; tests inject fakes.
pub trait HttpClient: Send + Sync + 'static {
    fn get(&self, url: &Url) -> anyhow::Result<HttpResponse>;
}

/// A module materialized in the cache root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedModule {
    /// URL relative imports inside the module resolve against (final URL after redirects).
    pub url: Url,
    /// Absolute artifact path.
    pub path: PathBuf,
}

pub struct Fetcher<C> {
    client: Arc<C>,
    cache: MetadataCache,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C, cache: MetadataCache) -> Self {
        Self {
            client: Arc::new(client),
            cache,
        }
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Returns the cached module for `url`, fetching it on a cache miss.
    /// Cache hits are never revalidated against the remote.
    pub async fn load(&self, specifier: &str, url: &Url) -> Result<CachedModule, ModuleError> {
        if let Some(record) = self.cache.lookup(url).await {
            tracing::debug!(url = %url, path = %record.path, "module cache hit");
            let base = record
                .url
                .as_deref()
                .and_then(|u| Url::parse(u).ok())
                .unwrap_or_else(|| url.clone());
            return Ok(CachedModule {
                url: base,
                path: self.cache.artifact_path(&record),
            });
        }
        self.fetch_and_persist(specifier, url).await
    }

    /// GETs `url`, infers its extension, writes the artifact and then its sidecar.
    pub async fn fetch_and_persist(
        &self,
        specifier: &str,
        url: &Url,
    ) -> Result<CachedModule, ModuleError> {
        let client = Arc::clone(&self.client);
        let request_url = url.clone();
        let response = tokio::task::spawn_blocking(move || client.get(&request_url))
            .await
            .map_err(|e| ModuleError::Network {
                specifier: specifier.to_string(),
                reason: e.to_string(),
            })?
            .map_err(|e| ModuleError::Network {
                specifier: specifier.to_string(),
                reason: format!("{:#}", e),
            })?;

        if !(200..300).contains(&response.status) {
            return Err(ModuleError::HttpStatus {
                specifier: specifier.to_string(),
                status: response.status,
            });
        }

        let ext = resolve_extension(url)
            .or_else(|| {
                response
                    .content_type
                    .as_deref()
                    .and_then(extension_from_content_type)
                    .map(str::to_string)
            })
            .ok_or_else(|| ModuleError::UnresolvableExtension {
                specifier: specifier.to_string(),
                content_type: response.content_type.clone(),
            })?;

        let filename = filename_for(url, &ext);
        let dest = self.cache.root().join(&filename);
        storage::write_atomic(&dest, &response.body)
            .await
            .map_err(|e| ModuleError::io(&dest, e))?;

        let final_url = response.final_url.unwrap_or_else(|| url.clone());
        let record = MetadataRecord {
            path: filename,
            hash: url_hash(url),
            url: Some(final_url.to_string()),
            content_type: response.content_type,
        };
        self.cache.store(url, &record).await?;

        tracing::info!(
            url = %url,
            status = response.status,
            bytes = response.body.len(),
            path = %dest.display(),
            "fetched remote module"
        );

        Ok(CachedModule {
            url: final_url,
            path: dest,
        })
    }
}
