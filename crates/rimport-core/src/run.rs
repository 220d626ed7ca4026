//! Plain and manifest-mode runs.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::chain::{ResolutionChain, ResolveContext};
use crate::error::ModuleError;
use crate::fetch::{Fetcher, HttpClient};
use crate::graph::{walk, ModuleGraph};
use crate::host::ModuleHost;
use crate::manifest::LoadedManifest;
use crate::metadata::MetadataCache;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Entry script path or URL.
    pub entry: String,
    /// Vendor manifest to replay. A missing or unreadable file runs without one.
    pub import_map: Option<PathBuf>,
    pub cache_root: PathBuf,
    pub aliases: BTreeMap<String, String>,
    /// Run the graph after resolving it.
    pub execute: bool,
}

/// Resolves `options.entry` and, unless disabled, executes it.
pub async fn run_script<C: HttpClient, H: ModuleHost>(
    options: &RunOptions,
    client: C,
    host: &H,
) -> Result<ModuleGraph, ModuleError> {
    let manifest = match &options.import_map {
        Some(path) => LoadedManifest::load(path).await,
        None => None,
    };
    if let Some(loaded) = &manifest {
        tracing::debug!(
            root = %loaded.root.display(),
            entries = loaded.manifest.len(),
            "using vendor manifest"
        );
    }

    let fetcher = Fetcher::new(client, MetadataCache::new(&options.cache_root));
    let mut ctx = ResolveContext::new(fetcher)
        .with_aliases(options.aliases.clone())
        .with_manifest(manifest);
    let chain = ResolutionChain::for_context(&ctx);

    let graph = walk(&chain, &mut ctx, host, &options.entry).await?;
    tracing::info!(
        entry = %graph.entry.display(),
        modules = graph.len(),
        fetched = ctx.table.len(),
        "module graph resolved"
    );

    if options.execute {
        host.execute(&graph)
            .await
            .map_err(|e| ModuleError::Execution {
                entry: graph.entry.clone(),
                reason: format!("{e:#}"),
            })?;
    }
    Ok(graph)
}
