//! Resolution chain: fixed-priority stages consulted for every import specifier.
//!
//! Order of precedence, most explicit first:
//! 1. manifest override (replay of a vendored run),
//! 2. vendor capture (observe-only, copies the final target into the vendor root),
//! 3. relative rewrite (relative, root-relative and protocol-relative imports
//!    inside fetched modules resolve in URL space),
//! 4. network fetch (cache lookup, fetch on miss, at most once per run).
//!
//! When every stage defers, the module host's default resolution decides.

mod table;

pub use table::ResolutionTable;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ModuleError;
use crate::fetch::{CachedModule, Fetcher, HttpClient};
use crate::host::ModuleHost;
use crate::identity::normalize;
use crate::manifest::LoadedManifest;
use crate::specifier::{is_bare, is_relative, is_remote, is_root_relative};
use crate::vendor::VendorCapture;

/// Final answer for one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A file on disk the host should load.
    Local(PathBuf),
    /// Left to the runtime as written (builtins, unresolved bare names).
    External,
}

/// What a single stage decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Resolved(PathBuf),
    /// Restart the chain with this specifier.
    Rewrite(String),
    /// Defer, but copy whatever the rest of the chain resolves to into the vendor root.
    Capture,
    Defer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ManifestOverride,
    VendorCapture,
    RelativeRewrite,
    NetworkFetch,
}

/// Everything one run's resolutions share: fetcher (and its metadata cache),
/// the in-run table, and the mode-specific manifest or vendor accumulator.
pub struct ResolveContext<C> {
    pub fetcher: Fetcher<C>,
    pub table: ResolutionTable,
    pub manifest: Option<LoadedManifest>,
    pub vendor: Option<VendorCapture>,
    pub aliases: BTreeMap<String, String>,
}

impl<C: HttpClient> ResolveContext<C> {
    pub fn new(fetcher: Fetcher<C>) -> Self {
        Self {
            fetcher,
            table: ResolutionTable::new(),
            manifest: None,
            vendor: None,
            aliases: BTreeMap::new(),
        }
    }

    pub fn with_manifest(mut self, manifest: Option<LoadedManifest>) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn with_vendor(mut self, vendor: VendorCapture) -> Self {
        self.vendor = Some(vendor);
        self
    }

    pub fn with_aliases(mut self, aliases: BTreeMap<String, String>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Alias target for `specifier`, or the specifier itself.
    fn expand_alias<'a>(&'a self, specifier: &'a str) -> &'a str {
        self.aliases
            .get(specifier)
            .map(String::as_str)
            .unwrap_or(specifier)
    }
}

impl Stage {
    pub async fn try_resolve<C: HttpClient>(
        self,
        ctx: &mut ResolveContext<C>,
        specifier: &str,
        importer: Option<&Path>,
    ) -> Result<StageOutcome, ModuleError> {
        match self {
            Stage::ManifestOverride => Ok(manifest_override(ctx, specifier)),
            Stage::VendorCapture => {
                let active = ctx.vendor.is_some() && ctx.manifest.is_none();
                if active && is_bare(specifier) {
                    Ok(StageOutcome::Capture)
                } else {
                    Ok(StageOutcome::Defer)
                }
            }
            Stage::RelativeRewrite => relative_rewrite(ctx, specifier, importer),
            Stage::NetworkFetch => network_fetch(ctx, specifier).await,
        }
    }
}

fn manifest_override<C: HttpClient>(
    ctx: &mut ResolveContext<C>,
    specifier: &str,
) -> StageOutcome {
    let Some(path) = ctx.manifest.as_ref().and_then(|m| m.resolve(specifier)) else {
        return StageOutcome::Defer;
    };
    // Track vendored network modules so their relative imports can be rewritten too.
    let target = ctx.expand_alias(specifier).to_string();
    if is_remote(&target) {
        if let Ok(url) = normalize(&target) {
            ctx.table.insert(
                specifier,
                CachedModule {
                    url,
                    path: path.clone(),
                },
            );
        }
    }
    tracing::debug!(specifier, path = %path.display(), "resolved from manifest");
    StageOutcome::Resolved(path)
}

fn relative_rewrite<C: HttpClient>(
    ctx: &ResolveContext<C>,
    specifier: &str,
    importer: Option<&Path>,
) -> Result<StageOutcome, ModuleError> {
    if !is_relative(specifier) && !is_root_relative(specifier) {
        return Ok(StageOutcome::Defer);
    }
    let Some(base) = importer.and_then(|p| ctx.table.url_for_path(p)) else {
        return Ok(StageOutcome::Defer);
    };
    let joined = base.join(specifier).map_err(|_| ModuleError::InvalidUrl {
        specifier: specifier.to_string(),
    })?;
    tracing::debug!(specifier, base = %base, rewritten = %joined, "relative import in remote module");
    Ok(StageOutcome::Rewrite(joined.to_string()))
}

async fn network_fetch<C: HttpClient>(
    ctx: &mut ResolveContext<C>,
    specifier: &str,
) -> Result<StageOutcome, ModuleError> {
    let target = ctx.expand_alias(specifier).to_string();
    if !is_remote(&target) {
        return Ok(StageOutcome::Defer);
    }
    if let Some(module) = ctx.table.get(specifier) {
        return Ok(StageOutcome::Resolved(module.path.clone()));
    }
    let url = normalize(&target)?;
    let module = ctx.fetcher.load(specifier, &url).await?;
    let path = module.path.clone();
    ctx.table.insert(specifier, module);
    Ok(StageOutcome::Resolved(path))
}

/// Ordered list of stages for one run.
#[derive(Debug, Clone)]
pub struct ResolutionChain {
    stages: Vec<Stage>,
}

impl ResolutionChain {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Normal run without a manifest.
    pub fn plain() -> Self {
        Self::new(vec![Stage::RelativeRewrite, Stage::NetworkFetch])
    }

    /// Replay of a vendored run: the manifest wins over everything.
    pub fn manifest() -> Self {
        Self::new(vec![
            Stage::ManifestOverride,
            Stage::RelativeRewrite,
            Stage::NetworkFetch,
        ])
    }

    /// Vendoring run: resolution proceeds normally while targets are captured.
    pub fn vendoring() -> Self {
        Self::new(vec![
            Stage::VendorCapture,
            Stage::RelativeRewrite,
            Stage::NetworkFetch,
        ])
    }

    /// Chain matching the mode `ctx` was set up for.
    pub fn for_context<C>(ctx: &ResolveContext<C>) -> Self {
        if ctx.manifest.is_some() {
            Self::manifest()
        } else if ctx.vendor.is_some() {
            Self::vendoring()
        } else {
            Self::plain()
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Resolves `specifier` imported from `importer` (None for an entry point).
    pub async fn resolve<C: HttpClient, H: ModuleHost>(
        &self,
        ctx: &mut ResolveContext<C>,
        host: &H,
        specifier: &str,
        importer: Option<&Path>,
    ) -> Result<Resolution, ModuleError> {
        let mut current = specifier.to_string();
        let mut capture: Option<String> = None;

        // Rewrites always yield absolute URLs, which no stage rewrites again.
        let resolution = 'chain: loop {
            for stage in &self.stages {
                match stage.try_resolve(ctx, &current, importer).await? {
                    StageOutcome::Resolved(path) => break 'chain Resolution::Local(path),
                    StageOutcome::Rewrite(next) => {
                        current = next;
                        continue 'chain;
                    }
                    StageOutcome::Capture => capture = Some(current.clone()),
                    StageOutcome::Defer => {}
                }
            }
            break host
                .resolve_default(&current, importer)
                .map_err(|cause| ModuleError::Transform {
                    id: current.clone(),
                    cause,
                })?;
        };

        if let (Some(captured), Resolution::Local(path)) = (capture, &resolution) {
            if let Some(vendor) = ctx.vendor.as_mut() {
                vendor.capture(&captured, path, &ctx.table).await?;
            }
        }

        Ok(resolution)
    }
}
