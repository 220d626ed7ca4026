//! Module host: the runtime side of resolution.
//!
//! The host reports the import specifiers of a loaded module, resolves whatever
//! the chain defers on, and runs a fully resolved graph.

mod link;
mod scan;

pub use scan::{rewrite_imports, scan_imports, ImportSite};

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::chain::Resolution;
use crate::graph::ModuleGraph;
use crate::specifier::{is_relative, is_remote};

#[allow(async_fn_in_trait)]
pub trait ModuleHost {
    /// Import specifiers of module `id`, in source order.
    async fn transform(&self, id: &Path) -> Result<Vec<String>>;

    /// Fallback resolution once every chain stage deferred.
    fn resolve_default(&self, specifier: &str, importer: Option<&Path>) -> Result<Resolution>;

    /// Runs the graph from its entry module.
    async fn execute(&self, graph: &ModuleGraph) -> Result<()>;
}

/// Built-in host: regex-based import scanning, filesystem resolution, and
/// execution of a linked copy of the graph by an external runtime command.
#[derive(Debug, Clone)]
pub struct ScanHost {
    runtime: Vec<String>,
}

impl ScanHost {
    pub fn new(runtime: Vec<String>) -> Self {
        Self { runtime }
    }
}

/// Modules with no import syntax of their own.
fn is_leaf_module(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("css")
    )
}

impl ModuleHost for ScanHost {
    async fn transform(&self, id: &Path) -> Result<Vec<String>> {
        if is_leaf_module(id) {
            return Ok(Vec::new());
        }
        let source = tokio::fs::read_to_string(id)
            .await
            .with_context(|| format!("read module {}", id.display()))?;
        let mut specifiers: Vec<String> = Vec::new();
        for site in scan_imports(&source) {
            if !specifiers.contains(&site.specifier) {
                specifiers.push(site.specifier);
            }
        }
        Ok(specifiers)
    }

    fn resolve_default(&self, specifier: &str, importer: Option<&Path>) -> Result<Resolution> {
        let path: PathBuf = if specifier.starts_with("file:") {
            url::Url::parse(specifier)
                .ok()
                .and_then(|u| u.to_file_path().ok())
                .with_context(|| format!("invalid file URL {specifier}"))?
        } else if is_relative(specifier) || Path::new(specifier).is_absolute() {
            let base = match importer.and_then(Path::parent) {
                Some(dir) => dir.to_path_buf(),
                None => std::env::current_dir().context("current directory")?,
            };
            base.join(specifier)
        } else if is_remote(specifier) {
            bail!("remote module {specifier} was not resolved");
        } else {
            return Ok(Resolution::External);
        };
        if !path.is_file() {
            match importer {
                Some(from) => bail!(
                    "cannot resolve {specifier} from {}: {} does not exist",
                    from.display(),
                    path.display()
                ),
                None => bail!("cannot resolve {specifier}: {} does not exist", path.display()),
            }
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()))?;
        Ok(Resolution::Local(path))
    }

    async fn execute(&self, graph: &ModuleGraph) -> Result<()> {
        let (program, args) = self
            .runtime
            .split_first()
            .context("runtime command is empty")?;
        let link_dir = tempfile::Builder::new()
            .prefix("rimport-link-")
            .tempdir()
            .context("create link directory")?;
        let entry = link::link_graph(graph, link_dir.path()).await?;
        tracing::debug!(runtime = %program, entry = %entry.display(), "executing linked graph");

        let status = tokio::process::Command::new(program)
            .args(args)
            .arg(&entry)
            .status()
            .await
            .with_context(|| format!("spawn {program}"))?;
        if !status.success() {
            bail!("{program} exited with {status}");
        }
        Ok(())
    }
}
