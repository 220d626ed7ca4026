//! Links a resolved graph into a scratch directory the runtime can load as-is.
//!
//! Each module is copied under a name derived from its source path, and every
//! specifier that resolved to a local module is replaced by the `file://` URL of
//! that module's linked copy. External specifiers are left untouched.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use url::Url;

use super::scan::rewrite_imports;
use crate::chain::Resolution;
use crate::checksum::sha256_hex;
use crate::graph::ModuleGraph;

/// Marks linked `.js` files as ES modules for runtimes that look for it.
const PACKAGE_JSON: &str = "{\"type\":\"module\"}\n";

fn linked_name(original: &Path) -> String {
    let hash = sha256_hex(original.to_string_lossy().as_bytes());
    let ext = original
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("js");
    format!("{}.{}", &hash[..16], ext)
}

/// Writes the linked graph into `dir` and returns the linked entry path.
pub(crate) async fn link_graph(graph: &ModuleGraph, dir: &Path) -> Result<PathBuf> {
    let mut urls: HashMap<&Path, String> = HashMap::new();
    for path in graph.modules.keys() {
        let linked = dir.join(linked_name(path));
        let url = Url::from_file_path(&linked)
            .map_err(|_| anyhow!("cannot form file URL for {}", linked.display()))?;
        urls.insert(path.as_path(), url.to_string());
    }

    for (path, node) in &graph.modules {
        let source = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read module {}", path.display()))?;
        let linked_source = rewrite_imports(&source, |specifier| match node.imports.get(specifier) {
            Some(Resolution::Local(target)) => urls.get(target.as_path()).cloned(),
            _ => None,
        });
        let target = dir.join(linked_name(path));
        tokio::fs::write(&target, linked_source)
            .await
            .with_context(|| format!("write linked module {}", target.display()))?;
    }

    tokio::fs::write(dir.join("package.json"), PACKAGE_JSON)
        .await
        .context("write package.json")?;
    Ok(dir.join(linked_name(&graph.entry)))
}
