//! Module graph walk: loads the entry, asks the host for each module's imports,
//! resolves them through the chain, and descends into local results.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::chain::{Resolution, ResolutionChain, ResolveContext};
use crate::error::ModuleError;
use crate::fetch::HttpClient;
use crate::host::ModuleHost;
use crate::specifier::is_remote;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleNode {
    /// Specifier as written -> where it resolved.
    pub imports: BTreeMap<String, Resolution>,
}

#[derive(Debug, Clone)]
pub struct ModuleGraph {
    pub entry: PathBuf,
    pub modules: BTreeMap<PathBuf, ModuleNode>,
}

impl ModuleGraph {
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Local path of the entry module. Remote entries go through the chain.
async fn resolve_entry<C: HttpClient, H: ModuleHost>(
    chain: &ResolutionChain,
    ctx: &mut ResolveContext<C>,
    host: &H,
    entry: &str,
) -> Result<PathBuf, ModuleError> {
    if is_remote(entry) || ctx.aliases.contains_key(entry) {
        return match chain.resolve(ctx, host, entry, None).await? {
            Resolution::Local(path) => Ok(path),
            Resolution::External => Err(ModuleError::Transform {
                id: entry.to_string(),
                cause: anyhow::anyhow!("entry module did not resolve to a file"),
            }),
        };
    }
    tokio::fs::canonicalize(entry)
        .await
        .map_err(|e| ModuleError::io(entry, e))
}

/// Walks every module reachable from `entry`. Each module is transformed once,
/// cycles terminate on the visited set.
pub async fn walk<C: HttpClient, H: ModuleHost>(
    chain: &ResolutionChain,
    ctx: &mut ResolveContext<C>,
    host: &H,
    entry: &str,
) -> Result<ModuleGraph, ModuleError> {
    let entry = resolve_entry(chain, ctx, host, entry).await?;
    let mut modules = BTreeMap::new();
    let mut visited = HashSet::from([entry.clone()]);
    let mut stack = vec![entry.clone()];

    while let Some(id) = stack.pop() {
        let specifiers = host
            .transform(&id)
            .await
            .map_err(|cause| ModuleError::Transform {
                id: id.display().to_string(),
                cause,
            })?;

        let mut node = ModuleNode::default();
        let mut children = Vec::new();
        for specifier in specifiers {
            if node.imports.contains_key(&specifier) {
                continue;
            }
            let resolution = chain
                .resolve(ctx, host, &specifier, Some(id.as_path()))
                .await?;
            if let Resolution::Local(path) = &resolution {
                if visited.insert(path.clone()) {
                    children.push(path.clone());
                }
            }
            node.imports.insert(specifier, resolution);
        }
        tracing::debug!(module = %id.display(), imports = node.imports.len(), "module loaded");
        modules.insert(id, node);
        stack.extend(children.into_iter().rev());
    }

    Ok(ModuleGraph { entry, modules })
}
