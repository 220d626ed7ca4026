//! Error kinds raised while resolving, fetching, vendoring and executing modules.
//!
//! Each variant names the specifier (or path) that failed so the top-level
//! diagnostic points at the offending import. Cache and manifest read problems
//! never show up here: they degrade to a cache miss / "no manifest".

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// Transport-level failure (DNS, connect, TLS, read) while fetching.
    #[error("failed to fetch {specifier}: {reason}")]
    Network { specifier: String, reason: String },

    /// Server answered with a non-2xx status.
    #[error("failed to fetch {specifier}: HTTP {status}")]
    HttpStatus { specifier: String, status: u32 },

    /// Neither the URL suffix nor the Content-Type yields a supported module extension.
    #[error(
        "cannot determine a module type for {specifier} (content-type: {})",
        .content_type.as_deref().unwrap_or("none")
    )]
    UnresolvableExtension {
        specifier: String,
        content_type: Option<String>,
    },

    /// A resolved artifact could not be copied into the vendor root.
    #[error("failed to vendor {specifier} from {}: {source}", .path.display())]
    VendorCopy {
        specifier: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Vendoring was requested for a script with nothing to capture.
    #[error("no dependencies found for {}; nothing to vendor", .entry.display())]
    NoDependencies { entry: PathBuf },

    /// The entry script failed while running.
    #[error("execution of {} failed: {reason}", .entry.display())]
    Execution { entry: PathBuf, reason: String },

    /// A specifier that should be a network URL does not parse as one.
    #[error("invalid module URL: {specifier}")]
    InvalidUrl { specifier: String },

    /// Writing into the cache or vendor root failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The module host failed to transform or resolve a module.
    #[error("failed to process {id}: {cause:#}")]
    Transform { id: String, cause: anyhow::Error },
}

impl ModuleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ModuleError::Io {
            path: path.into(),
            source,
        }
    }
}
