//! Module identity codec.
//!
//! Turns a module URL into stable local names:
//! - a content-addressed cache filename (`<sha256(url)>.<ext>`),
//! - a human-readable vendor subpath (`host/dir/name_<hash12>.<ext>`).
//!
//! URLs are normalized by `url::Url` (lower-cased scheme/host, default port
//! dropped, percent-encoding normalized) and the fragment is discarded: it
//! names a part of a document, not a different module.

mod extension;
mod sanitize;

pub use extension::{
    extension_from_content_type, is_valid_extension, resolve_extension, EXTENSIONS,
};
pub use sanitize::sanitize_segment;

use url::Url;

use crate::checksum::sha256_hex;
use crate::error::ModuleError;

/// Hex digits of the identity hash kept in vendor subpaths.
const VENDOR_HASH_LEN: usize = 12;

/// Last path segment name used when the URL path ends in `/`.
const INDEX_NAME: &str = "index";

/// Parses and normalizes a module specifier into its identity URL.
pub fn normalize(specifier: &str) -> Result<Url, ModuleError> {
    let mut url = Url::parse(specifier).map_err(|_| ModuleError::InvalidUrl {
        specifier: specifier.to_string(),
    })?;
    url.set_fragment(None);
    Ok(url)
}

/// Identity hash: SHA-256 over the normalized URL string.
pub fn url_hash(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    sha256_hex(url.as_str().as_bytes())
}

/// Cache filename for `url` with the resolved extension `ext`.
pub fn filename_for(url: &Url, ext: &str) -> String {
    format!("{}.{}", url_hash(url), ext)
}

/// Human-readable path for `url` (host, port token, path) without hash or extension.
///
/// Segments are joined with `/` regardless of platform so the result can be
/// written into a manifest verbatim.
pub fn filename_without_hash(url: &Url) -> String {
    let mut parts: Vec<String> = Vec::new();

    let base = match (url.host_str(), url.port()) {
        // ':' is not allowed in filenames on some platforms.
        (Some(host), Some(port)) => format!("{}_PORT{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => url.scheme().to_string(),
    };
    parts.push(sanitize_segment(&base));

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.collect())
        .unwrap_or_default();
    let (last, dirs) = match segments.split_last() {
        Some((last, dirs)) => (*last, dirs),
        None => ("", &[][..]),
    };
    for dir in dirs.iter().filter(|s| !s.is_empty()) {
        parts.push(sanitize_segment(dir));
    }

    let name = match extension::split_extension(last) {
        Some((stem, _)) => stem,
        None => last,
    };
    let name = sanitize_segment(name);
    parts.push(if name.is_empty() {
        INDEX_NAME.to_string()
    } else {
        name
    });

    parts.join("/")
}

/// Vendor-root-relative path for a remote module: readable name plus identity hash.
pub fn vendor_path_for(url: &Url, ext: &str) -> String {
    let hash = url_hash(url);
    format!(
        "{}_{}.{}",
        filename_without_hash(url),
        &hash[..VENDOR_HASH_LEN],
        ext
    )
}
