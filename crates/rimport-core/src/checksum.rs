//! SHA-256 helpers: identity hashes for URLs and digests of cached artifacts.

use sha2::{Digest, Sha256};
use std::io;
use std::path::Path;

/// SHA-256 of `data` as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// SHA-256 of a file's contents. Module artifacts are small, so the file is read whole.
pub async fn sha256_file(path: &Path) -> io::Result<String> {
    let data = tokio::fs::read(path).await?;
    Ok(sha256_hex(&data))
}
