//! Atomic file writes for the cache and vendor roots.
//!
//! Content is written to `<final>.part`, synced, then renamed into place so a
//! crash never leaves a truncated file under the final name. Both roots are
//! unlocked shared state: concurrent invocations race on the rename.

use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.js` → `a.js.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Writes `data` to `final_path` via a synced temp file and rename.
/// Parent directories are created as needed.
pub async fn write_atomic(final_path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = final_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = temp_path(final_path);
    let result = async {
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, final_path).await
    }
    .await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    result
}

/// Copies `from` to `to` with the same temp-and-rename discipline.
pub async fn copy_atomic(from: &Path, to: &Path) -> io::Result<()> {
    let data = tokio::fs::read(from).await?;
    write_atomic(to, &data).await
}
