//! `rimport info <url>`: cache and vendor identity of a module URL.

use anyhow::{Context, Result};
use rimport_core::checksum;
use rimport_core::config::RimportConfig;
use rimport_core::identity;
use rimport_core::metadata::MetadataCache;

pub async fn run_info(cfg: &RimportConfig, url: &str) -> Result<()> {
    let url = identity::normalize(url)?;
    let cache = MetadataCache::new(cfg.cache_root()?);
    let record = cache.lookup(&url).await;

    println!("url:       {}", url);
    println!("hash:      {}", identity::url_hash(&url));
    println!("name:      {}", identity::filename_without_hash(&url));

    let ext = identity::resolve_extension(&url).or_else(|| {
        record.as_ref().and_then(|r| {
            std::path::Path::new(&r.path)
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_string)
        })
    });
    match &ext {
        Some(ext) => println!("vendor:    {}", identity::vendor_path_for(&url, ext)),
        None => println!("vendor:    (extension unknown until fetched)"),
    }

    match record {
        Some(record) => {
            let path = cache.artifact_path(&record);
            println!("cached:    {}", path.display());
            let digest = checksum::sha256_file(&path)
                .await
                .with_context(|| format!("hash {}", path.display()))?;
            println!("sha256:    {}", digest);
            if let Some(ct) = &record.content_type {
                println!("type:      {}", ct);
            }
        }
        None => println!("cached:    no"),
    }
    Ok(())
}
