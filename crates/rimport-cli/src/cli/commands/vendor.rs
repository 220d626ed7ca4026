//! `rimport vendor <script>`: run once with vendoring enabled.

use anyhow::Result;
use rimport_core::config::RimportConfig;
use rimport_core::fetch::CurlClient;
use rimport_core::host::ScanHost;
use rimport_core::vendor::{run_vendoring, VendorOptions};
use std::path::PathBuf;

pub async fn run_vendor(
    cfg: &RimportConfig,
    script: &str,
    output: PathBuf,
    execute: bool,
) -> Result<()> {
    let options = VendorOptions {
        entry: script.to_string(),
        output_dir: output,
        manifest_name: cfg.manifest_name.clone(),
        cache_root: cfg.cache_root()?,
        aliases: cfg.aliases.clone(),
        execute,
    };
    let client = CurlClient::new(cfg.connect_timeout());
    let host = ScanHost::new(cfg.runtime.clone());
    let report = run_vendoring(&options, client, &host).await?;

    eprintln!(
        "Vendored {} module(s) into {}",
        report.manifest.len(),
        options.output_dir.display()
    );
    eprintln!(
        "To use it: rimport run {} --import-map {}",
        script,
        report.manifest_path.display()
    );
    Ok(())
}
