//! `rimport run <script>`: resolve, fetch, and execute.

use anyhow::Result;
use rimport_core::config::RimportConfig;
use rimport_core::fetch::CurlClient;
use rimport_core::host::ScanHost;
use rimport_core::run::{run_script, RunOptions};
use std::path::PathBuf;

pub async fn run_script_command(
    cfg: &RimportConfig,
    script: &str,
    import_map: Option<PathBuf>,
    execute: bool,
) -> Result<()> {
    let options = RunOptions {
        entry: script.to_string(),
        import_map,
        cache_root: cfg.cache_root()?,
        aliases: cfg.aliases.clone(),
        execute,
    };
    let client = CurlClient::new(cfg.connect_timeout());
    let host = ScanHost::new(cfg.runtime.clone());
    let graph = run_script(&options, client, &host).await?;

    if !execute {
        for (path, node) in &graph.modules {
            println!("{}", path.display());
            for (specifier, resolution) in &node.imports {
                println!("  {specifier} -> {resolution:?}");
            }
        }
    }
    Ok(())
}
