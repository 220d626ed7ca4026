//! CLI for running and vendoring scripts with URL imports.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rimport_core::config::{self, RimportConfig};
use std::path::PathBuf;

use commands::{run_info, run_script_command, run_vendor};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rimport")]
#[command(about = "Run scripts that import modules by URL, and vendor them for offline use", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/rimport/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a script's imports (fetching remote modules as needed) and run it.
    Run {
        /// Entry script path or URL.
        script: String,
        /// Vendor manifest to resolve imports from before touching the network.
        #[arg(long, value_name = "FILE")]
        import_map: Option<PathBuf>,
        /// Resolve and fetch only; do not execute.
        #[arg(long)]
        no_run: bool,
    },

    /// Run a script while copying its bare imports into a vendor directory,
    /// then write the manifest there.
    Vendor {
        /// Entry script path or URL.
        script: String,
        /// Vendor directory (default: `vendor_dir` from config).
        #[arg(long, short = 'o', value_name = "DIR")]
        output: Option<PathBuf>,
        /// Resolve and vendor only; do not execute.
        #[arg(long)]
        no_run: bool,
    },

    /// Show cache identity and vendor path for a module URL.
    Info {
        /// Module URL.
        url: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<RimportConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_ref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                script,
                import_map,
                no_run,
            } => run_script_command(&cfg, &script, import_map, !no_run).await?,
            CliCommand::Vendor {
                script,
                output,
                no_run,
            } => {
                let output = output.unwrap_or_else(|| cfg.vendor_dir.clone());
                run_vendor(&cfg, &script, output, !no_run).await?;
            }
            CliCommand::Info { url } => run_info(&cfg, &url).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
