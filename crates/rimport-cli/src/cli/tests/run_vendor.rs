//! Tests for the run and vendor subcommands.

use super::parse;
use crate::cli::CliCommand;
use std::path::Path;

#[test]
fn cli_parse_run() {
    match parse(&["rimport", "run", "main.js"]) {
        CliCommand::Run {
            script,
            import_map,
            no_run,
        } => {
            assert_eq!(script, "main.js");
            assert!(import_map.is_none());
            assert!(!no_run);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_with_import_map() {
    match parse(&[
        "rimport",
        "run",
        "main.js",
        "--import-map",
        "vendor/import_map.json",
        "--no-run",
    ]) {
        CliCommand::Run {
            import_map, no_run, ..
        } => {
            assert_eq!(
                import_map.as_deref(),
                Some(Path::new("vendor/import_map.json"))
            );
            assert!(no_run);
        }
        _ => panic!("expected Run with --import-map"),
    }
}

#[test]
fn cli_parse_vendor() {
    match parse(&["rimport", "vendor", "https://example.com/main.ts"]) {
        CliCommand::Vendor {
            script,
            output,
            no_run,
        } => {
            assert_eq!(script, "https://example.com/main.ts");
            assert!(output.is_none());
            assert!(!no_run);
        }
        _ => panic!("expected Vendor"),
    }
}

#[test]
fn cli_parse_vendor_output() {
    match parse(&["rimport", "vendor", "main.js", "-o", "deps", "--no-run"]) {
        CliCommand::Vendor { output, no_run, .. } => {
            assert_eq!(output.as_deref(), Some(Path::new("deps")));
            assert!(no_run);
        }
        _ => panic!("expected Vendor with --output"),
    }
}

#[test]
fn cli_parse_run_requires_script() {
    use crate::cli::Cli;
    use clap::Parser;
    assert!(Cli::try_parse_from(["rimport", "run"]).is_err());
}
