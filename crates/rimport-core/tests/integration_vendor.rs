//! Integration tests: a local module server, vendoring runs, and offline replay
//! through the written manifest.

mod common;

use std::collections::BTreeMap;
use std::path::Path;

use common::module_server::{self, Routes};
use rimport_core::fetch::CurlClient;
use rimport_core::host::ScanHost;
use rimport_core::manifest::VendorManifest;
use rimport_core::run::{run_script, RunOptions};
use rimport_core::vendor::{run_vendoring, VendorOptions};
use rimport_core::ModuleError;
use tempfile::tempdir;

fn vendor_options(entry: &Path, output: &Path, cache: &Path) -> VendorOptions {
    VendorOptions {
        entry: entry.to_string_lossy().into_owned(),
        output_dir: output.to_path_buf(),
        manifest_name: "import_map.json".to_string(),
        cache_root: cache.to_path_buf(),
        aliases: BTreeMap::new(),
        execute: false,
    }
}

fn run_options(entry: &Path, import_map: Option<&Path>, cache: &Path) -> RunOptions {
    RunOptions {
        entry: entry.to_string_lossy().into_owned(),
        import_map: import_map.map(Path::to_path_buf),
        cache_root: cache.to_path_buf(),
        aliases: BTreeMap::new(),
        execute: false,
    }
}

fn write_entry(dir: &Path, source: &str) -> std::path::PathBuf {
    let entry = dir.join("main.js");
    std::fs::write(&entry, source).unwrap();
    entry
}

#[tokio::test]
async fn vendoring_single_dependency_then_replay_offline() {
    let server = module_server::start(Routes::new().module(
        "/lib/a.js",
        Some("application/javascript"),
        "export const a = 1;\n",
    ));
    let dep = server.url("/lib/a.js");
    let work = tempdir().unwrap();
    let entry = write_entry(work.path(), &format!("import {{ a }} from \"{dep}\";\n"));
    let vendor_dir = work.path().join("vendor");

    let report = run_vendoring(
        &vendor_options(&entry, &vendor_dir, &work.path().join("cache-1")),
        CurlClient::default(),
        &ScanHost::new(vec!["true".into()]),
    )
    .await
    .unwrap();

    assert_eq!(report.manifest.len(), 1);
    assert_eq!(report.manifest_path, vendor_dir.join("import_map.json"));
    let rel = report.manifest.get(&dep).unwrap();
    assert_eq!(
        std::fs::read_to_string(vendor_dir.join(rel)).unwrap(),
        "export const a = 1;\n"
    );
    let on_disk: VendorManifest =
        serde_json::from_str(&std::fs::read_to_string(&report.manifest_path).unwrap()).unwrap();
    assert_eq!(on_disk, report.manifest);
    let requests_after_vendoring = server.requests();
    assert_eq!(requests_after_vendoring, 1);

    // Fresh cache: everything must come from the vendor directory.
    let graph = run_script(
        &run_options(&entry, Some(report.manifest_path.as_path()), &work.path().join("cache-2")),
        CurlClient::default(),
        &ScanHost::new(vec!["true".into()]),
    )
    .await
    .unwrap();
    assert_eq!(graph.len(), 2);
    assert_eq!(server.requests(), requests_after_vendoring);
}

#[tokio::test]
async fn relative_and_root_relative_imports_inside_vendored_modules_replay_offline() {
    let server = module_server::start(
        Routes::new()
            .module(
                "/pkg/mod.js",
                None,
                "import { b } from './b.js';\nimport { c } from '/shared/c.js';\nexport const a = b + c;\n",
            )
            .module("/pkg/b.js", None, "export const b = 2;\n")
            .module("/shared/c.js", None, "export const c = 3;\n"),
    );
    let work = tempdir().unwrap();
    let entry = write_entry(
        work.path(),
        &format!("import {{ a }} from \"{}\";\n", server.url("/pkg/mod.js")),
    );
    let vendor_dir = work.path().join("vendor");

    let report = run_vendoring(
        &vendor_options(&entry, &vendor_dir, &work.path().join("cache-1")),
        CurlClient::default(),
        &ScanHost::new(vec!["true".into()]),
    )
    .await
    .unwrap();
    assert_eq!(report.manifest.len(), 3);
    assert!(report.manifest.contains(&server.url("/pkg/b.js")));
    assert!(report.manifest.contains(&server.url("/shared/c.js")));
    assert_eq!(server.requests(), 3);

    let graph = run_script(
        &run_options(&entry, Some(report.manifest_path.as_path()), &work.path().join("cache-2")),
        CurlClient::default(),
        &ScanHost::new(vec!["true".into()]),
    )
    .await
    .unwrap();
    assert_eq!(graph.len(), 4);
    assert_eq!(server.requests(), 3);
}

#[tokio::test]
async fn cyclic_remote_modules_are_vendored_once() {
    let server = module_server::start(
        Routes::new()
            .module("/a.js", None, "import './b.js';\nexport const a = 1;\n")
            .module("/b.js", None, "import './a.js';\nexport const b = 1;\n"),
    );
    let work = tempdir().unwrap();
    let entry = write_entry(
        work.path(),
        &format!("import \"{}\";\n", server.url("/a.js")),
    );

    let report = run_vendoring(
        &vendor_options(&entry, &work.path().join("vendor"), &work.path().join("cache")),
        CurlClient::default(),
        &ScanHost::new(vec!["true".into()]),
    )
    .await
    .unwrap();
    assert_eq!(report.manifest.len(), 2);
    assert_eq!(report.modules, 3);
    assert_eq!(server.requests(), 2);
}

#[tokio::test]
async fn vendoring_without_dependencies_fails() {
    let work = tempdir().unwrap();
    std::fs::write(work.path().join("util.js"), "export default 1;\n").unwrap();
    let entry = write_entry(work.path(), "import u from './util.js';\n");
    let vendor_dir = work.path().join("vendor");

    let err = run_vendoring(
        &vendor_options(&entry, &vendor_dir, &work.path().join("cache")),
        CurlClient::default(),
        &ScanHost::new(vec!["true".into()]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ModuleError::NoDependencies { .. }));
    assert!(!vendor_dir.join("import_map.json").exists());
}

#[tokio::test]
async fn missing_remote_module_reports_status() {
    let server = module_server::start(Routes::new());
    let work = tempdir().unwrap();
    let entry = write_entry(
        work.path(),
        &format!("import \"{}\";\n", server.url("/missing.js")),
    );

    let err = run_script(
        &run_options(&entry, None, &work.path().join("cache")),
        CurlClient::default(),
        &ScanHost::new(vec!["true".into()]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ModuleError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn execution_runs_linked_entry() {
    let server = module_server::start(Routes::new().module("/dep.js", None, "export {};\n"));
    let work = tempdir().unwrap();
    let entry = write_entry(
        work.path(),
        &format!("import \"{}\";\n", server.url("/dep.js")),
    );
    let mut options = run_options(&entry, None, &work.path().join("cache"));
    options.execute = true;

    // The linked entry must import the dependency by file URL.
    let host = ScanHost::new(vec![
        "sh".into(),
        "-c".into(),
        "grep -q 'file://' \"$1\"".into(),
        "sh".into(),
    ]);
    run_script(&options, CurlClient::default(), &host)
        .await
        .unwrap();
}

#[tokio::test]
async fn failed_execution_still_writes_manifest() {
    let server = module_server::start(Routes::new().module("/dep.js", None, "export {};\n"));
    let work = tempdir().unwrap();
    let entry = write_entry(
        work.path(),
        &format!("import \"{}\";\n", server.url("/dep.js")),
    );
    let vendor_dir = work.path().join("vendor");
    let mut options = vendor_options(&entry, &vendor_dir, &work.path().join("cache"));
    options.execute = true;

    let host = ScanHost::new(vec!["sh".into(), "-c".into(), "exit 3".into(), "sh".into()]);
    let err = run_vendoring(&options, CurlClient::default(), &host)
        .await
        .unwrap_err();
    assert!(matches!(err, ModuleError::Execution { .. }));
    assert!(vendor_dir.join("import_map.json").exists());
}
