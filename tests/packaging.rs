//! Pipeline integration tests: prune, stage, payload, synthesis.
//!
//! The compile stage needs a network-facing cargo, so these tests drive
//! every stage before it against a fixture runtime archive, end to end.

use flate2::{Compression, write::GzEncoder};
use jarpack::packager::launcher::{self, LauncherParams};
use jarpack::packager::policy::RetentionPolicy;
use jarpack::packager::request::{RetryPolicy, TargetOs};
use jarpack::packager::stage::{self, MANIFEST_NAME, RuntimeManifest};
use jarpack::packager::{payload, prune};
use std::path::Path;

/// Build a `.tar.gz` runtime fixture mirroring a JDK distribution layout.
fn write_runtime_archive(dest: &Path, entries: &[&str]) {
    let file = std::fs::File::create(dest).expect("create archive");
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for path in entries {
        let data = b"fixture";
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_mtime(0);
        header.set_cksum();
        builder
            .append_data(&mut header, path, &data[..])
            .expect("append entry");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip");
}

fn write_jar(dir: &Path, name: &str) -> std::path::PathBuf {
    let jar = dir.join(name);
    std::fs::write(&jar, b"PK\x03\x04fixture").expect("write jar");
    jar
}

#[tokio::test]
async fn packaging_stages_run_end_to_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("jdk-17.tar.gz");
    write_runtime_archive(
        &archive,
        &[
            "jdk-17.0.2/bin/java",
            "jdk-17.0.2/bin/keytool",
            "jdk-17.0.2/lib/libjvm.so",
            "jdk-17.0.2/lib/server/libjava.so",
            "jdk-17.0.2/man/man1/java.1",
            "jdk-17.0.2/src.zip",
        ],
    );
    let jar = write_jar(dir.path(), "app-1.0.jar");

    // Prune: only the runtime skeleton survives.
    let payload_root = dir.path().join("staging/payload");
    prune::prepare_runtime(&archive, &payload_root, &RetentionPolicy::runtime_default())
        .await
        .expect("prune should succeed");

    assert!(payload_root.join("jdk-17.0.2/bin/java").is_file());
    assert!(payload_root.join("jdk-17.0.2/lib/server/libjava.so").is_file());
    assert!(!payload_root.join("jdk-17.0.2/man").exists());
    assert!(!payload_root.join("jdk-17.0.2/src.zip").exists());

    // Stage: jar beside the runtime, manifest pointing at its bin dir.
    let staged = stage::stage_resources(&jar, &payload_root, TargetOs::Linux)
        .await
        .expect("staging should succeed");
    assert_eq!(staged.jar_name, "app-1.0.jar");
    assert_eq!(staged.manifest.runtime_bin_dir, "jdk-17.0.2/bin");
    assert!(payload_root.join("app-1.0.jar").is_file());

    let body =
        std::fs::read_to_string(payload_root.join(MANIFEST_NAME)).expect("read manifest");
    let manifest: RuntimeManifest = serde_json::from_str(&body).expect("parse manifest");
    assert_eq!(manifest, staged.manifest);

    // Payload: deterministic archive under the launcher crate.
    let crate_dir = dir.path().join("staging/launcher");
    let payload_path = crate_dir.join("assets/payload.tar.gz");
    payload::pack_payload(&payload_root, &payload_path)
        .await
        .expect("payload packing should succeed");
    assert!(payload_path.is_file());

    // Synthesis: launcher source carrying the three substitutions.
    let params = LauncherParams {
        target_os: "linux".to_string(),
        runtime_dir_name: "app-1.0".to_string(),
        jar_base_name: "app-1.0".to_string(),
        retry: RetryPolicy::SingleShot,
    };
    launcher::synthesize(&params, &crate_dir)
        .await
        .expect("synthesis should succeed");

    let source =
        std::fs::read_to_string(crate_dir.join("src/main.rs")).expect("read launcher source");
    assert!(source.contains(r#"const RUNTIME_DIR: &str = "app-1.0";"#));
    assert!(source.contains("payload.tar.gz"));
}

#[tokio::test]
async fn repeated_runs_produce_identical_staged_inputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("jdk.tar.gz");
    write_runtime_archive(&archive, &["jdk/bin/java", "jdk/lib/libjvm.so"]);
    let jar = write_jar(dir.path(), "tool.jar");

    let mut payloads = Vec::new();
    let mut sources = Vec::new();

    for run in ["first", "second"] {
        let payload_root = dir.path().join(run).join("payload");
        let crate_dir = dir.path().join(run).join("launcher");

        prune::prepare_runtime(&archive, &payload_root, &RetentionPolicy::runtime_default())
            .await
            .expect("prune should succeed");
        stage::stage_resources(&jar, &payload_root, TargetOs::Linux)
            .await
            .expect("staging should succeed");

        let payload_path = crate_dir.join("assets/payload.tar.gz");
        payload::pack_payload(&payload_root, &payload_path)
            .await
            .expect("payload packing should succeed");
        payloads.push(std::fs::read(&payload_path).expect("read payload"));

        let params = LauncherParams {
            target_os: "linux".to_string(),
            runtime_dir_name: "tool".to_string(),
            jar_base_name: "tool".to_string(),
            retry: RetryPolicy::SingleShot,
        };
        launcher::synthesize(&params, &crate_dir)
            .await
            .expect("synthesis should succeed");
        sources.push(std::fs::read(crate_dir.join("src/main.rs")).expect("read source"));
    }

    assert_eq!(payloads[0], payloads[1], "payloads are byte-identical");
    assert_eq!(sources[0], sources[1], "launcher sources are byte-identical");
}

#[tokio::test]
async fn a_runtime_archive_without_java_aborts_staging() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("broken.tar.gz");
    write_runtime_archive(&archive, &["jdk/lib/libjvm.so", "jdk/readme.txt"]);
    let jar = write_jar(dir.path(), "app.jar");

    let payload_root = dir.path().join("payload");
    prune::prepare_runtime(&archive, &payload_root, &RetentionPolicy::runtime_default())
        .await
        .expect("prune itself succeeds");

    let result = stage::stage_resources(&jar, &payload_root, TargetOs::Linux).await;
    assert!(result.is_err(), "missing entry point is fatal");
}

#[tokio::test]
async fn windows_targets_stage_the_exe_entry_point() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("jdk-win.tar.gz");
    write_runtime_archive(&archive, &["jdk/bin/java.exe", "jdk/bin/java.dll"]);
    let jar = write_jar(dir.path(), "app.jar");

    let payload_root = dir.path().join("payload");
    prune::prepare_runtime(&archive, &payload_root, &RetentionPolicy::runtime_default())
        .await
        .expect("prune should succeed");

    let staged = stage::stage_resources(&jar, &payload_root, TargetOs::Windows)
        .await
        .expect("staging should succeed");
    assert_eq!(staged.manifest.runtime_bin_dir, "jdk/bin");
}
