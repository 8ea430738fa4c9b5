//! Launcher program skeleton.
//!
//! Substitution points: the target platform identifier, the runtime
//! subdirectory name, the jar base name, and the retry-policy constant.
//! Everything else is fixed program text; in particular the bootstrap
//! control flow (see [`crate::packager::bootstrap`]) never varies with
//! the substitutions.

/// Source skeleton for the generated launcher crate's `main.rs`.
pub const LAUNCHER_TEMPLATE: &str = r#"//! Self-installing launcher for {{jar_base}}.
//!
//! Generated source. On each run: locate the per-user install directory,
//! extract the embedded runtime if absent (or when retrying after a
//! failure), then run the real Java runtime with the bundled jar.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const TARGET_OS: &str = "{{target_os}}";
const RUNTIME_DIR: &str = "{{runtime_dir}}";
const JAR_BASE: &str = "{{jar_base}}";
const PERSISTENT_RETRY: bool = {{persistent_retry}};
const UNINSTALL_FLAG: &str = "--jarpack-uninstall";
const MANIFEST_NAME: &str = "jarpack.json";

static PAYLOAD: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/payload.tar.gz"));

enum BootstrapError {
    Failed(String),
    Exit(i32),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::Failed(msg) => write!(f, "{msg}"),
            BootstrapError::Exit(code) => write!(f, "runtime exited with status {code}"),
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let uninstall = args.iter().any(|a| a.as_str() == UNINSTALL_FLAG);
    let forwarded: Vec<String> = args
        .into_iter()
        .filter(|a| a.as_str() != UNINSTALL_FLAG)
        .collect();

    let install_root = match install_root() {
        Some(dir) => dir,
        None => {
            eprintln!("{JAR_BASE}: no per-user configuration directory available");
            std::process::exit(1);
        }
    };

    let result = if PERSISTENT_RETRY {
        run_persistent(&install_root, &forwarded)
    } else {
        run_single_shot(&install_root, &forwarded)
    };

    let code = match result {
        Ok(code) => code,
        Err(BootstrapError::Exit(code)) => code,
        Err(err) => {
            eprintln!("{JAR_BASE}: {err}");
            1
        }
    };

    if uninstall {
        let _ = fs::remove_dir_all(install_root.join(RUNTIME_DIR));
    }

    std::process::exit(code);
}

/// One unforced attempt, then exactly one forced retry.
fn run_single_shot(root: &Path, args: &[String]) -> Result<i32, BootstrapError> {
    match attempt(root, args, false) {
        Ok(code) => Ok(code),
        Err(_) => attempt(root, args, true),
    }
}

/// Retry with `force` armed; a failure on an already-forced attempt is fatal.
fn run_persistent(root: &Path, args: &[String]) -> Result<i32, BootstrapError> {
    let mut force = false;
    loop {
        match attempt(root, args, force) {
            Ok(code) => return Ok(code),
            Err(err) => {
                if force {
                    return Err(err);
                }
                force = true;
            }
        }
    }
}

/// Verify-or-extract the install, then run the bundled jar.
fn attempt(root: &Path, args: &[String], force: bool) -> Result<i32, BootstrapError> {
    let bundle_dir = root.join(RUNTIME_DIR);
    if force || !bundle_dir.is_dir() {
        extract_payload(&bundle_dir)?;
    }

    let manifest = read_manifest(&bundle_dir)?;
    let java = bundle_dir.join(&manifest.runtime_bin_dir).join(java_binary());
    let jar = bundle_dir.join(&manifest.jar);

    let status = Command::new(&java)
        .arg("-jar")
        .arg(&jar)
        .args(args)
        .status()
        .map_err(|e| BootstrapError::Failed(format!("failed to run {}: {e}", java.display())))?;

    match status.code() {
        Some(0) => Ok(0),
        Some(code) => Err(BootstrapError::Exit(code)),
        None => Err(BootstrapError::Failed("runtime terminated by signal".to_string())),
    }
}

/// Recreate the bundle directory and unpack every embedded resource into
/// it, overwriting leftovers from interrupted extractions.
fn extract_payload(bundle_dir: &Path) -> Result<(), BootstrapError> {
    let _ = fs::remove_dir_all(bundle_dir);
    fs::create_dir_all(bundle_dir)
        .map_err(|e| BootstrapError::Failed(format!("failed to create {}: {e}", bundle_dir.display())))?;

    let decoder = flate2::read::GzDecoder::new(PAYLOAD);
    let mut archive = tar::Archive::new(decoder);
    archive
        .unpack(bundle_dir)
        .map_err(|e| BootstrapError::Failed(format!("failed to extract runtime: {e}")))?;

    Ok(())
}

struct Manifest {
    runtime_bin_dir: String,
    jar: String,
}

fn read_manifest(bundle_dir: &Path) -> Result<Manifest, BootstrapError> {
    let path = bundle_dir.join(MANIFEST_NAME);
    let body = fs::read_to_string(&path)
        .map_err(|e| BootstrapError::Failed(format!("missing runtime manifest {}: {e}", path.display())))?;
    let value: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| BootstrapError::Failed(format!("invalid runtime manifest: {e}")))?;

    let runtime_bin_dir = value["runtime_bin_dir"]
        .as_str()
        .ok_or_else(|| BootstrapError::Failed("runtime manifest missing runtime_bin_dir".to_string()))?
        .to_string();
    let jar = value["jar"]
        .as_str()
        .ok_or_else(|| BootstrapError::Failed("runtime manifest missing jar".to_string()))?
        .to_string();

    Ok(Manifest { runtime_bin_dir, jar })
}

fn java_binary() -> &'static str {
    if TARGET_OS == "windows" { "java.exe" } else { "java" }
}

fn install_root() -> Option<PathBuf> {
    dirs::config_local_dir().map(|dir| dir.join("jarpack"))
}
"#;
