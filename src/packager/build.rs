//! Launcher build orchestration.
//!
//! Initializes the generated crate, resolves its dependencies, and
//! cross-compiles it. Cross-compilation targets the child build process's
//! environment, never the parent's.

use crate::bail;
use crate::packager::error::{Error, Result};
use crate::packager::launcher;
use crate::packager::request::BundleRequest;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::process::Command;

/// Check if cargo is available for launcher compilation.
///
/// Cached result to avoid repeated subprocess calls during packaging.
pub static HAS_CARGO: LazyLock<bool> = LazyLock::new(|| match which::which("cargo") {
    Ok(path) => match std::process::Command::new(&path).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout);
            log::debug!("✓ cargo available: {}", version.trim());
            true
        }
        Ok(output) => {
            log::warn!(
                "cargo found at {} but --version check failed (exit code: {:?})",
                path.display(),
                output.status.code()
            );
            false
        }
        Err(e) => {
            log::warn!(
                "cargo found at {} but failed to execute: {e}. Check file permissions.",
                path.display()
            );
            false
        }
    },
    Err(e) => {
        log::debug!("cargo not found in PATH: {e}");
        false
    }
});

/// Initialize the launcher crate in `crate_dir`, resolve its dependencies,
/// and compile it for the request's target pair.
///
/// Returns the built binary's path inside the staging tree; the caller
/// moves it to the output directory.
pub async fn build_launcher(request: &BundleRequest, crate_dir: &Path) -> Result<PathBuf> {
    if !*HAS_CARGO {
        bail!("cargo not found in PATH; a Rust toolchain is required to build the launcher");
    }

    let crate_name = request.launcher_crate_name();
    let triple = request.rust_triple();

    // Module workspace init. The synthesized src/main.rs is already in
    // place; init only adds the missing manifest.
    run_cargo(
        crate_dir,
        &["init", "--bin", "--vcs", "none", "--name", &crate_name],
        &[],
    )
    .await?;

    // Dependency resolution for the generated source.
    let mut add_args = vec!["add"];
    add_args.extend(launcher::LAUNCHER_DEPS);
    run_cargo(crate_dir, &add_args, &[]).await?;

    // Cross-compile by setting the target in the child's environment.
    run_cargo(
        crate_dir,
        &["build", "--release"],
        &[("CARGO_BUILD_TARGET", triple)],
    )
    .await?;

    let binary = crate_dir
        .join("target")
        .join(triple)
        .join("release")
        .join(format!("{crate_name}{}", request.target_os().exe_suffix()));

    if !binary.is_file() {
        bail!("expected launcher binary missing after build: {}", binary.display());
    }

    Ok(binary)
}

/// Run one cargo subprocess, identifying it in any failure.
async fn run_cargo(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> Result<()> {
    let command = format!("cargo {}", args.join(" "));
    log::debug!("running: {command}");

    let mut cmd = Command::new("cargo");
    cmd.args(args).current_dir(dir);
    for (key, value) in env {
        cmd.env(key, value);
    }

    let status = cmd.status().await.map_err(|source| Error::CommandFailed {
        command: command.clone(),
        source,
    })?;

    if !status.success() {
        return Err(Error::CommandStatus {
            command,
            code: status.code(),
        });
    }

    Ok(())
}
