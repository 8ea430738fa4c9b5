//! Resource staging: jar placement and runtime entry-point discovery.

use crate::packager::error::{Context, Error, ErrorExt, Result};
use crate::packager::request::TargetOs;
use crate::packager::utils;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the manifest record shipped inside the payload.
pub const MANIFEST_NAME: &str = "jarpack.json";

/// Location record consumed by the launcher after extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeManifest {
    /// Directory holding the real `java` binary, relative to the payload
    /// root, with forward slashes regardless of host.
    pub runtime_bin_dir: String,

    /// Jar file name, e.g. `app-1.0.jar`.
    pub jar: String,
}

/// What staging placed where.
#[derive(Debug, Clone)]
pub struct StagedResources {
    /// Base name the jar was staged under.
    pub jar_name: String,

    /// Manifest written to the payload root.
    pub manifest: RuntimeManifest,
}

/// Copy the jar beside the pruned runtime and record where the runtime
/// entry point ended up.
///
/// Exactly one jar and one entry-point location are identified; a runtime
/// tree without a usable entry point is a fatal configuration error.
pub async fn stage_resources(
    jar: &Path,
    payload_root: &Path,
    target_os: TargetOs,
) -> Result<StagedResources> {
    let jar_name = jar
        .file_name()
        .and_then(|n| n.to_str())
        .context("jar path has no usable file name")?
        .to_string();

    utils::fs::copy_file(jar, &payload_root.join(&jar_name)).await?;

    let bin_dir = find_entry_point_dir(payload_root, target_os).await?;
    let manifest = RuntimeManifest {
        runtime_bin_dir: bin_dir.to_string_lossy().replace('\\', "/"),
        jar: jar_name.clone(),
    };

    let manifest_path = payload_root.join(MANIFEST_NAME);
    let body = serde_json::to_vec_pretty(&manifest)?;
    tokio::fs::write(&manifest_path, body)
        .await
        .fs_context("writing runtime manifest", &manifest_path)?;

    log::debug!("runtime entry point directory: {}", manifest.runtime_bin_dir);
    Ok(StagedResources { jar_name, manifest })
}

/// Locate the directory containing the platform entry point (`bin/java`,
/// `bin\java.exe`) at any depth in the tree.
///
/// The walk is sorted so repeated runs pick the same location.
pub async fn find_entry_point_dir(root: &Path, target_os: TargetOs) -> Result<PathBuf> {
    let root_buf = root.to_path_buf();
    tokio::task::spawn_blocking(move || find_entry_point_blocking(&root_buf, target_os))
        .await
        .map_err(|e| Error::Generic(format!("entry point scan task panicked: {e}")))?
}

fn find_entry_point_blocking(root: &Path, target_os: TargetOs) -> Result<PathBuf> {
    let java = target_os.java_binary();

    for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_java = path.file_name().and_then(|n| n.to_str()) == Some(java);
        let in_bin = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            == Some("bin");

        if is_java && in_bin {
            if let Some(parent) = path.parent() {
                return Ok(parent.strip_prefix(root)?.to_path_buf());
            }
        }
    }

    Err(Error::EntryPointNotFound {
        root: root.to_path_buf(),
    })
}
