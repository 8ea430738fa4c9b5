//! Deterministic payload packing for the embed strategy.
//!
//! The staged tree is packed into a tar.gz the generated launcher consumes
//! at compile time via `include_bytes!`. Entries are sorted, mtimes
//! zeroed, and modes fixed at 0755, so identical staged inputs produce a
//! byte-identical payload. Execute permission on every file is the
//! accepted over-permissioning cost of not shipping per-file metadata.

use crate::packager::error::{Error, ErrorExt, Result};
use flate2::{Compression, write::GzEncoder};
use std::path::Path;

/// Pack `payload_root` into `dest` (a `.tar.gz`), with entry paths
/// relative to the tree root.
pub async fn pack_payload(payload_root: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating payload directory", parent)?;
    }

    let payload_root = payload_root.to_path_buf();
    let dest_buf = dest.to_path_buf();
    tokio::task::spawn_blocking(move || pack_blocking(&payload_root, &dest_buf))
        .await
        .map_err(|e| Error::Generic(format!("payload packing task panicked: {e}")))??;

    log::debug!("packed payload archive at {}", dest.display());
    Ok(())
}

fn pack_blocking(root: &Path, dest: &Path) -> Result<()> {
    let file = std::fs::File::create(dest).fs_context("creating payload archive", dest)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    let mut files: Vec<_> = walkdir::WalkDir::new(root)
        .into_iter()
        .collect::<std::result::Result<Vec<_>, walkdir::Error>>()?
        .into_iter()
        .filter(|e| e.file_type().is_file())
        .collect();
    files.sort_by_key(|e| e.path().to_path_buf());

    for entry in files {
        let rel = entry.path().strip_prefix(root)?;
        let mut file = std::fs::File::open(entry.path())
            .fs_context("opening staged file", entry.path())?;
        let len = file
            .metadata()
            .fs_context("reading staged file metadata", entry.path())?
            .len();

        let mut header = tar::Header::new_gnu();
        header.set_size(len);
        header.set_mode(0o755);
        header.set_mtime(0);
        header.set_cksum();
        builder
            .append_data(&mut header, rel, &mut file)
            .fs_context("appending payload entry", entry.path())?;
    }

    let gz = builder.into_inner().fs_context("finishing payload archive", dest)?;
    gz.finish().fs_context("flushing payload archive", dest)?;
    Ok(())
}
