//! Archive extraction for runtime distributions.
//!
//! Thin dispatch over the archive crates; the archive formats themselves
//! are delegated to `tar`, `flate2` and `zip`.

use crate::packager::error::{Error, ErrorExt, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::Path;

/// Fully extract `archive` into `dest`, dispatching on the file extension.
///
/// Supported formats: `.tar.gz` / `.tgz`, `.tar`, `.zip`. Anything else is
/// [`Error::UnsupportedArchive`]; an unreadable archive or destination is
/// fatal for the whole packaging run.
pub async fn unarchive(archive: &Path, dest: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dest)
        .await
        .fs_context("creating extraction directory", dest)?;

    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || unarchive_blocking(&archive, &dest))
        .await
        .map_err(|e| Error::Generic(format!("extraction task panicked: {e}")))?
}

fn unarchive_blocking(archive: &Path, dest: &Path) -> Result<()> {
    let name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        let file = File::open(archive).fs_context("opening runtime archive", archive)?;
        tar::Archive::new(GzDecoder::new(file))
            .unpack(dest)
            .fs_context("unpacking runtime archive", archive)?;
    } else if name.ends_with(".tar") {
        let file = File::open(archive).fs_context("opening runtime archive", archive)?;
        tar::Archive::new(file)
            .unpack(dest)
            .fs_context("unpacking runtime archive", archive)?;
    } else if name.ends_with(".zip") {
        let file = File::open(archive).fs_context("opening runtime archive", archive)?;
        let mut zip = zip::ZipArchive::new(file)?;
        zip.extract(dest)?;
    } else {
        return Err(Error::UnsupportedArchive {
            path: archive.to_path_buf(),
        });
    }

    log::debug!("extracted {} into {}", archive.display(), dest.display());
    Ok(())
}
