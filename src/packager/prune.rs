//! Two-pass runtime tree pruning.
//!
//! The walk never deletes while traversing: doomed paths are collected
//! first, then removed, so the operation is testable against a fixture
//! tree and immune to iterator invalidation.

use crate::packager::error::{Error, Result};
use crate::packager::extract;
use crate::packager::policy::RetentionPolicy;
use crate::packager::utils;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Extract the runtime archive into `dest`, then prune everything the
/// policy does not retain.
pub async fn prepare_runtime(
    archive: &Path,
    dest: &Path,
    policy: &RetentionPolicy,
) -> Result<()> {
    extract::unarchive(archive, dest).await?;
    prune_tree(dest, policy).await
}

/// Prune `root` under the policy.
///
/// Files failing the policy are removed individually; directories with no
/// retained descendant are removed recursively. Removal of a directory
/// implies removal of everything beneath it, so later deletions tolerate
/// paths that are already gone.
pub async fn prune_tree(root: &Path, policy: &RetentionPolicy) -> Result<()> {
    let root_buf = root.to_path_buf();
    let policy = policy.clone();
    let plan = tokio::task::spawn_blocking(move || collect_prunable(&root_buf, &policy))
        .await
        .map_err(|e| Error::Generic(format!("prune scan task panicked: {e}")))??;

    log::debug!(
        "pruning {} files and {} directories under {}",
        plan.files.len(),
        plan.dirs.len(),
        root.display()
    );

    for file in &plan.files {
        utils::fs::remove_file_idempotent(file).await?;
    }
    // Shallowest first; children may already be gone, which the
    // idempotent removal tolerates.
    for dir in &plan.dirs {
        utils::fs::remove_dir_all_idempotent(dir).await?;
    }

    Ok(())
}

struct PrunePlan {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

fn collect_prunable(root: &Path, policy: &RetentionPolicy) -> Result<PrunePlan> {
    let mut retained_dirs: HashSet<PathBuf> = HashSet::new();
    let mut files = Vec::new();
    let mut all_dirs = Vec::new();

    for entry in walkdir::WalkDir::new(root) {
        let entry = entry?;
        if entry.path() == root {
            continue;
        }

        let rel = entry.path().strip_prefix(root)?.to_path_buf();
        if entry.file_type().is_dir() {
            all_dirs.push(rel);
        } else if policy.is_retained(&rel) {
            // Ancestors of a kept file are required for it to function.
            let mut parent = rel.parent();
            while let Some(dir) = parent {
                if dir.as_os_str().is_empty() {
                    break;
                }
                retained_dirs.insert(dir.to_path_buf());
                parent = dir.parent();
            }
        } else {
            files.push(root.join(&rel));
        }
    }

    let mut dirs: Vec<PathBuf> = all_dirs
        .into_iter()
        .filter(|d| !retained_dirs.contains(d) && !policy.is_retained(d))
        .map(|d| root.join(d))
        .collect();
    dirs.sort_by_key(|d| d.components().count());

    Ok(PrunePlan { files, dirs })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, b"x").expect("write");
    }

    fn remaining_files(root: &Path) -> Vec<PathBuf> {
        walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().strip_prefix(root).expect("rel").to_path_buf())
            .collect()
    }

    #[tokio::test]
    async fn keeps_bin_and_lib_and_drops_the_rest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        for rel in [
            "bin/java",
            "lib/libjvm.so",
            "lib/server/libjava.so",
            "man/man1/java.1",
            "demo/applets/readme.txt",
        ] {
            touch(root, rel);
        }
        touch(root, "src.zip");

        prune_tree(root, &RetentionPolicy::runtime_default())
            .await
            .expect("pruning should succeed");

        assert!(root.join("bin/java").is_file());
        assert!(root.join("lib/libjvm.so").is_file());
        assert!(root.join("lib/server/libjava.so").is_file());
        assert!(!root.join("man").exists());
        assert!(!root.join("demo").exists());
        assert!(!root.join("src.zip").exists());
    }

    #[tokio::test]
    async fn handles_vendor_root_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        for rel in [
            "jdk-17.0.2/bin/java",
            "jdk-17.0.2/lib/libjvm.so",
            "jdk-17.0.2/man/man1/java.1",
            "jdk-17.0.2/release",
        ] {
            touch(root, rel);
        }

        prune_tree(root, &RetentionPolicy::runtime_default())
            .await
            .expect("pruning should succeed");

        // The vendor root survives as an ancestor of retained files.
        assert!(root.join("jdk-17.0.2/bin/java").is_file());
        assert!(root.join("jdk-17.0.2/lib/libjvm.so").is_file());
        assert!(!root.join("jdk-17.0.2/man").exists());
        assert!(!root.join("jdk-17.0.2/release").exists());
    }

    #[tokio::test]
    async fn every_survivor_matches_and_every_match_survives() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        let fixture = [
            "bin/java",
            "bin/keytool",
            "lib/libjvm.so",
            "conf/security/java.policy",
            "include/jni.h",
            "man/man1/java.1",
        ];
        for rel in fixture {
            touch(root, rel);
        }

        let policy = RetentionPolicy::runtime_default();
        let expected: Vec<&str> = fixture
            .iter()
            .copied()
            .filter(|rel| policy.is_retained(Path::new(rel)))
            .collect();

        prune_tree(root, &policy).await.expect("pruning should succeed");

        let mut survivors = remaining_files(root);
        survivors.sort();
        let mut expected: Vec<PathBuf> = expected.into_iter().map(PathBuf::from).collect();
        expected.sort();
        assert_eq!(survivors, expected);
    }

    #[tokio::test]
    async fn nested_doomed_directories_do_not_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        touch(root, "bin/java");
        // Deep chain of directories that all fail the policy; the outermost
        // recursive removal takes the inner ones with it.
        touch(root, "demo/a/b/c/d/e/sample.txt");

        prune_tree(root, &RetentionPolicy::runtime_default())
            .await
            .expect("pruning should tolerate already-removed children");

        assert!(!root.join("demo").exists());
        assert!(root.join("bin/java").is_file());
    }
}
