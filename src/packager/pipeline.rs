//! Packaging orchestration and coordination.
//!
//! This module provides the [`Packager`] orchestrator that runs the
//! pipeline stages strictly in order - prune, stage, synthesize, build -
//! each fully complete before the next starts. There is no
//! partial-success continuation: any stage failure aborts the whole run.
#![allow(dead_code)] // Public API - items may be used by external consumers

use crate::packager::{
    build, checksum,
    codegen::BindingGenerator,
    error::{ErrorExt, Result},
    launcher::{self, LauncherParams},
    payload,
    policy::RetentionPolicy,
    prune,
    request::BundleRequest,
    stage, utils,
};
use std::path::PathBuf;

/// Result of one packaging run.
#[derive(Debug, Clone)]
pub struct PackagedArtifact {
    /// Final launcher location in the output directory.
    pub path: PathBuf,

    /// Artifact size in bytes.
    pub size: u64,

    /// Hex-encoded SHA256 of the artifact.
    pub checksum: String,
}

/// Main packaging orchestrator.
///
/// # Examples
///
/// ```no_run
/// use jarpack::packager::{BundleRequest, Packager};
///
/// # async fn example() -> jarpack::packager::Result<()> {
/// let request = BundleRequest::builder()
///     .jar("app-1.0.jar")
///     .runtime_archive("jdk-17.tar.gz")
///     .build()?;
///
/// let packager = Packager::new(request).await?;
/// let artifact = packager.package(None).await?;
/// println!("{} ({} bytes)", artifact.path.display(), artifact.size);
/// # Ok(())
/// # }
/// ```
pub struct Packager {
    request: BundleRequest,
    policy: RetentionPolicy,
}

impl Packager {
    /// Creates a packager, validating the request's input files eagerly
    /// so no partial work happens on bad input.
    pub async fn new(request: BundleRequest) -> Result<Self> {
        request.validate()?;
        Ok(Self {
            request,
            policy: RetentionPolicy::runtime_default(),
        })
    }

    /// Returns a reference to the packaging request.
    pub fn request(&self) -> &BundleRequest {
        &self.request
    }

    /// Run the whole pipeline and return the produced artifact.
    ///
    /// `generator`, when present, deposits additional sources into the
    /// launcher crate between synthesis and the build.
    pub async fn package(
        &self,
        generator: Option<&dyn BindingGenerator>,
    ) -> Result<PackagedArtifact> {
        let staging = self.request.staging_dir();
        let payload_root = staging.join("payload");
        let crate_dir = staging.join("launcher");

        if self.request.clean() {
            log::info!("stage: clean");
            utils::fs::remove_dir_all_idempotent(self.request.output_dir()).await?;
        }

        // The staging tree is owned exclusively by this run.
        utils::fs::create_dir_all(staging, true).await?;
        utils::fs::create_dir_all(self.request.output_dir(), false).await?;

        log::info!("stage: prune runtime");
        prune::prepare_runtime(self.request.runtime_archive(), &payload_root, &self.policy)
            .await?;

        log::info!("stage: stage resources");
        let staged = stage::stage_resources(
            self.request.jar_path(),
            &payload_root,
            self.request.target_os(),
        )
        .await?;
        log::debug!(
            "staged {} with runtime at {}",
            staged.jar_name,
            staged.manifest.runtime_bin_dir
        );

        log::info!("stage: pack payload");
        payload::pack_payload(&payload_root, &crate_dir.join("assets").join("payload.tar.gz"))
            .await?;

        log::info!("stage: synthesize launcher");
        let params = LauncherParams {
            target_os: self.request.target_os().identifier().to_string(),
            runtime_dir_name: self.request.jar_base_name(),
            jar_base_name: self.request.jar_base_name(),
            retry: self.request.retry_policy(),
        };
        launcher::synthesize(&params, &crate_dir).await?;

        if let Some(generator) = generator {
            log::info!("stage: binding generation");
            generator.generate(self.request.jar_path(), &crate_dir.join("src"))?;
        }

        log::info!("stage: build launcher");
        let built = build::build_launcher(&self.request, &crate_dir).await?;

        let out_name = format!(
            "{}{}",
            self.request.jar_base_name(),
            self.request.target_os().exe_suffix()
        );
        let out_path = self.request.output_dir().join(out_name);
        utils::fs::copy_file(&built, &out_path).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(0o755))
                .await
                .fs_context("setting artifact permissions", &out_path)?;
        }

        let metadata = tokio::fs::metadata(&out_path)
            .await
            .fs_context("reading artifact metadata", &out_path)?;
        let checksum = checksum::calculate_sha256(&out_path).await?;

        log::info!("stage: cleanup staging");
        utils::fs::remove_dir_all_idempotent(staging).await?;

        log::info!("✓ Created launcher: {}", out_path.display());

        Ok(PackagedArtifact {
            path: out_path,
            size: metadata.len(),
            checksum,
        })
    }
}
