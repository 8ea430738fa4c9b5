//! Immutable packaging request and target descriptors.
#![allow(dead_code)] // Public API - items may be used by external consumers

use crate::packager::error::{Error, Result};
use path_absolutize::Absolutize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Target operating system for the produced launcher.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum TargetOs {
    /// Linux (gnu userland)
    Linux,
    /// macOS / Darwin
    Macos,
    /// Windows
    Windows,
}

impl TargetOs {
    /// Operating system jarpack itself is running on.
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            TargetOs::Windows
        } else if cfg!(target_os = "macos") {
            TargetOs::Macos
        } else {
            TargetOs::Linux
        }
    }

    /// Platform identifier substituted into the launcher source.
    pub fn identifier(self) -> &'static str {
        match self {
            TargetOs::Linux => "linux",
            TargetOs::Macos => "macos",
            TargetOs::Windows => "windows",
        }
    }

    /// Executable suffix for binaries built for this target.
    pub fn exe_suffix(self) -> &'static str {
        match self {
            TargetOs::Windows => ".exe",
            _ => "",
        }
    }

    /// Name of the real Java launcher inside the runtime's bin directory.
    pub fn java_binary(self) -> &'static str {
        match self {
            TargetOs::Windows => "java.exe",
            _ => "java",
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Target CPU architecture for the produced launcher.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum TargetArch {
    /// x86_64 / AMD64
    Amd64,
    /// AArch64 / ARM64
    Arm64,
}

impl TargetArch {
    /// Architecture jarpack itself is running on.
    pub fn host() -> Self {
        if cfg!(target_arch = "aarch64") {
            TargetArch::Arm64
        } else {
            TargetArch::Amd64
        }
    }

    /// Architecture identifier used in diagnostics.
    pub fn identifier(self) -> &'static str {
        match self {
            TargetArch::Amd64 => "amd64",
            TargetArch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Bootstrap retry budget compiled into the launcher.
///
/// Selected at packaging time; see [`crate::packager::bootstrap`] for the
/// protocol the launcher instantiates.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum RetryPolicy {
    /// One unforced attempt, then exactly one forced retry.
    SingleShot,
    /// Retry with `force` armed; only a forced failure is fatal.
    Persistent,
}

impl RetryPolicy {
    /// Whether the launcher is rendered with the persistent loop.
    pub fn is_persistent(self) -> bool {
        matches!(self, RetryPolicy::Persistent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::SingleShot
    }
}

impl fmt::Display for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryPolicy::SingleShot => f.write_str("single-shot"),
            RetryPolicy::Persistent => f.write_str("persistent"),
        }
    }
}

/// Immutable input to one packaging run.
///
/// Constructed via [`BundleRequestBuilder`]; all paths are absolutized at
/// build time so later stages can change directories freely.
#[derive(Clone, Debug)]
pub struct BundleRequest {
    /// Jar to bundle.
    jar_path: PathBuf,

    /// JDK/JRE distribution archive.
    runtime_archive: PathBuf,

    /// Where the produced launcher lands.
    output_dir: PathBuf,

    /// Working directory owned exclusively by this run.
    staging_dir: PathBuf,

    /// Target operating system.
    target_os: TargetOs,

    /// Target architecture.
    target_arch: TargetArch,

    /// Remove the output directory before packaging.
    clean: bool,

    /// Bootstrap retry budget compiled into the launcher.
    retry: RetryPolicy,
}

impl BundleRequest {
    /// Returns a builder for constructing a request.
    pub fn builder() -> BundleRequestBuilder {
        BundleRequestBuilder::default()
    }

    /// Jar file to bundle.
    pub fn jar_path(&self) -> &Path {
        &self.jar_path
    }

    /// Runtime distribution archive.
    pub fn runtime_archive(&self) -> &Path {
        &self.runtime_archive
    }

    /// Output directory for the produced launcher.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Staging tree for this run.
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Target operating system.
    pub fn target_os(&self) -> TargetOs {
        self.target_os
    }

    /// Target architecture.
    pub fn target_arch(&self) -> TargetArch {
        self.target_arch
    }

    /// Whether the output directory is removed first.
    pub fn clean(&self) -> bool {
        self.clean
    }

    /// Retry budget for the launcher's bootstrap protocol.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Jar file name, e.g. `app-1.0.jar`.
    pub fn jar_file_name(&self) -> String {
        self.jar_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.jar")
            .to_string()
    }

    /// Jar base name with the extension stripped, e.g. `app-1.0`.
    pub fn jar_base_name(&self) -> String {
        self.jar_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("app")
            .to_string()
    }

    /// Crate name for the generated launcher.
    ///
    /// Cargo package names cannot contain dots or start with a digit, so
    /// `app-1.0` becomes `app-1-0`.
    pub fn launcher_crate_name(&self) -> String {
        let mut name: String = self
            .jar_base_name()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '-'
                }
            })
            .collect();

        if !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
        {
            name = format!("app-{name}");
        }

        name.to_ascii_lowercase()
    }

    /// Rust target triple for the requested OS/architecture pair.
    pub fn rust_triple(&self) -> &'static str {
        match (self.target_os, self.target_arch) {
            (TargetOs::Linux, TargetArch::Amd64) => "x86_64-unknown-linux-gnu",
            (TargetOs::Linux, TargetArch::Arm64) => "aarch64-unknown-linux-gnu",
            (TargetOs::Macos, TargetArch::Amd64) => "x86_64-apple-darwin",
            (TargetOs::Macos, TargetArch::Arm64) => "aarch64-apple-darwin",
            (TargetOs::Windows, TargetArch::Amd64) => "x86_64-pc-windows-gnu",
            (TargetOs::Windows, TargetArch::Arm64) => "aarch64-pc-windows-msvc",
        }
    }

    /// Require the jar and runtime archive to be existing regular files.
    ///
    /// Runs before pruning begins; no partial work happens on bad input.
    pub fn validate(&self) -> Result<()> {
        for path in [&self.jar_path, &self.runtime_archive] {
            if !path.is_file() {
                return Err(Error::InputNotFound { path: path.clone() });
            }
        }
        Ok(())
    }
}

/// Builder for constructing [`BundleRequest`].
#[derive(Default)]
pub struct BundleRequestBuilder {
    jar: Option<PathBuf>,
    runtime_archive: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    staging_dir: Option<PathBuf>,
    target_os: Option<TargetOs>,
    target_arch: Option<TargetArch>,
    clean: bool,
    retry: RetryPolicy,
}

impl BundleRequestBuilder {
    /// Creates a new request builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the jar to bundle.
    ///
    /// # Required
    pub fn jar<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.jar = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the runtime distribution archive.
    ///
    /// # Required
    pub fn runtime_archive<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.runtime_archive = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory.
    ///
    /// Default: `dist`
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the staging directory.
    ///
    /// Default: a per-jar directory under the user cache dir.
    pub fn staging_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.staging_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the target OS/architecture pair.
    ///
    /// Default: the host pair.
    pub fn target(mut self, os: TargetOs, arch: TargetArch) -> Self {
        self.target_os = Some(os);
        self.target_arch = Some(arch);
        self
    }

    /// Removes the output directory before packaging.
    ///
    /// Default: false
    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Sets the bootstrap retry budget.
    ///
    /// Default: [`RetryPolicy::SingleShot`]
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Builds the request, absolutizing every path.
    pub fn build(self) -> Result<BundleRequest> {
        let jar = self
            .jar
            .ok_or_else(|| Error::Generic("jar path is required".into()))?;
        let runtime_archive = self
            .runtime_archive
            .ok_or_else(|| Error::Generic("runtime archive path is required".into()))?;

        let jar_path = jar.absolutize()?.into_owned();
        let runtime_archive = runtime_archive.absolutize()?.into_owned();

        let output_dir = self
            .output_dir
            .unwrap_or_else(|| PathBuf::from("dist"))
            .absolutize()?
            .into_owned();

        let staging_dir = match self.staging_dir {
            Some(dir) => dir.absolutize()?.into_owned(),
            None => {
                let base = jar_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("app");
                default_staging_root().join(format!("{base}-stage"))
            }
        };

        Ok(BundleRequest {
            jar_path,
            runtime_archive,
            output_dir,
            staging_dir,
            target_os: self.target_os.unwrap_or_else(TargetOs::host),
            target_arch: self.target_arch.unwrap_or_else(TargetArch::host),
            clean: self.clean,
            retry: self.retry,
        })
    }
}

/// Root for default staging trees.
fn default_staging_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("jarpack")
}
