//! Command line argument parsing and validation.
//!
//! This module provides the packaging command surface using clap,
//! with proper validation and error handling.

use crate::packager::{RetryPolicy, TargetArch, TargetOs};
use clap::Parser;
use std::path::PathBuf;

/// Self-installing native launchers for Java applications
#[derive(Parser, Debug)]
#[command(
    name = "jarpack",
    version,
    about = "Bundle a jar and a pruned Java runtime into one native launcher",
    long_about = "Packages a jar together with a pruned JDK/JRE distribution into a single \
native launcher binary that needs no Java install on the end user's machine.

The runtime archive is unpacked, pruned down to its bin/ and lib/ trees, staged beside \
the jar, and embedded into a synthesized launcher which is cross-compiled for the \
requested OS and architecture.

Usage:
  jarpack --jar app-1.0.jar --runtime jdk-17.tar.gz
  jarpack --jar app-1.0.jar --runtime jdk-17-win.zip --os windows --arch amd64 --out dist

Exit code 0 = launcher guaranteed to exist in the output directory."
)]
pub struct Args {
    /// Jar file to bundle
    #[arg(short, long, value_name = "JAR")]
    pub jar: PathBuf,

    /// JDK/JRE distribution archive (.tar.gz, .tgz, .tar or .zip)
    #[arg(short, long, value_name = "ARCHIVE")]
    pub runtime: PathBuf,

    /// Output directory for the produced launcher
    #[arg(short, long, value_name = "DIR", default_value = "dist")]
    pub out: PathBuf,

    /// Target operating system
    #[arg(long, value_enum, default_value_t = TargetOs::host())]
    pub os: TargetOs,

    /// Target architecture
    #[arg(long, value_enum, default_value_t = TargetArch::host())]
    pub arch: TargetArch,

    /// Remove the output directory before packaging
    #[arg(long)]
    pub clean: bool,

    /// Bootstrap retry policy compiled into the launcher
    #[arg(long, value_enum, default_value_t = RetryPolicy::SingleShot)]
    pub retry_policy: RetryPolicy,

    /// Log pipeline stages as they run
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments before any packaging work starts
    pub fn validate(&self) -> Result<(), String> {
        if !self.jar.is_file() {
            return Err(format!("jar file not found: {}", self.jar.display()));
        }

        if !self.runtime.is_file() {
            return Err(format!("runtime archive not found: {}", self.runtime.display()));
        }

        Ok(())
    }
}
