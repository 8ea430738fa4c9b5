//! Command line interface for jarpack.
//!
//! This module wires the parsed arguments into a [`BundleRequest`] and
//! drives the packaging pipeline, reporting the produced artifact.

mod args;

pub use args::Args;

use crate::error::{CliError, Result};
use crate::packager::{BundleRequest, Packager};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    init_logging(args.verbose);

    if let Err(reason) = args.validate() {
        return Err(CliError::InvalidArguments { reason }.into());
    }

    let request = BundleRequest::builder()
        .jar(&args.jar)
        .runtime_archive(&args.runtime)
        .output_dir(&args.out)
        .target(args.os, args.arch)
        .clean(args.clean)
        .retry_policy(args.retry_policy)
        .build()?;

    let packager = Packager::new(request).await?;
    let artifact = packager.package(None).await?;

    println!("{}", artifact.path.display());
    println!("sha256: {}", artifact.checksum);

    Ok(0)
}

/// Map --verbose onto the default log filter; RUST_LOG still wins.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .try_init();
}
