//! jarpack - self-installing native launchers for Java applications.
//!
//! This binary packages a jar together with a pruned Java runtime into a
//! single native launcher that installs its own runtime on first use.

mod cli;
mod error;
mod packager;

use std::process;

#[tokio::main]
async fn main() {
    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
