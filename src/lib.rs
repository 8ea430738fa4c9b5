//! Self-installing native launcher bundler for Java applications.
//!
//! This library provides the core packaging pipeline:
//! - Runtime pruning (unpack a JDK/JRE archive, keep only `bin`/`lib`)
//! - Resource staging (jar placement, runtime entry-point discovery)
//! - Launcher synthesis (a templated runner implementing the bootstrap
//!   protocol, with the runtime embedded as a compressed payload)
//! - Build orchestration (cross-compiling the launcher for a target)
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod packager;

// Re-export commonly used types
pub use error::{CliError, JarpackError, Result};
