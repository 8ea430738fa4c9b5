//! The packaging pipeline: prune, stage, synthesize, build.
//!
//! # Overview
//!
//! One packaging run:
//! 1. Reads an immutable [`BundleRequest`]
//! 2. Unpacks the runtime archive and prunes it under a [`RetentionPolicy`]
//! 3. Stages the jar and records the runtime entry-point location
//! 4. Packs the staged tree into a compile-time payload
//! 5. Synthesizes the launcher source from a fixed skeleton
//! 6. Cross-compiles the launcher and moves it to the output directory
//!
//! # Module Organization
//!
//! - [`bootstrap`] - Retry protocol shared with the generated launcher
//! - [`build`] - cargo orchestration (init, dependency resolution, build)
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`codegen`] - Seam for the jar binding-generation collaborator
//! - [`extract`] - Archive extraction dispatch
//! - [`launcher`] - Launcher source synthesis
//! - [`payload`] - Deterministic payload packing
//! - [`pipeline`] - Main [`Packager`] struct and stage sequencing
//! - [`policy`] - Retention rules for runtime pruning
//! - [`prune`] - Two-pass runtime tree pruning
//! - [`request`] - [`BundleRequest`] and target descriptors
//! - [`stage`] - Jar staging and entry-point discovery

pub mod bootstrap;
pub mod build;
pub mod checksum;
pub mod codegen;
pub mod error;
pub mod extract;
pub mod launcher;
pub mod payload;
pub mod pipeline;
pub mod policy;
pub mod prune;
pub mod request;
pub mod stage;
mod utils;

// Re-export the main pipeline types
pub use codegen::BindingGenerator;
pub use error::{Error, Result};
pub use launcher::LauncherParams;
pub use pipeline::{PackagedArtifact, Packager};
pub use policy::RetentionPolicy;
pub use request::{BundleRequest, BundleRequestBuilder, RetryPolicy, TargetArch, TargetOs};
