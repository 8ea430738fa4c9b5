//! Launcher source synthesis.
//!
//! Renders the runner program from a fixed skeleton using Handlebars with
//! escaping disabled, after validating every substitution value. For
//! identical parameters the rendered source is byte-identical: no
//! timestamps or random identifiers are embedded.

mod template;

use crate::packager::error::{Error, ErrorExt, Result};
use crate::packager::request::RetryPolicy;
use handlebars::Handlebars;
use std::path::Path;

/// Dependencies the generated crate resolves before compiling.
///
/// `flate2` + `tar` unpack the embedded payload, `serde_json` reads the
/// runtime manifest, `dirs` supplies the per-user install root.
pub const LAUNCHER_DEPS: &[&str] = &["flate2@1", "tar@0.4", "serde_json@1", "dirs@6"];

/// Typed substitution record for the launcher skeleton.
///
/// The three name fields affect naming and path construction only; the
/// retry policy selects a constant. The bootstrap control flow itself is
/// fixed template text.
#[derive(Debug, Clone)]
pub struct LauncherParams {
    /// Target platform identifier (`linux`, `macos`, `windows`).
    pub target_os: String,

    /// Name of the bundle's subdirectory under the install root.
    pub runtime_dir_name: String,

    /// Jar base name with the extension stripped.
    pub jar_base_name: String,

    /// Retry budget compiled into the launcher.
    pub retry: RetryPolicy,
}

impl LauncherParams {
    /// Reject values that would corrupt the rendered source: embedded
    /// quotes, path separators, control characters, or emptiness.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("target_os", &self.target_os),
            ("runtime_dir_name", &self.runtime_dir_name),
            ("jar_base_name", &self.jar_base_name),
        ];

        for (field, value) in fields {
            let bad = value.is_empty()
                || value
                    .chars()
                    .any(|c| matches!(c, '"' | '\'' | '\\' | '/' | '{' | '}') || c.is_control());
            if bad {
                return Err(Error::InvalidSubstitution {
                    field,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Render the launcher program text.
pub fn render(params: &LauncherParams) -> Result<String> {
    params.validate()?;

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .register_template_string("launcher", template::LAUNCHER_TEMPLATE)
        .map_err(|e| Error::Template(format!("failed to register launcher template: {e}")))?;

    let data = serde_json::json!({
        "target_os": params.target_os,
        "runtime_dir": params.runtime_dir_name,
        "jar_base": params.jar_base_name,
        "persistent_retry": params.retry.is_persistent(),
    });

    handlebars
        .render("launcher", &data)
        .map_err(|e| Error::Template(format!("failed to render launcher source: {e}")))
}

/// Render and write the generated crate's `src/main.rs`.
pub async fn synthesize(params: &LauncherParams, crate_dir: &Path) -> Result<()> {
    let source = render(params)?;

    let src_dir = crate_dir.join("src");
    tokio::fs::create_dir_all(&src_dir)
        .await
        .fs_context("creating launcher source directory", &src_dir)?;

    let main_rs = src_dir.join("main.rs");
    tokio::fs::write(&main_rs, source)
        .await
        .fs_context("writing launcher source", &main_rs)?;

    log::debug!("synthesized launcher source at {}", main_rs.display());
    Ok(())
}
