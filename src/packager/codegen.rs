//! Seam for the jar binding-generation collaborator.

use crate::packager::error::Result;
use std::path::Path;

/// Code-generation collaborator invoked with the jar path and the
/// generated crate's source directory before the build runs.
///
/// Implementations derive an API wrapper surface from the jar's class
/// signatures and deposit additional source files into `out_dir`. The
/// pipeline treats the collaborator as opaque; any error it returns
/// aborts the whole packaging run.
pub trait BindingGenerator {
    /// Deposit generated sources for `jar` into `out_dir`.
    fn generate(&self, jar: &Path, out_dir: &Path) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::error::Error;

    struct TouchGenerator;

    impl BindingGenerator for TouchGenerator {
        fn generate(&self, _jar: &Path, out_dir: &Path) -> Result<()> {
            std::fs::write(out_dir.join("bindings.rs"), b"// generated\n")?;
            Ok(())
        }
    }

    struct FailingGenerator;

    impl BindingGenerator for FailingGenerator {
        fn generate(&self, jar: &Path, _out_dir: &Path) -> Result<()> {
            Err(Error::Generic(format!("cannot read {}", jar.display())))
        }
    }

    #[test]
    fn generators_deposit_sources_into_the_output_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        TouchGenerator
            .generate(Path::new("app.jar"), dir.path())
            .expect("generation should succeed");
        assert!(dir.path().join("bindings.rs").is_file());
    }

    #[test]
    fn generator_failures_propagate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = FailingGenerator.generate(Path::new("app.jar"), dir.path());
        assert!(result.is_err());
    }
}
