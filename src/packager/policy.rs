//! Retention rules deciding which runtime files survive pruning.

use crate::packager::error::Result;
use glob::{MatchOptions, Pattern};
use std::path::Path;

/// Path-matching rule for the unpacked runtime tree.
///
/// A path relative to the runtime root is retained when any pattern
/// matches it. Directories additionally survive as ancestors of retained
/// files; that logic lives in the pruner, keeping the policy itself a pure
/// predicate over relative paths.
#[derive(Clone, Debug)]
pub struct RetentionPolicy {
    patterns: Vec<Pattern>,
}

impl RetentionPolicy {
    /// Rule that keeps the runtime's `bin` and `lib` trees wherever the
    /// vendor layout puts them: at the archive root or nested one level
    /// below a release root directory (`jdk-17.0.2/bin/java`).
    ///
    /// Everything else in a distribution (docs, sources, demo code) is
    /// pruned.
    pub fn runtime_default() -> Self {
        Self::from_patterns([
            "bin", "bin/**", "lib", "lib/**", "*/bin", "*/bin/**", "*/lib", "*/lib/**",
        ])
        .expect("built-in retention patterns are well-formed")
    }

    /// Compiles a pattern set. A malformed pattern is a configuration
    /// defect and fails the whole packaging run.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, glob::PatternError>>()?;
        Ok(Self { patterns })
    }

    /// Whether a path relative to the runtime root survives pruning.
    pub fn is_retained(&self, rel: &Path) -> bool {
        let options = match_options();
        self.patterns
            .iter()
            .any(|p| p.matches_path_with(rel, options))
    }
}

/// `*` must not cross separators; `**` still does.
fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn root_level_bin_and_lib_are_retained() {
        let policy = RetentionPolicy::runtime_default();
        assert!(policy.is_retained(Path::new("bin")));
        assert!(policy.is_retained(Path::new("bin/java")));
        assert!(policy.is_retained(Path::new("lib/libjvm.so")));
        assert!(policy.is_retained(Path::new("lib/server/libjava.so")));
    }

    #[test]
    fn vendor_root_layouts_are_retained() {
        let policy = RetentionPolicy::runtime_default();
        assert!(policy.is_retained(Path::new("jdk-17.0.2/bin/java")));
        assert!(policy.is_retained(Path::new("jdk-17.0.2/lib/server/libjvm.so")));
    }

    #[test]
    fn docs_and_sources_are_pruned() {
        let policy = RetentionPolicy::runtime_default();
        assert!(!policy.is_retained(Path::new("man/man1/java.1")));
        assert!(!policy.is_retained(Path::new("src.zip")));
        assert!(!policy.is_retained(Path::new("jdk-17.0.2/release")));
        assert!(!policy.is_retained(Path::new("jdk-17.0.2/demo/applets/readme.txt")));
    }

    #[test]
    fn bin_must_be_a_path_component() {
        let policy = RetentionPolicy::runtime_default();
        // `*` must not reach across separators into deeper trees.
        assert!(!policy.is_retained(Path::new("docs/api/bin.html")));
        assert!(!policy.is_retained(Path::new("a/b/c/bin/java")));
    }

    #[test]
    fn malformed_patterns_are_a_fatal_config_error() {
        assert!(RetentionPolicy::from_patterns(["["]).is_err());
    }
}
