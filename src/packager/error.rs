//! Error types for the packaging pipeline.
//!
//! Every stage failure is fatal for the whole run; there is no
//! warn-and-continue mode anywhere in the pipeline.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for packaging operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for all packaging operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors without a better-typed context
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// IO errors annotated with the failing action and path
    #[error("{action} at {path}: {source}")]
    Fs {
        /// What the pipeline was doing
        action: String,
        /// Path the action was applied to
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    /// JSON errors from manifest handling
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Zip archive errors
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory walk errors
    #[error("directory walk error: {0}")]
    Walkdir(#[from] walkdir::Error),

    /// Relative-path computation errors
    #[error("path prefix error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Malformed retention pattern; a configuration defect, not transient
    #[error("malformed retention pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Launcher template registration or rendering failures
    #[error("template error: {0}")]
    Template(String),

    /// A required input file does not exist or is not a regular file
    #[error("input file not found: {path}")]
    InputNotFound {
        /// Path supplied by the request
        path: PathBuf,
    },

    /// Runtime archive with an extension no unarchiver claims
    #[error("unsupported runtime archive format: {path}")]
    UnsupportedArchive {
        /// Path of the offending archive
        path: PathBuf,
    },

    /// The pruned runtime tree contains no usable runtime
    #[error("no runtime entry point found under {root}")]
    EntryPointNotFound {
        /// Root of the searched tree
        root: PathBuf,
    },

    /// A launcher substitution value that would corrupt the rendered source
    #[error("invalid launcher substitution {field}: {value:?}")]
    InvalidSubstitution {
        /// Name of the substitution point
        field: &'static str,
        /// Rejected value
        value: String,
    },

    /// A build subprocess could not be spawned
    #[error("command failed to start: {command}: {source}")]
    CommandFailed {
        /// Command that failed
        command: String,
        /// Underlying IO error
        source: io::Error,
    },

    /// A build subprocess exited with a non-zero status
    #[error("command exited with status {code:?}: {command}")]
    CommandStatus {
        /// Command that failed
        command: String,
        /// Exit code, if any
        code: Option<i32>,
    },

    /// Generic errors
    #[error("{0}")]
    Generic(String),
}

/// Bail out of a packaging function with a formatted [`Error::Generic`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::packager::error::Error::Generic(format!($($arg)*)).into())
    };
}

/// Attach the failing action and path to raw IO results.
pub trait ErrorExt<T> {
    /// Convert an IO error into [`Error::Fs`] with context
    fn fs_context(self, action: &str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, action: &str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Fs {
            action: action.to_string(),
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Attach a message to errors or empty options.
pub trait Context<T> {
    /// Convert the failure into [`Error::Generic`] prefixed with `msg`
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| Error::Generic(format!("{msg}: {e}")))
    }
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| Error::Generic(msg.to_string()))
    }
}
