//! Error types for bundle assembly.
//!
//! Provides contextual error chaining, filesystem errors that carry the
//! offending path, and the variants specific to bundle assembly (missing
//! executable, manifest rendering, load-path rewriting).
//!
//! # Features
//!
//! - **Context trait**: Add context to errors similar to anyhow
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **bail! macro**: Early return with formatted error messages
//!
//! # Example
//!
//! ```no_run
//! use bundle_assembler::bundler::{Context, ErrorExt, Result};
//! use std::path::Path;
//!
//! fn read_template(path: &Path) -> Result<String> {
//!     let contents = std::fs::read_to_string(path)
//!         .fs_context("reading manifest template", path)?;
//!
//!     if contents.trim().is_empty() {
//!         bundle_assembler::bail!("template {} is empty", path.display());
//!     }
//!
//!     Some(contents).context("template vanished")
//! }
//! ```

use std::{
    fmt::Display,
    io,
    path::{self, PathBuf},
};
use thiserror::Error as DeriveError;

/// Errors returned by the bundler.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "creating bundle root")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// The executable to package does not exist.
    #[error("File not found: {}", path.display())]
    ExecutableNotFound {
        /// Absolute path that was looked up
        path: PathBuf,
    },

    /// The executable path exists but is not a regular file.
    #[error("{} is not a regular file", path.display())]
    ExecutableNotAFile {
        /// Absolute path that was looked up
        path: PathBuf,
    },

    /// Bundle root would be removed along with the executable.
    #[error("bundle {} would replace the executable {}", bundle.display(), executable.display())]
    BundleOverwritesExecutable {
        /// Bundle root that would be re-created
        bundle: PathBuf,
        /// Executable inside it
        executable: PathBuf,
    },

    /// Manifest template could not be rendered.
    #[error("in {bundle}, an error rendering {template}: {reason}")]
    TemplateRender {
        /// Bundle name the manifest belongs to
        bundle: String,
        /// Template that failed (e.g., "Info.plist")
        template: String,
        /// Underlying cause
        reason: String,
    },

    /// Bundle signature is not a four-character code.
    #[error("bundle signature must be exactly four ASCII characters, got {0:?}")]
    InvalidSignature(String),

    /// Child process could not be spawned.
    #[error("failed to run command {command}: {error}")]
    CommandFailed {
        /// Command that failed to execute
        command: String,
        /// The underlying error
        error: io::Error,
    },

    /// Generic I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Error walking a resource directory.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripError(#[from] path::StripPrefixError),

    /// Binary parsing error (Mach-O inspection).
    #[error("binary parse error: {0}")]
    BinaryParseError(#[from] goblin::error::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Whether this error was raised by the manifest renderer.
    pub fn is_template_error(&self) -> bool {
        match self {
            Error::TemplateRender { .. } => true,
            Error::Context(_, inner) => inner.is_template_error(),
            _ => false,
        }
    }
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with the bundler's Error type.
/// Works with both `Result<T, E>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying binary".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_inner_error() {
        let result: Result<()> = Err(Error::GenericError("boom".into()));
        let err = result.context("copying resource").unwrap_err();
        assert_eq!(err.to_string(), "copying resource: boom");
    }

    #[test]
    fn test_option_context() {
        let value: Option<u8> = None;
        let err = value.context("no icon").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "no icon"));
    }

    #[test]
    fn test_fs_context_carries_path() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let result: std::result::Result<(), io::Error> = Err(io_err);
        let err = result
            .fs_context("creating bundle root", "/tmp/foo.app")
            .unwrap_err();
        assert_eq!(err.to_string(), "creating bundle root /tmp/foo.app: denied");
    }

    #[test]
    fn test_template_error_detection_through_context() {
        let err = Error::Context(
            "writing manifest".into(),
            Box::new(Error::TemplateRender {
                bundle: "foo".into(),
                template: "Info.plist".into(),
                reason: "missing field".into(),
            }),
        );
        assert!(err.is_template_error());
        assert!(!Error::GenericError("x".into()).is_template_error());
    }

    #[test]
    fn test_executable_not_found_message() {
        let err = Error::ExecutableNotFound {
            path: PathBuf::from("/build/foo.elf"),
        };
        assert_eq!(err.to_string(), "File not found: /build/foo.elf");
    }
}
