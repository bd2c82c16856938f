//! Error types for the bundle assembly tools.
//!
//! Errors carry actionable messages and, where one exists, a recovery
//! suggestion printed after the fatal error line.

use crate::bundler::Error as BundlerError;
use thiserror::Error;

/// Result type alias for bundle assembly tools
pub type Result<T> = std::result::Result<T, AssemblerError>;

/// Main error type of the command line tools
#[derive(Error, Debug)]
pub enum AssemblerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Bundle assembly errors
    #[error("{0}")]
    Bundler(#[from] BundlerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

impl AssemblerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            AssemblerError::Bundler(BundlerError::ExecutableNotFound { path }) => vec![
                format!("Build the executable first; expected it at {}", path.display()),
                "Pass the executable path relative to the current directory or absolute"
                    .to_string(),
            ],
            AssemblerError::Bundler(BundlerError::ExecutableNotAFile { path }) => vec![format!(
                "{} is a directory; pass the compiled binary inside it",
                path.display()
            )],
            AssemblerError::Bundler(BundlerError::BundleOverwritesExecutable { .. }) => vec![
                "Pass --output-dir to create the bundle somewhere else".to_string(),
                "Rename the executable or choose a different bundle extension".to_string(),
            ],
            AssemblerError::Bundler(BundlerError::InvalidSignature(_)) => vec![
                "Use exactly four ASCII characters, e.g. --signature ABCD".to_string(),
                "Omit --signature to use the default '????'".to_string(),
            ],
            AssemblerError::Bundler(e) if e.is_template_error() => vec![
                "Check the manifest template for unknown or misspelled placeholders".to_string(),
                "Pass --lenient-manifest to write an empty manifest and continue".to_string(),
            ],
            AssemblerError::Cli(_) => vec!["Run with --help to see the usage".to_string()],
            _ => vec![],
        }
    }
}
