//! Command line interface shared by the bundle assembly tools.
//!
//! Each binary calls [`main`] with the bundle kind it produces.

mod args;
pub mod commands;
mod output;

pub use args::{Args, RuntimeConfig, usage};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::bundler::BundleKind;
use crate::error::Result;

/// CLI entry point for the tool assembling `kind`
pub async fn run(kind: BundleKind) -> Result<i32> {
    let args = Args::parse_args(kind);
    execute_command(kind, args).await
}

/// Runs the tool and reports fatal errors, returning the exit code.
pub async fn main(kind: BundleKind) -> i32 {
    match run(kind).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            // Never quiet for fatal errors
            let output = OutputManager::new(false, false);
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&suggestion);
                }
            }

            1
        }
    }
}
