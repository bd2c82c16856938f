//! Command execution for the bundle assembly tools.

mod assemble;

use crate::bundler::BundleKind;
use crate::cli::{Args, RuntimeConfig, usage};
use crate::error::Result;

use assemble::execute_assemble;

pub use assemble::{BundleSummary, RewriteSummary};

/// Execute the tool assembling `kind` with parsed arguments.
///
/// Returns the process exit code. Too few positionals print the usage line
/// and succeed without touching the file system.
pub async fn execute_command(kind: BundleKind, args: Args) -> Result<i32> {
    let config = RuntimeConfig::from(&args);

    if args.is_usage_request() {
        let _ = config.output().raw(&usage(kind));
        return Ok(0);
    }

    execute_assemble(kind, &args, &config).await
}
