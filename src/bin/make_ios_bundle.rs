//! Builds an iOS application bundle (.app) from a compiled executable.

use bundle_assembler::{bundler::BundleKind, cli};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    process::exit(cli::main(BundleKind::IosApp).await);
}
