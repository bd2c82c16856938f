//! # Bundle Assembler
//!
//! Turns a compiled executable plus data files into an Apple bundle
//! directory: an iOS application, a macOS application, or a macOS loadable
//! component (audio unit, plugin).
//!
//! ## Features
//!
//! - **Per-kind layouts**: flat iOS `.app`, `Contents/`-based macOS bundles
//! - **Resource routing**: `.dylib` to `Contents/Libraries`, `.icns` as icon
//! - **Load-path rewriting**: `install_name_tool` behind a swappable trait
//! - **Escaped manifests**: `Info.plist` rendered with strict Handlebars
//! - **Idempotent**: re-running replaces the previous bundle entirely
//!
//! ## Usage
//!
//! ```bash
//! make-ios-bundle com/example/game build/game.elf Default.png game.icns
//! make-macos-app-bundle com/example/game build/game.elf levels libfmod.dylib
//! make-macos-library-bundle com/example/synth build/synth.so component
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export main types for public API
pub use bundler::{AssembledBundle, Assembler, BundleDescriptor, BundleKind, DescriptorBuilder};
pub use cli::Args;
pub use error::{AssemblerError, CliError, Result};
