//! Application and component bundle assembly for Apple platforms.
//!
//! This module turns a compiled executable plus a list of resources into a
//! bundle directory: an iOS application (`.app`, flat), a macOS application
//! (`.app` with `Contents/`), or a macOS loadable component (audio unit,
//! plugin, or any caller-chosen extension).
//!
//! # Pipeline
//!
//! | Step | Module |
//! |------|--------|
//! | Resolve names, identifier and paths | [`DescriptorBuilder`] |
//! | Compute and create the directory tree | [`BundleLayout`] |
//! | Copy resources, route libraries, pick the icon | [`resources`] |
//! | Rewrite library load paths | [`LoadPathRewriter`] |
//! | Render `Info.plist` / `PkgInfo` | [`manifest`] |
//! | Run the steps in order | [`Assembler`] |
//!
//! ```no_run
//! use bundle_assembler::bundler::{Assembler, BundleKind, DescriptorBuilder};
//!
//! # async fn example() -> bundle_assembler::bundler::Result<()> {
//! let descriptor = DescriptorBuilder::new(BundleKind::MacOsLibrary)
//!     .package_identifier("com/example/synth")
//!     .executable("build/synth.so")
//!     .bundle_extension("component")
//!     .build()?;
//!
//! let bundle = Assembler::new(descriptor).assemble().await?;
//! assert!(bundle.pkginfo.is_some());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
mod error;
mod layout;
pub mod manifest;
pub(crate) mod platform;
pub mod resources;
mod settings;
mod utils;

// Public re-exports
pub use builder::{AssembledBundle, Assembler};
pub use error::{Context, Error, ErrorExt, Result};
pub use layout::BundleLayout;
pub use manifest::{ManifestFields, RenderPolicy};
pub use platform::{
    BundleKind,
    macos::dylib::{
        InstallNameTool, LIBRARIES_LOAD_PREFIX, LoadPathRewriter, RewriteOutcome, RewriteStatus,
        load_paths,
    },
};
pub use resources::{ResourceClass, ResourceReport};
pub use settings::{BundleDescriptor, DEFAULT_SIGNATURE, DEFAULT_VERSION, DescriptorBuilder};
