//! macOS-specific bundling support.
//!
//! # Build Requirements
//!
//! | Step | Required Tools | Notes |
//! |------|----------------|-------|
//! | Load-path rewrite | `install_name_tool` | Xcode Command Line Tools |
//!
//! When `install_name_tool` is not on `PATH` the rewrite is skipped with a
//! warning and the bundle is still produced.

pub mod dylib;
