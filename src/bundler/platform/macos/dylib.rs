//! Dynamic library load-path rewriting for macOS bundles.
//!
//! Libraries passed as resources are copied into `Contents/Libraries/` and
//! the installed executable is told to look for them there, relative to its
//! own location, instead of at the path the library had at build time.
//!
//! The rewrite itself is delegated to a [`LoadPathRewriter`]. The default
//! implementation, [`InstallNameTool`], runs:
//!
//! ```text
//! install_name_tool -change <original> @executable_path/../Libraries/<lib> <executable>
//! ```
//!
//! Rewriting is best-effort. Failures are reported as a [`RewriteStatus`]
//! and logged, never propagated as errors.

use crate::bundler::error::{Error, ErrorExt, Result};
use goblin::mach::{Mach, MachO};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Load-path prefix of libraries installed in `Contents/Libraries`.
pub const LIBRARIES_LOAD_PREFIX: &str = "@executable_path/../Libraries";

/// Result of one load-path rewrite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RewriteStatus {
    /// The rewrite ran and the old path is no longer referenced (or the
    /// executable could not be inspected).
    Rewritten,

    /// The rewrite ran but the executable still references the old path.
    ///
    /// Typical when the executable never linked against that exact path.
    StillReferenced,

    /// No rewriting tool available on this host.
    Skipped,

    /// The rewriting tool could not be run or exited unsuccessfully.
    Failed(String),
}

impl fmt::Display for RewriteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteStatus::Rewritten => write!(f, "rewritten"),
            RewriteStatus::StillReferenced => write!(f, "old path still referenced"),
            RewriteStatus::Skipped => write!(f, "skipped"),
            RewriteStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// One requested rewrite and what came of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Installed executable that was edited.
    pub executable: PathBuf,
    /// Library path as given on the command line.
    pub old_path: String,
    /// New, executable-relative load path.
    pub new_path: String,
    /// What happened.
    pub status: RewriteStatus,
}

/// Capability to change a dependency's load path inside an executable.
pub trait LoadPathRewriter: fmt::Debug + Send + Sync {
    /// Rewrites every reference to `old_path` in `executable` to `new_path`.
    fn rewrite(&self, executable: &Path, old_path: &str, new_path: &str) -> RewriteStatus;
}

/// [`LoadPathRewriter`] backed by Apple's `install_name_tool`.
#[derive(Clone, Debug, Default)]
pub struct InstallNameTool {
    tool: Option<PathBuf>,
}

impl InstallNameTool {
    /// Looks `install_name_tool` up on `PATH`.
    ///
    /// When it cannot be found every rewrite is [`RewriteStatus::Skipped`].
    pub fn locate() -> Self {
        match which::which("install_name_tool") {
            Ok(path) => {
                log::debug!("Found install_name_tool at: {}", path.display());
                Self { tool: Some(path) }
            }
            Err(e) => {
                log::debug!("install_name_tool not found in PATH: {}", e);
                Self { tool: None }
            }
        }
    }

    #[cfg(test)]
    fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            tool: Some(path.into()),
        }
    }

    #[cfg(test)]
    fn is_available(&self) -> bool {
        self.tool.is_some()
    }

    fn run(&self, tool: &Path, executable: &Path, old_path: &str, new_path: &str) -> Result<()> {
        let status = Command::new(tool)
            .arg("-change")
            .arg(old_path)
            .arg(new_path)
            .arg(executable)
            .status()
            .map_err(|error| Error::CommandFailed {
                command: tool.display().to_string(),
                error,
            })?;

        if !status.success() {
            return Err(Error::GenericError(format!(
                "install_name_tool exited with {} for {}: {} -> {}",
                status,
                executable.display(),
                old_path,
                new_path
            )));
        }
        Ok(())
    }
}

impl LoadPathRewriter for InstallNameTool {
    fn rewrite(&self, executable: &Path, old_path: &str, new_path: &str) -> RewriteStatus {
        let Some(tool) = self.tool.as_deref() else {
            log::warn!(
                "install_name_tool not available, leaving {} load path as {}",
                executable.display(),
                old_path
            );
            return RewriteStatus::Skipped;
        };

        log::debug!("  Rewriting: {} -> {}", old_path, new_path);

        if let Err(e) = self.run(tool, executable, old_path, new_path) {
            log::warn!("{}", e);
            return RewriteStatus::Failed(e.to_string());
        }

        match load_paths(executable) {
            Ok(Some(libs)) if libs.iter().any(|lib| lib == old_path) => {
                log::warn!(
                    "{} still references {} after rewrite",
                    executable.display(),
                    old_path
                );
                RewriteStatus::StillReferenced
            }
            Ok(_) => RewriteStatus::Rewritten,
            Err(e) => {
                log::debug!("could not inspect {}: {}", executable.display(), e);
                RewriteStatus::Rewritten
            }
        }
    }
}

/// Returns the bundle-relative load path for a library resource.
///
/// `None` when `library` has no file name.
pub fn bundled_load_path(library: &Path) -> Option<String> {
    library
        .file_name()
        .map(|name| format!("{}/{}", LIBRARIES_LOAD_PREFIX, name.to_string_lossy()))
}

/// Rewrites the executable's reference to `library` so it resolves inside
/// the bundle.
///
/// `library` is the path exactly as the caller supplied it; that string is
/// the search key for the rewrite.
pub fn rewrite_library_load_path(
    rewriter: &dyn LoadPathRewriter,
    executable: &Path,
    library: &Path,
) -> RewriteOutcome {
    let old_path = library.to_string_lossy().into_owned();
    let Some(new_path) = bundled_load_path(library) else {
        return RewriteOutcome {
            executable: executable.to_path_buf(),
            old_path,
            new_path: String::new(),
            status: RewriteStatus::Failed("library path has no file name".into()),
        };
    };

    let status = rewriter.rewrite(executable, &old_path, &new_path);
    log::info!(
        "Load path {} -> {} in {}: {}",
        old_path,
        new_path,
        executable.display(),
        status
    );

    RewriteOutcome {
        executable: executable.to_path_buf(),
        old_path,
        new_path,
        status,
    }
}

/// Lists the dylib load paths recorded in a Mach-O binary.
///
/// Returns `Ok(None)` when the file is not a Mach-O image. For universal
/// binaries the union over all architectures is returned.
pub fn load_paths(binary: &Path) -> Result<Option<Vec<String>>> {
    let buffer = std::fs::read(binary).fs_context("failed to read binary", binary)?;

    let mach = match goblin::Object::parse(&buffer) {
        Ok(goblin::Object::Mach(mach)) => mach,
        Ok(_) => return Ok(None),
        Err(e) => {
            log::debug!("{} is not a parseable binary: {}", binary.display(), e);
            return Ok(None);
        }
    };

    match mach {
        Mach::Binary(macho) => Ok(Some(libs_of(&macho))),
        Mach::Fat(fat) => {
            let mut libs: Vec<String> = Vec::new();
            for arch in fat.iter_arches() {
                let arch = arch?;
                let start = arch.offset as usize;
                let end = start + arch.size as usize;
                let slice = buffer.get(start..end).ok_or_else(|| {
                    Error::GenericError(format!(
                        "{}: architecture slice {}..{} out of bounds",
                        binary.display(),
                        start,
                        end
                    ))
                })?;
                let macho = MachO::parse(slice, 0)?;
                for lib in libs_of(&macho) {
                    if !libs.contains(&lib) {
                        libs.push(lib);
                    }
                }
            }
            Ok(Some(libs))
        }
    }
}

fn libs_of(macho: &MachO<'_>) -> Vec<String> {
    macho
        .libs
        .iter()
        .filter(|&&lib| lib != "self")
        .map(|lib| lib.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Mutex<Vec<(PathBuf, String, String)>>,
    }

    impl LoadPathRewriter for Recorder {
        fn rewrite(&self, executable: &Path, old_path: &str, new_path: &str) -> RewriteStatus {
            self.calls.lock().expect("lock").push((
                executable.to_path_buf(),
                old_path.to_string(),
                new_path.to_string(),
            ));
            RewriteStatus::Rewritten
        }
    }

    #[test]
    fn test_bundled_load_path() {
        assert_eq!(
            bundled_load_path(Path::new("/opt/lib/libfoo.dylib")).as_deref(),
            Some("@executable_path/../Libraries/libfoo.dylib")
        );
        assert_eq!(bundled_load_path(Path::new("/")), None);
    }

    #[test]
    fn test_rewrite_uses_caller_supplied_path_as_key() {
        let recorder = Recorder::default();
        let outcome = rewrite_library_load_path(
            &recorder,
            Path::new("/out/foo.app/Contents/MacOS/foo.elf"),
            Path::new("../deps/libbar.dylib"),
        );

        assert_eq!(outcome.old_path, "../deps/libbar.dylib");
        assert_eq!(outcome.new_path, "@executable_path/../Libraries/libbar.dylib");
        assert_eq!(outcome.status, RewriteStatus::Rewritten);

        let calls = recorder.calls.lock().expect("lock");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "../deps/libbar.dylib");
    }

    #[test]
    fn test_missing_tool_is_skipped() {
        let tool = InstallNameTool::default();
        assert!(!tool.is_available());
        assert_eq!(
            tool.rewrite(Path::new("/nowhere/foo"), "/a/lib.dylib", "@x/lib.dylib"),
            RewriteStatus::Skipped
        );
    }

    #[test]
    fn test_unrunnable_tool_is_failure() {
        let temp = TempDir::new().expect("temp dir");
        let tool = InstallNameTool::at(temp.path().join("no-such-tool"));
        let status = tool.rewrite(Path::new("/nowhere/foo"), "/a/lib.dylib", "@x/lib.dylib");
        assert!(matches!(status, RewriteStatus::Failed(_)));
    }

    #[test]
    fn test_load_paths_of_non_macho_is_none() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("script.sh");
        std::fs::write(&path, b"#!/bin/sh\necho hello from a script that is not mach-o\n")
            .expect("write");

        assert_eq!(load_paths(&path).expect("inspect"), None);
    }
}
