//! Resource classification and copying.
//!
//! Resource arguments are processed in the order given. Each is classified
//! by suffix and copied to the directory its class belongs in.

use super::{
    error::{Context, ErrorExt, Result},
    layout::BundleLayout,
    platform::{
        DYLIB_SUFFIX, ICON_SUFFIX,
        macos::dylib::{LoadPathRewriter, RewriteOutcome, rewrite_library_load_path},
    },
    settings::BundleDescriptor,
    utils::fs,
};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// How a resource argument is treated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResourceClass {
    /// `.dylib`: copied to `Contents/Libraries`, load path rewritten.
    DynamicLibrary,
    /// `.icns`: copied like a generic resource and recorded as the icon.
    Icon,
    /// Anything else, files and directories alike.
    Generic,
}

/// Classifies a resource argument by the suffix of its text.
///
/// The argument is matched as written: `.dylib` alone is a library and
/// `app.icns/` is not an icon.
pub fn classify(path: &Path) -> ResourceClass {
    let text = path.as_os_str().to_string_lossy();
    if text.ends_with(DYLIB_SUFFIX) {
        ResourceClass::DynamicLibrary
    } else if text.ends_with(ICON_SUFFIX) {
        ResourceClass::Icon
    } else {
        ResourceClass::Generic
    }
}

/// Resource arguments of `descriptor` that do not exist.
pub fn missing_resources(descriptor: &BundleDescriptor) -> Vec<&Path> {
    descriptor
        .resources()
        .iter()
        .map(PathBuf::as_path)
        .filter(|resource| !resource.exists())
        .collect()
}

/// What happened to the resource arguments of one run.
#[derive(Clone, Debug, Default)]
pub struct ResourceReport {
    /// Destinations of copied resources (icons included, libraries excluded).
    pub copied: Vec<PathBuf>,
    /// Destinations of copied dynamic libraries.
    pub libraries: Vec<PathBuf>,
    /// Arguments that did not exist and were skipped.
    pub missing: Vec<PathBuf>,
    /// Directories that contain the bundle itself and were skipped.
    pub enclosing: Vec<PathBuf>,
    /// Base name of the last icon argument.
    pub icon: Option<String>,
    /// Load-path rewrites requested for libraries.
    pub rewrites: Vec<RewriteOutcome>,
}

/// Copies every resource of `descriptor` into the bundle.
///
/// Missing resources are recorded in the report and skipped; they never
/// abort the run. So are directories that contain the bundle root, which
/// would otherwise be copied into themselves. Copy failures of existing
/// resources abort the run.
pub async fn copy_resources(
    descriptor: &BundleDescriptor,
    layout: &BundleLayout,
    rewriter: &dyn LoadPathRewriter,
) -> Result<ResourceReport> {
    let mut report = ResourceReport::default();
    let installed_executable = layout.installed_executable(descriptor);

    for resource in descriptor.resources() {
        if !resource.exists() {
            log::warn!("Could not find {}", resource.display());
            report.missing.push(resource.clone());
            continue;
        }

        let absolute = resource
            .absolutize()
            .fs_context("resolving absolute path", resource)?;
        if layout.root().starts_with(&absolute) {
            log::warn!(
                "Skipping {}: it contains the bundle {}",
                resource.display(),
                layout.root().display()
            );
            report.enclosing.push(resource.clone());
            continue;
        }

        let class = classify(resource);
        let dest_dir = match (class, layout.libraries_dir()) {
            (ResourceClass::DynamicLibrary, Some(libraries_dir)) => {
                report.rewrites.push(rewrite_library_load_path(
                    rewriter,
                    &installed_executable,
                    resource,
                ));
                libraries_dir
            }
            _ => layout.resources_dir(),
        };

        let dest = fs::copy_into(resource, dest_dir)
            .await
            .with_context(|| format!("failed to copy resource {}", resource.display()))?;
        log::debug!("Copied {} -> {}", resource.display(), dest.display());

        if class == ResourceClass::Icon {
            report.icon = resource
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
        }

        if class == ResourceClass::DynamicLibrary && layout.libraries_dir().is_some() {
            report.libraries.push(dest);
        } else {
            report.copied.push(dest);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_suffix() {
        assert_eq!(
            classify(Path::new("/opt/lib/libfoo.dylib")),
            ResourceClass::DynamicLibrary
        );
        assert_eq!(classify(Path::new("art/app.icns")), ResourceClass::Icon);
        assert_eq!(classify(Path::new("levels")), ResourceClass::Generic);
        assert_eq!(classify(Path::new("strings.txt")), ResourceClass::Generic);
        assert_eq!(classify(Path::new("libfoo.dylib.txt")), ResourceClass::Generic);
        assert_eq!(classify(Path::new("APP.ICNS")), ResourceClass::Generic);
    }

    #[test]
    fn test_classify_matches_argument_text() {
        assert_eq!(
            classify(Path::new(".dylib")),
            ResourceClass::DynamicLibrary
        );
        assert_eq!(classify(Path::new("deps/.icns")), ResourceClass::Icon);
        assert_eq!(classify(Path::new("art/app.icns/")), ResourceClass::Generic);
        assert_eq!(
            classify(Path::new("libfoo.dylib/")),
            ResourceClass::Generic
        );
    }
}
