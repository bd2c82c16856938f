//! Platform-specific bundle kinds.
//!
//! Each entry point of the assembler produces exactly one kind of bundle.
//! The kind decides the directory layout, how the bundle name is derived
//! from the executable, which manifest template is rendered, and whether
//! dynamic libraries get their own directory and a load-path rewrite.
//!
//! | Kind | Layout | Manifest |
//! |------|--------|----------|
//! | [`IosApp`](BundleKind::IosApp) | flat `<name>.app/` | `Info.plist` |
//! | [`MacOsApp`](BundleKind::MacOsApp) | `Contents/{MacOS,Resources,Libraries}` | `Contents/Info.plist` |
//! | [`MacOsLibrary`](BundleKind::MacOsLibrary) | `Contents/{MacOS,Resources,Libraries}` | `Contents/Info.plist` + `Contents/PkgInfo` |

pub mod macos;

use std::fmt;

/// Suffix of dynamic libraries routed to `Contents/Libraries`.
pub const DYLIB_SUFFIX: &str = ".dylib";

/// Suffix of icon resources recorded as `CFBundleIconFile`.
pub const ICON_SUFFIX: &str = ".icns";

/// Suffix stripped from executables to name application bundles.
pub const APP_EXECUTABLE_SUFFIX: &str = ".elf";

/// Default extension for library bundles when the caller gives none.
pub const DEFAULT_LIBRARY_EXTENSION: &str = "bundle";

/// Supported bundle kinds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BundleKind {
    /// iOS application bundle (.app) with a flat layout.
    IosApp,

    /// macOS application bundle (.app).
    MacOsApp,

    /// macOS loadable component bundle (audio unit, plugin, ...).
    ///
    /// The bundle extension is supplied by the caller.
    MacOsLibrary,
}

impl BundleKind {
    /// Returns the short name for this kind, as used in logs and on the CLI.
    pub fn short_name(&self) -> &'static str {
        match self {
            BundleKind::IosApp => "ios-app",
            BundleKind::MacOsApp => "macos-app",
            BundleKind::MacOsLibrary => "macos-library",
        }
    }

    /// Name of the binary that assembles this kind.
    pub fn tool_name(&self) -> &'static str {
        match self {
            BundleKind::IosApp => "make-ios-bundle",
            BundleKind::MacOsApp => "make-macos-app-bundle",
            BundleKind::MacOsLibrary => "make-macos-library-bundle",
        }
    }

    /// Whether the bundle nests its content under `Contents/`.
    pub fn has_contents_dir(&self) -> bool {
        !matches!(self, BundleKind::IosApp)
    }

    /// Whether `.dylib` resources go to `Contents/Libraries` and get their
    /// load path rewritten in the executable.
    pub fn supports_libraries(&self) -> bool {
        self.has_contents_dir()
    }

    /// Whether the bundle identifier is suffixed with the bundle name.
    pub fn is_application(&self) -> bool {
        !matches!(self, BundleKind::MacOsLibrary)
    }

    /// `CFBundlePackageType` four-character code.
    pub fn package_type(&self) -> &'static str {
        match self {
            BundleKind::IosApp | BundleKind::MacOsApp => "APPL",
            BundleKind::MacOsLibrary => "BNDL",
        }
    }

    /// Whether a `PkgInfo` type-code marker is written next to the manifest.
    pub fn writes_pkginfo(&self) -> bool {
        matches!(self, BundleKind::MacOsLibrary)
    }

    /// Default `NSMainNibFile` value.
    pub fn default_nib_file(&self) -> &'static str {
        match self {
            BundleKind::IosApp => "MainWindow",
            BundleKind::MacOsApp => "MainMenu",
            BundleKind::MacOsLibrary => "",
        }
    }

    /// Fixed bundle extension, `None` when the caller chooses it.
    pub fn fixed_extension(&self) -> Option<&'static str> {
        match self {
            BundleKind::IosApp | BundleKind::MacOsApp => Some("app"),
            BundleKind::MacOsLibrary => None,
        }
    }
}

impl fmt::Display for BundleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_short_name() {
        assert_eq!(BundleKind::IosApp.to_string(), "ios-app");
        assert_eq!(BundleKind::MacOsLibrary.to_string(), "macos-library");
    }

    #[test]
    fn test_only_macos_kinds_get_libraries() {
        assert!(!BundleKind::IosApp.supports_libraries());
        assert!(BundleKind::MacOsApp.supports_libraries());
        assert!(BundleKind::MacOsLibrary.supports_libraries());
    }

    #[test]
    fn test_package_types() {
        assert_eq!(BundleKind::IosApp.package_type(), "APPL");
        assert_eq!(BundleKind::MacOsApp.package_type(), "APPL");
        assert_eq!(BundleKind::MacOsLibrary.package_type(), "BNDL");
        assert!(BundleKind::MacOsLibrary.writes_pkginfo());
        assert!(!BundleKind::MacOsApp.writes_pkginfo());
    }
}
