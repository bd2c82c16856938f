//! Bundle descriptor and its builder.
//!
//! A [`BundleDescriptor`] is built once per invocation from command line
//! arguments and passed by reference to every assembly step. It is never
//! mutated after [`DescriptorBuilder::build`] returns.

use super::error::{Context, Error, ErrorExt, Result};
use super::platform::{APP_EXECUTABLE_SUFFIX, BundleKind, DEFAULT_LIBRARY_EXTENSION};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Default `CFBundleVersion` / `CFBundleShortVersionString`.
pub const DEFAULT_VERSION: &str = "1.0";

/// Default `CFBundleSignature`.
pub const DEFAULT_SIGNATURE: &str = "????";

/// Everything the assembler needs to know about one bundle.
///
/// # Examples
///
/// ```no_run
/// use bundle_assembler::bundler::{BundleKind, DescriptorBuilder};
///
/// # fn example() -> bundle_assembler::bundler::Result<()> {
/// let descriptor = DescriptorBuilder::new(BundleKind::MacOsApp)
///     .package_identifier("com/example/app")
///     .executable("build/foo.elf")
///     .resources(vec!["assets/foo.icns".into()])
///     .build()?;
///
/// assert_eq!(descriptor.bundle_name(), "foo");
/// assert_eq!(descriptor.bundle_identifier(), "com.example.app.foo");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BundleDescriptor {
    kind: BundleKind,
    package_identifier: String,
    executable_path: PathBuf,
    executable_name: String,
    bundle_name: String,
    bundle_path: PathBuf,
    resources: Vec<PathBuf>,
    version: String,
    short_version: String,
    signature: String,
    info: String,
    copyright: String,
    nib_file: String,
}

impl BundleDescriptor {
    /// Returns the bundle kind.
    pub fn kind(&self) -> BundleKind {
        self.kind
    }

    /// Returns the package identifier as given on the command line.
    pub fn package_identifier(&self) -> &str {
        &self.package_identifier
    }

    /// Returns the absolute path of the source executable.
    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    /// Returns the executable's file name, as installed in the bundle.
    pub fn executable_name(&self) -> &str {
        &self.executable_name
    }

    /// Returns the bundle name (executable name without its suffix).
    pub fn bundle_name(&self) -> &str {
        &self.bundle_name
    }

    /// Returns the bundle root, e.g. `/build/foo.app`.
    pub fn bundle_path(&self) -> &Path {
        &self.bundle_path
    }

    /// Returns the resource arguments in the order given.
    pub fn resources(&self) -> &[PathBuf] {
        &self.resources
    }

    /// Returns the `CFBundleIdentifier` value.
    ///
    /// Path separators in the package identifier become dots; application
    /// bundles are additionally suffixed with the bundle name.
    pub fn bundle_identifier(&self) -> String {
        let base = self.package_identifier.replace('/', ".");
        if self.kind.is_application() {
            format!("{}.{}", base, self.bundle_name)
        } else {
            base
        }
    }

    /// Returns the `CFBundleVersion` value.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the `CFBundleShortVersionString` value.
    pub fn short_version(&self) -> &str {
        &self.short_version
    }

    /// Returns the four-character `CFBundleSignature`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Returns the `CFBundleGetInfoString` value.
    pub fn info(&self) -> &str {
        &self.info
    }

    /// Returns the `NSHumanReadableCopyright` value.
    pub fn copyright(&self) -> &str {
        &self.copyright
    }

    /// Returns the `NSMainNibFile` value.
    pub fn nib_file(&self) -> &str {
        &self.nib_file
    }
}

/// Builder for [`BundleDescriptor`].
///
/// Resolves the executable to an absolute path, checks that it exists and
/// derives the bundle name and root from it.
#[derive(Debug)]
pub struct DescriptorBuilder {
    kind: BundleKind,
    package_identifier: Option<String>,
    executable: Option<PathBuf>,
    bundle_extension: Option<String>,
    output_directory: Option<PathBuf>,
    resources: Vec<PathBuf>,
    version: Option<String>,
    short_version: Option<String>,
    signature: Option<String>,
    info: Option<String>,
    copyright: Option<String>,
    nib_file: Option<String>,
}

impl DescriptorBuilder {
    /// Creates a new builder for the given bundle kind.
    pub fn new(kind: BundleKind) -> Self {
        Self {
            kind,
            package_identifier: None,
            executable: None,
            bundle_extension: None,
            output_directory: None,
            resources: Vec::new(),
            version: None,
            short_version: None,
            signature: None,
            info: None,
            copyright: None,
            nib_file: None,
        }
    }

    /// Sets the package identifier, e.g. `com/example/app`.
    ///
    /// # Required
    pub fn package_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.package_identifier = Some(identifier.into());
        self
    }

    /// Sets the executable to package.
    ///
    /// # Required
    pub fn executable<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.executable = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the bundle extension (library bundles only).
    ///
    /// A leading dot is accepted. Ignored for application kinds.
    ///
    /// Default: `bundle`
    pub fn bundle_extension(mut self, extension: impl Into<String>) -> Self {
        self.bundle_extension = Some(extension.into());
        self
    }

    /// Places the bundle in `dir` instead of next to the executable.
    pub fn output_directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_directory = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets the resource arguments.
    pub fn resources(mut self, resources: Vec<PathBuf>) -> Self {
        self.resources = resources;
        self
    }

    /// Sets the bundle version. Default: `1.0`
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the short version string. Default: `1.0`
    pub fn short_version(mut self, version: impl Into<String>) -> Self {
        self.short_version = Some(version.into());
        self
    }

    /// Sets the four-character signature. Default: `????`
    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Sets the info string. Default: empty
    pub fn info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Sets the copyright notice. Default: empty
    pub fn copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    /// Sets the main interface file name.
    ///
    /// Default: [`BundleKind::default_nib_file`]
    pub fn nib_file(mut self, nib_file: impl Into<String>) -> Self {
        self.nib_file = Some(nib_file.into());
        self
    }

    /// Builds the descriptor.
    ///
    /// # Errors
    ///
    /// - package identifier or executable not set
    /// - [`Error::ExecutableNotFound`] if the executable does not exist
    /// - [`Error::ExecutableNotAFile`] if it is not a regular file
    /// - [`Error::BundleOverwritesExecutable`] if the bundle root is or contains the executable
    /// - [`Error::InvalidSignature`] if the signature is not four ASCII characters
    pub fn build(self) -> Result<BundleDescriptor> {
        let kind = self.kind;
        let package_identifier = self
            .package_identifier
            .context("package identifier is required")?;
        let executable = self.executable.context("executable path is required")?;

        let executable_path = absolute(&executable)?;
        if !executable_path.exists() {
            return Err(Error::ExecutableNotFound {
                path: executable_path,
            });
        }
        if !executable_path.is_file() {
            return Err(Error::ExecutableNotAFile {
                path: executable_path,
            });
        }

        let executable_name = executable_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", executable_path.display()))?;
        let bundle_name = derive_bundle_name(kind, &executable_name);

        let extension = match kind.fixed_extension() {
            Some(ext) => ext.to_string(),
            None => normalize_extension(self.bundle_extension.as_deref()),
        };

        let parent = match self.output_directory {
            Some(dir) => absolute(&dir)?,
            None => executable_path
                .parent()
                .map(Path::to_path_buf)
                .with_context(|| {
                    format!("{} has no parent directory", executable_path.display())
                })?,
        };
        let bundle_path = parent.join(format!("{}.{}", bundle_name, extension));
        // The bundle root is deleted before assembly.
        if executable_path.starts_with(&bundle_path) {
            return Err(Error::BundleOverwritesExecutable {
                bundle: bundle_path,
                executable: executable_path,
            });
        }

        let signature = self
            .signature
            .unwrap_or_else(|| DEFAULT_SIGNATURE.to_string());
        validate_signature(&signature)?;

        log::debug!(
            "Resolved {} bundle '{}' at {}",
            kind,
            bundle_name,
            bundle_path.display()
        );

        Ok(BundleDescriptor {
            kind,
            package_identifier,
            executable_path,
            executable_name,
            bundle_name,
            bundle_path,
            resources: self.resources,
            version: self.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            short_version: self
                .short_version
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            signature,
            info: self.info.unwrap_or_default(),
            copyright: self.copyright.unwrap_or_default(),
            nib_file: self
                .nib_file
                .unwrap_or_else(|| kind.default_nib_file().to_string()),
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(path
        .absolutize()
        .fs_context("resolving absolute path", path)?
        .into_owned())
}

/// Strips the kind's executable suffix from `executable_name`.
///
/// Application kinds only strip `.elf`; library bundles strip whatever
/// extension the executable has. A name that is nothing but the suffix is
/// kept as is.
fn derive_bundle_name(kind: BundleKind, executable_name: &str) -> String {
    let stripped = if kind.is_application() {
        executable_name.strip_suffix(APP_EXECUTABLE_SUFFIX)
    } else {
        Path::new(executable_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
    };

    match stripped {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => executable_name.to_string(),
    }
}

fn normalize_extension(extension: Option<&str>) -> String {
    match extension.map(|ext| ext.trim_start_matches('.')) {
        Some(ext) if !ext.is_empty() => ext.to_string(),
        _ => DEFAULT_LIBRARY_EXTENSION.to_string(),
    }
}

fn validate_signature(signature: &str) -> Result<()> {
    if signature.len() == 4 && signature.is_ascii() {
        Ok(())
    } else {
        Err(Error::InvalidSignature(signature.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"\x7fELF").expect("write executable");
        path
    }

    #[test]
    fn test_bundle_name_strips_elf_for_apps() {
        assert_eq!(derive_bundle_name(BundleKind::MacOsApp, "foo.elf"), "foo");
        assert_eq!(derive_bundle_name(BundleKind::IosApp, "foo.elf"), "foo");
        assert_eq!(derive_bundle_name(BundleKind::MacOsApp, "foo.bin"), "foo.bin");
        assert_eq!(derive_bundle_name(BundleKind::MacOsApp, ".elf"), ".elf");
    }

    #[test]
    fn test_bundle_name_strips_any_extension_for_libraries() {
        assert_eq!(derive_bundle_name(BundleKind::MacOsLibrary, "reverb.so"), "reverb");
        assert_eq!(derive_bundle_name(BundleKind::MacOsLibrary, "reverb"), "reverb");
    }

    #[test]
    fn test_extension_normalization() {
        assert_eq!(normalize_extension(Some(".component")), "component");
        assert_eq!(normalize_extension(Some("vst")), "vst");
        assert_eq!(normalize_extension(Some("")), "bundle");
        assert_eq!(normalize_extension(None), "bundle");
    }

    #[test]
    fn test_signature_validation() {
        assert!(validate_signature("????").is_ok());
        assert!(validate_signature("ABCD").is_ok());
        assert!(matches!(
            validate_signature("foo"),
            Err(Error::InvalidSignature(_))
        ));
        assert!(validate_signature("toolong").is_err());
    }

    #[test]
    fn test_app_identifier_and_root() {
        let temp = TempDir::new().expect("temp dir");
        let exe = touch(temp.path(), "foo.elf");

        let descriptor = DescriptorBuilder::new(BundleKind::MacOsApp)
            .package_identifier("com/example/app")
            .executable(&exe)
            .build()
            .expect("descriptor");

        assert_eq!(descriptor.bundle_identifier(), "com.example.app.foo");
        assert_eq!(descriptor.executable_name(), "foo.elf");
        assert_eq!(descriptor.bundle_path(), temp.path().join("foo.app"));
        assert_eq!(descriptor.signature(), "????");
        assert_eq!(descriptor.version(), "1.0");
        assert_eq!(descriptor.nib_file(), "MainMenu");
    }

    #[test]
    fn test_library_identifier_has_no_name_suffix() {
        let temp = TempDir::new().expect("temp dir");
        let exe = touch(temp.path(), "reverb.so");

        let descriptor = DescriptorBuilder::new(BundleKind::MacOsLibrary)
            .package_identifier("com/example/reverb")
            .executable(&exe)
            .bundle_extension(".component")
            .build()
            .expect("descriptor");

        assert_eq!(descriptor.bundle_identifier(), "com.example.reverb");
        assert_eq!(
            descriptor.bundle_path(),
            temp.path().join("reverb.component")
        );
    }

    #[test]
    fn test_output_directory_overrides_parent() {
        let temp = TempDir::new().expect("temp dir");
        let exe = touch(temp.path(), "foo.elf");
        let out = temp.path().join("OUTPUT");

        let descriptor = DescriptorBuilder::new(BundleKind::IosApp)
            .package_identifier("com/example")
            .executable(&exe)
            .output_directory(&out)
            .build()
            .expect("descriptor");

        assert_eq!(descriptor.bundle_path(), out.join("foo.app"));
        assert_eq!(descriptor.nib_file(), "MainWindow");
    }

    #[test]
    fn test_missing_executable_is_not_found() {
        let temp = TempDir::new().expect("temp dir");
        let result = DescriptorBuilder::new(BundleKind::MacOsApp)
            .package_identifier("com/example")
            .executable(temp.path().join("missing.elf"))
            .build();

        assert!(matches!(result, Err(Error::ExecutableNotFound { .. })));
    }

    #[test]
    fn test_bundle_root_equal_to_executable_is_rejected() {
        let temp = TempDir::new().expect("temp dir");
        let exe = touch(temp.path(), "synth.component");

        let result = DescriptorBuilder::new(BundleKind::MacOsLibrary)
            .package_identifier("com/example/synth")
            .executable(&exe)
            .bundle_extension("component")
            .build();

        assert!(matches!(
            result,
            Err(Error::BundleOverwritesExecutable { ref bundle, .. }) if bundle == &exe
        ));
        assert!(exe.is_file());
    }

    #[test]
    fn test_bundle_root_containing_executable_is_rejected() {
        let temp = TempDir::new().expect("temp dir");
        let inner = temp.path().join("foo.app");
        std::fs::create_dir(&inner).expect("create bundle dir");
        let exe = touch(&inner, "foo.elf");

        let result = DescriptorBuilder::new(BundleKind::IosApp)
            .package_identifier("com/example")
            .executable(&exe)
            .output_directory(temp.path())
            .build();

        assert!(matches!(
            result,
            Err(Error::BundleOverwritesExecutable { .. })
        ));
    }

    #[test]
    fn test_directory_executable_is_rejected() {
        let temp = TempDir::new().expect("temp dir");
        let result = DescriptorBuilder::new(BundleKind::MacOsApp)
            .package_identifier("com/example")
            .executable(temp.path())
            .build();

        assert!(matches!(result, Err(Error::ExecutableNotAFile { .. })));
    }
}
