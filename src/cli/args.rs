//! Command line argument parsing and validation.
//!
//! All three tools share one argument set. The library-bundle tool reads
//! its bundle extension from the first argument after the executable.

use crate::bundler::{
    BundleKind, DEFAULT_SIGNATURE, DEFAULT_VERSION, DescriptorBuilder, RenderPolicy,
};
use clap::{CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Assemble an Apple application or component bundle from a compiled executable
#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Assemble an Apple application or component bundle from a compiled executable",
    long_about = "Assemble an Apple application or component bundle from a compiled executable.

Resources ending in .dylib are copied to Contents/Libraries and the executable's
load path is rewritten to @executable_path/../Libraries. The last .icns resource
becomes the bundle icon. Everything else is copied into the resources directory.

Any existing bundle at the destination is deleted first."
)]
pub struct Args {
    /// Package identifier, slash or dot separated (e.g. com/example/app)
    #[arg(index = 1, value_name = "PACKAGE")]
    pub package: Option<String>,

    /// Compiled executable to bundle
    #[arg(index = 2, value_name = "EXECUTABLE")]
    pub executable: Option<PathBuf>,

    /// Resource files and directories (library bundles: extension first)
    #[arg(index = 3, value_name = "RESOURCE", num_args = 0..)]
    pub rest: Vec<PathBuf>,

    /// CFBundleVersion
    #[arg(long, env = "BUNDLE_VERSION", default_value = DEFAULT_VERSION)]
    pub bundle_version: String,

    /// CFBundleShortVersionString
    #[arg(long, env = "BUNDLE_SHORT_VERSION", default_value = DEFAULT_VERSION)]
    pub short_version: String,

    /// Four-character CFBundleSignature creator code
    #[arg(long, env = "BUNDLE_SIGNATURE", default_value = DEFAULT_SIGNATURE)]
    pub signature: String,

    /// CFBundleGetInfoString
    #[arg(long, env = "BUNDLE_INFO_STRING")]
    pub info: Option<String>,

    /// NSHumanReadableCopyright (macOS applications)
    #[arg(long, env = "BUNDLE_COPYRIGHT")]
    pub copyright: Option<String>,

    /// NSMainNibFile [default: MainWindow (iOS), MainMenu (macOS)]
    #[arg(long, value_name = "NAME")]
    pub main_nib: Option<String>,

    /// Create the bundle in this directory instead of next to the executable
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Render Info.plist from this Handlebars template
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// On a manifest render error, write an empty Info.plist and continue
    #[arg(long)]
    pub lenient_manifest: bool,

    /// Print a JSON summary instead of text
    #[arg(long)]
    pub json: bool,

    /// Show rewrite details and per-resource destinations
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse the process arguments for the tool assembling `kind`.
    ///
    /// Exits the process on `--help`, `--version` and malformed options.
    pub fn parse_args(kind: BundleKind) -> Self {
        match Self::try_parse_args_from(kind, std::env::args_os()) {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Parse arguments for the tool assembling `kind`.
    pub fn try_parse_args_from<I, T>(kind: BundleKind, itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command()
            .name(kind.tool_name())
            .bin_name(kind.tool_name())
            .try_get_matches_from(itr)?;
        Self::from_arg_matches(&matches)
    }

    /// Whether too few positional arguments were given to do anything.
    pub fn is_usage_request(&self) -> bool {
        self.package.is_none() || self.executable.is_none()
    }

    /// Splits the trailing positionals into bundle extension and resources.
    pub fn extension_and_resources(&self, kind: BundleKind) -> (Option<String>, Vec<PathBuf>) {
        match kind {
            BundleKind::MacOsLibrary => match self.rest.split_first() {
                Some((extension, resources)) => (
                    Some(extension.to_string_lossy().into_owned()),
                    resources.to_vec(),
                ),
                None => (None, Vec::new()),
            },
            BundleKind::IosApp | BundleKind::MacOsApp => (None, self.rest.clone()),
        }
    }

    /// Maps the arguments onto a descriptor builder.
    ///
    /// `None` when [`is_usage_request`](Self::is_usage_request).
    pub fn descriptor_builder(&self, kind: BundleKind) -> Option<DescriptorBuilder> {
        let package = self.package.as_ref()?;
        let executable = self.executable.as_ref()?;
        let (extension, resources) = self.extension_and_resources(kind);

        let mut builder = DescriptorBuilder::new(kind)
            .package_identifier(package.clone())
            .executable(executable)
            .resources(resources)
            .version(self.bundle_version.clone())
            .short_version(self.short_version.clone())
            .signature(self.signature.clone());

        if let Some(extension) = extension {
            builder = builder.bundle_extension(extension);
        }
        if let Some(info) = &self.info {
            builder = builder.info(info.clone());
        }
        if let Some(copyright) = &self.copyright {
            builder = builder.copyright(copyright.clone());
        }
        if let Some(nib) = &self.main_nib {
            builder = builder.nib_file(nib.clone());
        }
        if let Some(dir) = &self.output_dir {
            builder = builder.output_directory(dir);
        }

        Some(builder)
    }

    /// Manifest render policy selected by `--lenient-manifest`.
    pub fn render_policy(&self) -> RenderPolicy {
        if self.lenient_manifest {
            RenderPolicy::Lenient
        } else {
            RenderPolicy::Strict
        }
    }
}

/// One-line usage text of the tool assembling `kind`.
pub fn usage(kind: BundleKind) -> String {
    match kind {
        BundleKind::MacOsLibrary => format!(
            "usage: {} <package> <executable> <extension> <data-files | icon-file...>",
            kind.tool_name()
        ),
        BundleKind::IosApp | BundleKind::MacOsApp => format!(
            "usage: {} <package> <executable> <data-files | icon-file...>",
            kind.tool_name()
        ),
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
    json: bool,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            output: super::OutputManager::new(verbose, json),
            json,
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Whether a JSON summary was requested
    pub fn is_json(&self) -> bool {
        self.json
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.verbose, args.json)
    }
}

impl RuntimeConfig {
    /// Print verbose message
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.output.is_verbose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(kind: BundleKind, argv: &[&str]) -> Args {
        let mut full = vec![kind.tool_name()];
        full.extend_from_slice(argv);
        Args::try_parse_args_from(kind, full).expect("parse")
    }

    #[test]
    fn test_too_few_positionals_is_usage() {
        assert!(parse(BundleKind::MacOsApp, &[]).is_usage_request());
        assert!(parse(BundleKind::MacOsApp, &["com/example"]).is_usage_request());
        assert!(!parse(BundleKind::MacOsApp, &["com/example", "foo.elf"]).is_usage_request());
        assert!(
            parse(BundleKind::MacOsApp, &["com/example"])
                .descriptor_builder(BundleKind::MacOsApp)
                .is_none()
        );
    }

    #[test]
    fn test_library_takes_extension_before_resources() {
        let args = parse(
            BundleKind::MacOsLibrary,
            &["com/example", "synth.so", ".component", "a.txt", "b.icns"],
        );
        let (extension, resources) = args.extension_and_resources(BundleKind::MacOsLibrary);
        assert_eq!(extension.as_deref(), Some(".component"));
        assert_eq!(
            resources,
            vec![PathBuf::from("a.txt"), PathBuf::from("b.icns")]
        );
    }

    #[test]
    fn test_app_treats_all_trailing_arguments_as_resources() {
        let args = parse(BundleKind::IosApp, &["com/example", "foo.elf", "a.txt", "b.icns"]);
        let (extension, resources) = args.extension_and_resources(BundleKind::IosApp);
        assert_eq!(extension, None);
        assert_eq!(resources.len(), 2);
    }

    #[test]
    fn test_options_and_defaults() {
        let args = parse(BundleKind::MacOsApp, &["com/example", "foo.elf"]);
        assert_eq!(args.bundle_version, "1.0");
        assert_eq!(args.signature, "????");
        assert_eq!(args.render_policy(), RenderPolicy::Strict);

        let args = parse(
            BundleKind::MacOsApp,
            &[
                "--bundle-version",
                "2.3",
                "--signature",
                "ABCD",
                "--lenient-manifest",
                "com/example",
                "foo.elf",
            ],
        );
        assert_eq!(args.bundle_version, "2.3");
        assert_eq!(args.signature, "ABCD");
        assert_eq!(args.render_policy(), RenderPolicy::Lenient);
    }

    #[test]
    fn test_usage_names_tool() {
        assert!(usage(BundleKind::IosApp).starts_with("usage: make-ios-bundle "));
        assert!(usage(BundleKind::MacOsLibrary).contains("<extension>"));
    }
}
