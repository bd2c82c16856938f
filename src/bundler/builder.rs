//! Bundle assembly.
//!
//! [`Assembler`] runs the steps that turn a [`BundleDescriptor`] into a
//! bundle directory, in this order:
//!
//! 1. Remove any previous bundle and create the directory tree
//! 2. Install the executable (mode `0755`)
//! 3. Copy resources, rewriting library load paths
//! 4. Render and write `Info.plist` (and `PkgInfo` for library bundles)
//!
//! Steps run sequentially. The first fatal error aborts the run and leaves
//! whatever was already written in place.
//!
//! # Example
//!
//! ```no_run
//! use bundle_assembler::bundler::{Assembler, BundleKind, DescriptorBuilder};
//!
//! # async fn example() -> bundle_assembler::bundler::Result<()> {
//! let descriptor = DescriptorBuilder::new(BundleKind::MacOsApp)
//!     .package_identifier("com/example/game")
//!     .executable("build/game.elf")
//!     .resources(vec!["assets/game.icns".into(), "levels".into()])
//!     .build()?;
//!
//! let bundle = Assembler::new(descriptor).assemble().await?;
//! println!("Created {}", bundle.bundle_path.display());
//! # Ok(())
//! # }
//! ```

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    layout::BundleLayout,
    manifest::{self, ManifestFields, RenderPolicy},
    platform::{
        BundleKind,
        macos::dylib::{InstallNameTool, LoadPathRewriter},
    },
    resources::{self, ResourceReport},
    settings::BundleDescriptor,
    utils::fs,
};
use std::path::PathBuf;

/// A bundle written to disk.
#[derive(Debug)]
pub struct AssembledBundle {
    /// Kind of bundle produced.
    pub kind: BundleKind,

    /// Bundle root directory.
    pub bundle_path: PathBuf,

    /// Directory tree of the bundle.
    pub layout: BundleLayout,

    /// Installed executable.
    pub executable: PathBuf,

    /// Written `Info.plist`.
    pub manifest: PathBuf,

    /// Written `PkgInfo`, library bundles only.
    pub pkginfo: Option<PathBuf>,

    /// Resource handling details (missing files, icon, rewrites).
    pub resources: ResourceReport,

    /// Manifest render error tolerated under [`RenderPolicy::Lenient`].
    ///
    /// When set, `manifest` holds an empty file.
    pub manifest_error: Option<Error>,
}

impl AssembledBundle {
    /// Whether the manifest was rendered successfully.
    pub fn is_complete(&self) -> bool {
        self.manifest_error.is_none()
    }
}

/// Assembles one bundle from a descriptor.
#[derive(Debug)]
pub struct Assembler {
    descriptor: BundleDescriptor,
    rewriter: Box<dyn LoadPathRewriter>,
    policy: RenderPolicy,
    template: Option<PathBuf>,
}

impl Assembler {
    /// Creates an assembler using `install_name_tool` from `PATH` and the
    /// built-in manifest template of the descriptor's kind.
    pub fn new(descriptor: BundleDescriptor) -> Self {
        Self {
            descriptor,
            rewriter: Box::new(InstallNameTool::locate()),
            policy: RenderPolicy::default(),
            template: None,
        }
    }

    /// Replaces the load-path rewriter.
    pub fn with_rewriter(mut self, rewriter: Box<dyn LoadPathRewriter>) -> Self {
        self.rewriter = rewriter;
        self
    }

    /// Sets what happens when the manifest cannot be rendered.
    pub fn render_policy(mut self, policy: RenderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Renders `Info.plist` from a template file instead of the built-in one.
    pub fn template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = Some(path.into());
        self
    }

    /// Writes the bundle.
    pub async fn assemble(&self) -> Result<AssembledBundle> {
        let descriptor = &self.descriptor;
        let kind = descriptor.kind();
        log::info!(
            "Assembling {} bundle {}",
            kind,
            descriptor.bundle_path().display()
        );

        // Read the template first so a bad path fails before anything is removed.
        let template = match &self.template {
            Some(path) => manifest::load_template(path).await?,
            None => manifest::builtin_info_plist(kind).to_string(),
        };

        let layout = BundleLayout::for_descriptor(descriptor);
        layout.create().await?;

        let executable = layout.installed_executable(descriptor);
        fs::install_executable(descriptor.executable_path(), &executable).await?;
        log::debug!(
            "Installed {} -> {}",
            descriptor.executable_path().display(),
            executable.display()
        );

        let report = resources::copy_resources(descriptor, &layout, self.rewriter.as_ref()).await?;

        let fields = ManifestFields::from_descriptor(descriptor, report.icon.as_deref());
        let (plist, manifest_error) = manifest::apply_policy(
            self.policy,
            manifest::render_info_plist(&template, &fields),
        )?;
        tokio::fs::write(layout.manifest_path(), plist)
            .await
            .fs_context("failed to write manifest", layout.manifest_path())?;

        let pkginfo = match layout.pkginfo_path() {
            Some(path) => {
                let marker = manifest::render_pkginfo(&fields)?;
                tokio::fs::write(path, marker)
                    .await
                    .fs_context("failed to write PkgInfo", path)?;
                Some(path.to_path_buf())
            }
            None => None,
        };

        Ok(AssembledBundle {
            kind,
            bundle_path: layout.root().to_path_buf(),
            executable,
            manifest: layout.manifest_path().to_path_buf(),
            pkginfo,
            resources: report,
            manifest_error,
            layout,
        })
    }
}
