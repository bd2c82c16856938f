//! Bundle directory layout.
//!
//! Maps a [`BundleDescriptor`] to the directories and files a bundle of its
//! kind contains, and (re)creates that tree on disk.

use super::{
    error::{ErrorExt, Result},
    settings::BundleDescriptor,
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Paths making up one bundle on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleLayout {
    root: PathBuf,
    executable_dir: PathBuf,
    resources_dir: PathBuf,
    libraries_dir: Option<PathBuf>,
    manifest_path: PathBuf,
    pkginfo_path: Option<PathBuf>,
}

impl BundleLayout {
    /// Computes the layout for a descriptor. Touches nothing on disk.
    pub fn for_descriptor(descriptor: &BundleDescriptor) -> Self {
        let kind = descriptor.kind();
        let root = descriptor.bundle_path().to_path_buf();

        if !kind.has_contents_dir() {
            return Self {
                executable_dir: root.clone(),
                resources_dir: root.clone(),
                libraries_dir: None,
                manifest_path: root.join("Info.plist"),
                pkginfo_path: None,
                root,
            };
        }

        let contents = root.join("Contents");
        Self {
            executable_dir: contents.join("MacOS"),
            resources_dir: contents.join("Resources"),
            libraries_dir: kind
                .supports_libraries()
                .then(|| contents.join("Libraries")),
            manifest_path: contents.join("Info.plist"),
            pkginfo_path: kind.writes_pkginfo().then(|| contents.join("PkgInfo")),
            root,
        }
    }

    /// Bundle root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory the executable is installed into.
    pub fn executable_dir(&self) -> &Path {
        &self.executable_dir
    }

    /// Directory generic resources are copied into.
    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }

    /// Directory dynamic libraries are copied into, if the kind has one.
    pub fn libraries_dir(&self) -> Option<&Path> {
        self.libraries_dir.as_deref()
    }

    /// Location of `Info.plist`.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Location of the `PkgInfo` marker, if the kind writes one.
    pub fn pkginfo_path(&self) -> Option<&Path> {
        self.pkginfo_path.as_deref()
    }

    /// Path of the installed executable.
    pub fn installed_executable(&self, descriptor: &BundleDescriptor) -> PathBuf {
        self.executable_dir.join(descriptor.executable_name())
    }

    /// Directories that must exist before anything is copied, deduplicated.
    pub fn required_dirs(&self) -> Vec<&Path> {
        let mut dirs: Vec<&Path> = vec![&self.root];
        for dir in [
            Some(self.executable_dir.as_path()),
            Some(self.resources_dir.as_path()),
            self.libraries_dir.as_deref(),
        ]
        .into_iter()
        .flatten()
        {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    /// Removes whatever exists at the bundle root and creates the tree.
    ///
    /// Destructive: a previous bundle at the same path is deleted without
    /// backup. Any failure aborts; nothing is rolled back.
    pub async fn create(&self) -> Result<()> {
        if fs::remove_path(&self.root).await? {
            log::info!("Removed previous bundle at {}", self.root.display());
        }

        for dir in self.required_dirs() {
            tokio::fs::create_dir_all(dir)
                .await
                .fs_context("failed to create bundle directory", dir)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{BundleKind, DescriptorBuilder};
    use tempfile::TempDir;

    fn descriptor(temp: &TempDir, kind: BundleKind, exe: &str) -> BundleDescriptor {
        let exe = temp.path().join(exe);
        std::fs::write(&exe, b"binary").expect("write executable");
        DescriptorBuilder::new(kind)
            .package_identifier("com/example")
            .executable(exe)
            .bundle_extension("component")
            .build()
            .expect("descriptor")
    }

    #[test]
    fn test_ios_layout_is_flat() {
        let temp = TempDir::new().expect("temp dir");
        let layout = BundleLayout::for_descriptor(&descriptor(&temp, BundleKind::IosApp, "foo.elf"));
        let root = temp.path().join("foo.app");

        assert_eq!(layout.root(), root);
        assert_eq!(layout.executable_dir(), root);
        assert_eq!(layout.resources_dir(), root);
        assert_eq!(layout.libraries_dir(), None);
        assert_eq!(layout.manifest_path(), root.join("Info.plist"));
        assert_eq!(layout.required_dirs(), vec![root.as_path()]);
    }

    #[test]
    fn test_macos_app_layout() {
        let temp = TempDir::new().expect("temp dir");
        let layout =
            BundleLayout::for_descriptor(&descriptor(&temp, BundleKind::MacOsApp, "foo.elf"));
        let contents = temp.path().join("foo.app/Contents");

        assert_eq!(layout.executable_dir(), contents.join("MacOS"));
        assert_eq!(layout.resources_dir(), contents.join("Resources"));
        assert_eq!(layout.libraries_dir(), Some(contents.join("Libraries").as_path()));
        assert_eq!(layout.manifest_path(), contents.join("Info.plist"));
        assert_eq!(layout.pkginfo_path(), None);
        assert_eq!(layout.required_dirs().len(), 4);
    }

    #[test]
    fn test_library_layout_has_pkginfo() {
        let temp = TempDir::new().expect("temp dir");
        let layout =
            BundleLayout::for_descriptor(&descriptor(&temp, BundleKind::MacOsLibrary, "fx.so"));
        let contents = temp.path().join("fx.component/Contents");

        assert_eq!(layout.pkginfo_path(), Some(contents.join("PkgInfo").as_path()));
    }

    #[tokio::test]
    async fn test_create_removes_stale_content() {
        let temp = TempDir::new().expect("temp dir");
        let layout =
            BundleLayout::for_descriptor(&descriptor(&temp, BundleKind::MacOsApp, "foo.elf"));

        layout.create().await.expect("first create");
        let stale = layout.resources_dir().join("stale.txt");
        std::fs::write(&stale, b"old").expect("write stale");

        layout.create().await.expect("second create");
        assert!(!stale.exists());
        for dir in layout.required_dirs() {
            assert!(dir.is_dir(), "{} missing", dir.display());
        }
    }
}
