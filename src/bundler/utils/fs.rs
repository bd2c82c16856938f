//! File system utilities for bundling.
//!
//! Provides file operations with automatic directory creation,
//! symlink preservation, and path-carrying errors.

use crate::bail;
use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Removes whatever exists at `path` (directory tree, file or symlink).
///
/// Returns `true` if something was removed.
pub async fn remove_path(path: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).fs_context("failed to inspect", path),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)
            .await
            .fs_context("failed to remove directory", path)?;
    } else {
        fs::remove_file(path)
            .await
            .fs_context("failed to remove file", path)?;
    }
    Ok(true)
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        bail!("{from:?} does not exist");
    }
    if !from.is_file() {
        bail!("{from:?} is not a file");
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("failed to create directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("failed to copy", from)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks on platforms that support them. Existing files at the
/// destination are overwritten.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        bail!("{from:?} does not exist");
    }
    if !from.is_dir() {
        bail!("{from:?} is not a Directory");
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("failed to create directory", parent)?;
    }

    // Sorted so repeated runs produce the same tree in the same order.
    for entry in walkdir::WalkDir::new(from).sort_by_file_name() {
        let entry = entry?;
        debug_assert!(entry.path().starts_with(from));
        let rel_path = entry.path().strip_prefix(from)?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_symlink() {
            let target = fs::read_link(entry.path())
                .await
                .fs_context("failed to read symlink", entry.path())?;
            remove_path(&dest_path).await?;
            let linked = if entry.path().is_dir() {
                symlink_dir(&target, &dest_path)
            } else {
                symlink_file(&target, &dest_path)
            };
            linked.fs_context("failed to create symlink", &dest_path)?;
        } else if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .await
                .fs_context("failed to create directory", &dest_path)?;
        } else {
            fs::copy(entry.path(), &dest_path)
                .await
                .fs_context("failed to copy", entry.path())?;
        }
    }

    Ok(())
}

/// Copies a file or directory into `dest_dir`, keeping its base name.
///
/// A directory without a base name (`.`, `..`, `/`) has its contents copied
/// straight into `dest_dir`. Returns the destination path.
pub async fn copy_into(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let Some(name) = src.file_name() else {
        if src.is_dir() {
            copy_dir(src, dest_dir).await?;
            return Ok(dest_dir.to_path_buf());
        }
        return Err(Error::GenericError(format!(
            "{} has no file name",
            src.display()
        )));
    };
    let dest = dest_dir.join(name);

    if src.is_dir() {
        copy_dir(src, &dest).await?;
    } else {
        copy_file(src, &dest).await?;
    }
    Ok(dest)
}

/// Copies an executable and marks it `0755`.
pub async fn install_executable(src: &Path, dest: &Path) -> Result<()> {
    copy_file(src, dest).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dest, std::fs::Permissions::from_mode(0o755))
            .await
            .fs_context("failed to set executable permissions", dest)?;
    }

    Ok(())
}
