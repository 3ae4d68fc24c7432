//! Filesystem capability used by the core.
//!
//! The tree model never touches `std::fs` directly; it goes through
//! [`FileSystem`] so frontends can supply their own backend and tests can
//! inject failures. [`StdFs`] is the local-disk implementation.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// One child as reported by [`FileSystem::list_dir`].
///
/// `name` is the raw file name; it is what the child's path is built from,
/// so it must not be lossily converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirItem {
    pub name: OsString,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// Result of [`FileSystem::stat_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// OS primitives the core calls, never reimplements.
///
/// Implementations must be shareable across threads: folder sizes and
/// searches run on worker threads against the same backend.
pub trait FileSystem: Send + Sync {
    /// Lists the immediate children of `path` in any order.
    ///
    /// The outer error is for the directory itself. A per-child error means
    /// that child could not be inspected (typically it vanished after the
    /// directory was read).
    fn list_dir(&self, path: &Path) -> io::Result<Vec<io::Result<DirItem>>>;

    fn rename_path(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn delete_file(&self, path: &Path) -> io::Result<()>;

    fn delete_dir_recursive(&self, path: &Path) -> io::Result<()>;

    fn stat_file(&self, path: &Path) -> io::Result<FileStat>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct StdFs {
    follow_symlinks: bool,
}

impl StdFs {
    /// When `follow_symlinks` is `true`, a symlink pointing at a directory is
    /// listed as a directory and walked into. Otherwise links are reported
    /// with their own metadata, which makes them plain files.
    pub fn new(follow_symlinks: bool) -> Self {
        Self { follow_symlinks }
    }

    fn metadata(&self, path: &Path) -> io::Result<std::fs::Metadata> {
        if self.follow_symlinks {
            std::fs::metadata(path)
        } else {
            std::fs::symlink_metadata(path)
        }
    }
}

impl Default for StdFs {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FileSystem for StdFs {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<io::Result<DirItem>>> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", path.display()),
            ));
        }

        let items = std::fs::read_dir(path)?
            .map(|dir_entry| {
                let dir_entry = dir_entry?;
                let metadata = self.metadata(&dir_entry.path())?;
                Ok(DirItem {
                    name: dir_entry.file_name(),
                    is_dir: metadata.is_dir(),
                    size: metadata.len(),
                    modified: metadata.modified().ok(),
                })
            })
            .collect();
        Ok(items)
    }

    fn rename_path(&self, from: &Path, to: &Path) -> io::Result<()> {
        // std::fs::rename silently replaces an existing file on Unix
        if std::fs::symlink_metadata(to).is_ok() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", to.display()),
            ));
        }
        std::fs::rename(from, to)
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn delete_dir_recursive(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }

    fn stat_file(&self, path: &Path) -> io::Result<FileStat> {
        let metadata = self.metadata(path)?;
        Ok(FileStat {
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}
