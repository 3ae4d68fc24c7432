//! Rename and delete against the filesystem.
//!
//! These functions only touch the filesystem; keeping the view in step is
//! the job of [`crate::view::Browser`].

use crate::error::{CoreError, CoreResult};
use crate::fs::adapter::FileSystem;
use crate::fs::entry::{Entry, EntryKind};

/// Renames `entry` within its parent directory and returns the replacement.
///
/// Surrounding whitespace in `new_name` is ignored. The returned entry is
/// collapsed: a rename changes identity, so expansion state does not carry
/// over.
///
/// # Errors
///
/// - [`CoreError::InvalidName`] if `new_name` is blank, unchanged, `.`/`..`,
///   or contains a path separator or NUL byte.
/// - [`CoreError::RenameFailed`] for any filesystem failure.
pub fn rename<F: FileSystem + ?Sized>(fs: &F, entry: &Entry, new_name: &str) -> CoreResult<Entry> {
    let new_name = new_name.trim();
    if new_name == entry.name() || !is_valid_filename(new_name) {
        return Err(CoreError::InvalidName(new_name.to_string()));
    }
    let parent = entry
        .path()
        .parent()
        .ok_or_else(|| CoreError::InvalidName("no parent directory".to_string()))?;
    let target = parent.join(new_name);

    fs.rename_path(entry.path(), &target)
        .map_err(|source| CoreError::RenameFailed {
            path: entry.path().to_path_buf(),
            source,
        })?;

    let renamed = match fs.stat_file(&target) {
        Ok(stat) => Entry::from_stat(target, entry.kind(), stat),
        Err(e) => {
            tracing::warn!("renamed {} but stat failed: {e}", target.display());
            match entry.kind() {
                EntryKind::File => Entry::file(target, entry.size().unwrap_or(0), entry.modified()),
                EntryKind::Directory => Entry::directory(target, entry.modified()),
            }
        }
    };
    Ok(renamed)
}

/// Deletes `entry`; directories are removed with their whole subtree.
///
/// # Errors
///
/// [`CoreError::DeleteFailed`] for any filesystem failure. A recursive delete
/// may have removed part of the subtree before failing; only a fresh listing
/// tells what is left.
pub fn delete<F: FileSystem + ?Sized>(fs: &F, entry: &Entry) -> CoreResult<()> {
    let result = match entry.kind() {
        EntryKind::File => fs.delete_file(entry.path()),
        EntryKind::Directory => fs.delete_dir_recursive(entry.path()),
    };
    result.map_err(|source| CoreError::DeleteFailed {
        path: entry.path().to_path_buf(),
        source,
    })
}

fn is_valid_filename(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if name.contains('/') || name.contains('\0') {
        return false;
    }
    #[cfg(windows)]
    if name.contains('\\') || name.contains(':') {
        return false;
    }
    true
}
