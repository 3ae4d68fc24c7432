//! Recursive traversal for search and folder sizes.
//!
//! Both walks use an explicit stack so deep trees cannot exhaust the call
//! stack, and both are best-effort: a subdirectory that cannot be read is
//! skipped, while a failure on the walk root itself is returned.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use crate::error::{CoreError, CoreResult};
use crate::fs::adapter::FileSystem;
use crate::fs::entry::Entry;
use crate::fs::reader::list;

/// Cooperative cancellation flag shared between a caller and a walk.
///
/// Clones observe the same flag. Walks check it before every directory
/// they read.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn check(&self) -> CoreResult<()> {
        if self.is_cancelled() {
            Err(CoreError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Limits applied to a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Deepest level below the walk root that is visited; the root's own
    /// children are level 1 and are always visited. `None` is unlimited.
    pub max_depth: Option<usize>,
}

impl WalkOptions {
    fn descends(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth < max)
    }
}

/// Finds every entry under `root` whose name contains `query`, ignoring case.
/// The query is NFC-normalised like entry names.
///
/// Expansion state is irrelevant: every readable directory is descended,
/// including directories that match themselves. Results come out in
/// pre-order discovery order, siblings in listing order.
///
/// # Errors
///
/// - Any [`list`] error for `root` itself.
/// - [`CoreError::Cancelled`] if `cancel` fires during the walk.
pub fn search<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    query: &str,
    options: WalkOptions,
    cancel: &CancelToken,
) -> CoreResult<Vec<Entry>> {
    let needle = query.nfc().collect::<String>().to_lowercase();

    cancel.check()?;
    let mut stack: Vec<(Entry, usize)> = list(fs, root)?
        .into_iter()
        .rev()
        .map(|entry| (entry, 1))
        .collect();

    let mut results = Vec::new();
    while let Some((entry, depth)) = stack.pop() {
        if entry.is_dir() && options.descends(depth) {
            cancel.check()?;
            match list(fs, entry.path()) {
                Ok(children) => {
                    stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
                }
                Err(e) => {
                    tracing::debug!("search skipped {}: {e}", entry.path().display());
                }
            }
        }
        if entry.name().to_lowercase().contains(&needle) {
            results.push(entry);
        }
    }

    Ok(results)
}

/// Total size in bytes of every file at or under `entry`.
///
/// A file reports its own size. A directory is re-listed from the
/// filesystem (never from view state); unreadable subdirectories count as 0.
///
/// # Errors
///
/// - Any [`list`] error when `entry` is a directory that cannot be read.
/// - [`CoreError::Cancelled`] if `cancel` fires during the walk.
pub fn aggregate_size<F: FileSystem + ?Sized>(
    fs: &F,
    entry: &Entry,
    options: WalkOptions,
    cancel: &CancelToken,
) -> CoreResult<u64> {
    if !entry.is_dir() {
        return Ok(entry.size().unwrap_or(0));
    }

    let mut total: u64 = 0;
    let mut pending: Vec<(PathBuf, usize)> = vec![(entry.path().to_path_buf(), 0)];

    while let Some((dir, depth)) = pending.pop() {
        cancel.check()?;
        let children = match list(fs, &dir) {
            Ok(children) => children,
            Err(e) if depth == 0 => return Err(e),
            Err(e) => {
                tracing::debug!("size skipped {}: {e}", dir.display());
                continue;
            }
        };

        for child in children {
            if child.is_dir() {
                if options.descends(depth + 1) {
                    pending.push((child.path().to_path_buf(), depth + 1));
                }
            } else {
                total = total.saturating_add(child.size().unwrap_or(0));
            }
        }
    }

    Ok(total)
}
