//! Commands from the display layer and the updates sent back.
//!
//! A frontend renders [`Row`]s, keeps each row's path as its identity, and
//! turns clicks and prompts into [`Command`]s. The core answers with an
//! [`Update`] carrying the new rows plus a [`Diff`] against the previous
//! ones, so the frontend never stores callbacks on rows.

use std::path::PathBuf;

use crate::fs::entry::EntryStamp;
use crate::view::diff::{diff, Diff};
use crate::view::tree::Row;

/// Something the frontend asks the core to do.
///
/// Commands flow **UI → Core**. The core never creates commands itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the children of the directory at the path.
    Expand(PathBuf),
    /// Hide the children of the directory at the path.
    Collapse(PathBuf),
    /// Expand or collapse, whichever applies (a click on a directory row).
    Toggle(PathBuf),
    /// Replace the rows with search results; an empty query restores the tree.
    Search(String),
    /// Rename the entry at the path to the given name.
    Rename(PathBuf, String),
    /// Delete the entry at the path (after user confirmation).
    Delete(PathBuf),
    /// Re-read the root and every expanded directory.
    Refresh,
}

/// The core's answer to a [`Command`].
#[derive(Debug, Clone)]
pub struct Update {
    /// Rows to display now.
    pub rows: Vec<Row>,
    /// Changes from the rows displayed before the command.
    pub diff: Diff<PathBuf>,
}

impl Update {
    /// Builds an update by diffing `before` against `after`.
    pub fn between(before: &[Row], after: Vec<Row>) -> Self {
        let old = keyed(before);
        let new = keyed(&after);
        Self {
            diff: diff(&old, &new),
            rows: after,
        }
    }
}

/// Rows keyed by path; depth counts as content so re-indented rows redraw.
fn keyed(rows: &[Row]) -> Vec<(PathBuf, (EntryStamp, usize))> {
    rows.iter()
        .map(|row| (row.key().to_path_buf(), (row.stamp(), row.depth())))
        .collect()
}
