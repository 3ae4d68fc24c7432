//! The flattened, expansion-aware tree.
//!
//! Nodes live in an arena keyed by path. The visible sequence is a list of
//! keys equal to the pre-order traversal of the root's children, descending
//! only into expanded directories. Only visible nodes are kept in the arena:
//! collapsing or removing a directory drops its whole subtree.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::fs::adapter::FileSystem;
use crate::fs::entry::{Entry, EntryStamp};
use crate::fs::reader::list;

/// One displayed row: an entry snapshot and its nesting depth.
///
/// Top-level rows (and all search results) have depth `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    entry: Entry,
    depth: usize,
}

impl Row {
    pub fn new(entry: Entry, depth: usize) -> Self {
        Self { entry, depth }
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The row's identity for diffing.
    pub fn key(&self) -> &Path {
        self.entry.path()
    }

    pub fn stamp(&self) -> EntryStamp {
        self.entry.stamp()
    }
}

#[derive(Debug, Clone)]
struct Node {
    entry: Entry,
    depth: usize,
    children: Vec<PathBuf>,
}

/// Visible tree state under one root directory.
#[derive(Debug, Clone)]
pub struct FlatView {
    root: PathBuf,
    top: Vec<PathBuf>,
    nodes: HashMap<PathBuf, Node>,
    rows: Vec<PathBuf>,
}

impl FlatView {
    /// Lists `root` and shows its children, all collapsed.
    ///
    /// # Errors
    ///
    /// Any [`list`] error for `root`.
    pub fn load<F: FileSystem + ?Sized>(fs: &F, root: &Path) -> CoreResult<Self> {
        let entries = list(fs, root)?;
        let mut view = Self {
            root: root.to_path_buf(),
            top: Vec::with_capacity(entries.len()),
            nodes: HashMap::with_capacity(entries.len()),
            rows: Vec::with_capacity(entries.len()),
        };
        for entry in entries {
            let key = entry.path().to_path_buf();
            view.top.push(key.clone());
            view.rows.push(key.clone());
            view.nodes.insert(
                key,
                Node {
                    entry,
                    depth: 0,
                    children: Vec::new(),
                },
            );
        }
        Ok(view)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `true` if `path` is currently visible.
    pub fn contains(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    /// Returns the visible entry at `path`.
    pub fn get(&self, path: &Path) -> Option<&Entry> {
        self.nodes.get(path).map(|node| &node.entry)
    }

    /// Returns the row index of `path`.
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.rows.iter().position(|key| key == path)
    }

    /// Visible paths in display order.
    pub fn keys(&self) -> &[PathBuf] {
        &self.rows
    }

    /// Snapshot of the visible rows.
    pub fn rows(&self) -> Vec<Row> {
        self.rows
            .iter()
            .filter_map(|key| self.nodes.get(key))
            .map(|node| Row::new(node.entry.clone(), node.depth))
            .collect()
    }

    /// Paths of expanded directories in display order (parents before children).
    pub fn expanded_paths(&self) -> Vec<PathBuf> {
        self.rows
            .iter()
            .filter(|key| self.nodes.get(*key).is_some_and(|n| n.entry.is_expanded()))
            .cloned()
            .collect()
    }

    fn node(&self, path: &Path) -> CoreResult<&Node> {
        self.nodes
            .get(path)
            .ok_or_else(|| CoreError::NotFound(path.to_path_buf()))
    }

    /// End (exclusive) of the contiguous run of rows nested under `pos`.
    fn subtree_end(&self, pos: usize) -> usize {
        let depth = self.nodes[&self.rows[pos]].depth;
        let mut end = pos + 1;
        while end < self.rows.len()
            && self
                .nodes
                .get(&self.rows[end])
                .is_some_and(|n| n.depth > depth)
        {
            end += 1;
        }
        end
    }

    /// Removes rows `start..end` and their nodes.
    fn drop_rows(&mut self, start: usize, end: usize) {
        for key in self.rows.drain(start..end) {
            self.nodes.remove(&key);
        }
    }

    fn siblings_mut(&mut self, path: &Path) -> Option<&mut Vec<PathBuf>> {
        let parent = path.parent()?;
        if parent == self.root {
            Some(&mut self.top)
        } else {
            self.nodes.get_mut(parent).map(|n| &mut n.children)
        }
    }

    /// Reads the children of the directory at `path` and shows them right
    /// below it. Already-expanded directories are left alone.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if `path` is not visible.
    /// - [`CoreError::NotADirectory`] if it is a file.
    /// - Any [`list`] error; the view is unchanged.
    pub fn expand<F: FileSystem + ?Sized>(&mut self, fs: &F, path: &Path) -> CoreResult<()> {
        let node = self.node(path)?;
        if !node.entry.is_dir() {
            return Err(CoreError::NotADirectory(path.to_path_buf()));
        }
        if node.entry.is_expanded() {
            return Ok(());
        }
        let depth = node.depth + 1;
        let pos = self
            .position(path)
            .ok_or_else(|| CoreError::NotFound(path.to_path_buf()))?;

        let children = list(fs, path)?;

        let keys: Vec<PathBuf> = children.iter().map(|c| c.path().to_path_buf()).collect();
        for entry in children {
            self.nodes.insert(
                entry.path().to_path_buf(),
                Node {
                    entry,
                    depth,
                    children: Vec::new(),
                },
            );
        }
        self.rows.splice(pos + 1..pos + 1, keys.iter().cloned());
        if let Some(node) = self.nodes.get_mut(path) {
            node.entry.set_expanded(true);
            node.children = keys;
        }
        tracing::debug!("expanded {} at row {pos}", path.display());
        Ok(())
    }

    /// Hides every row nested under the directory at `path`. Collapsing a
    /// collapsed directory is a no-op.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if `path` is not visible.
    /// - [`CoreError::NotADirectory`] if it is a file.
    pub fn collapse(&mut self, path: &Path) -> CoreResult<()> {
        let node = self.node(path)?;
        if !node.entry.is_dir() {
            return Err(CoreError::NotADirectory(path.to_path_buf()));
        }
        if !node.entry.is_expanded() {
            return Ok(());
        }
        let pos = self
            .position(path)
            .ok_or_else(|| CoreError::NotFound(path.to_path_buf()))?;
        let end = self.subtree_end(pos);
        self.drop_rows(pos + 1, end);
        if let Some(node) = self.nodes.get_mut(path) {
            node.entry.set_expanded(false);
            node.children.clear();
        }
        tracing::debug!("collapsed {}, hid {} rows", path.display(), end - pos - 1);
        Ok(())
    }

    /// Expands a collapsed directory or collapses an expanded one.
    pub fn toggle<F: FileSystem + ?Sized>(&mut self, fs: &F, path: &Path) -> CoreResult<()> {
        if self.node(path)?.entry.is_expanded() {
            self.collapse(path)
        } else {
            self.expand(fs, path)
        }
    }

    /// Removes `path` and everything shown under it. Returns `false` when
    /// `path` was not visible, in which case nothing changes.
    pub fn reconcile_after_delete(&mut self, path: &Path) -> bool {
        let Some(pos) = self.position(path) else {
            return false;
        };
        let end = self.subtree_end(pos);
        self.drop_rows(pos, end);
        if let Some(siblings) = self.siblings_mut(path) {
            siblings.retain(|key| key != path);
        }
        tracing::debug!("removed {} ({} rows)", path.display(), end - pos);
        true
    }

    /// Puts `entry` where `old` was, dropping whatever was shown under `old`.
    /// Returns `false` when `old` was not visible.
    pub fn replace_after_rename(&mut self, old: &Path, entry: Entry) -> bool {
        let Some(pos) = self.position(old) else {
            return false;
        };
        let end = self.subtree_end(pos);
        self.drop_rows(pos + 1, end);

        let Some(previous) = self.nodes.remove(old) else {
            return false;
        };
        let key = entry.path().to_path_buf();
        self.rows[pos] = key.clone();
        if let Some(siblings) = self.siblings_mut(old) {
            if let Some(slot) = siblings.iter_mut().find(|k| k.as_path() == old) {
                *slot = key.clone();
            }
        }
        self.nodes.insert(
            key,
            Node {
                entry,
                depth: previous.depth,
                children: Vec::new(),
            },
        );
        true
    }

    /// Re-reads the root and every expanded directory that still exists.
    ///
    /// # Errors
    ///
    /// Any [`list`] error for the root; the view is unchanged.
    pub fn reload<F: FileSystem + ?Sized>(&self, fs: &F) -> CoreResult<Self> {
        let mut fresh = Self::load(fs, &self.root)?;
        for path in self.expanded_paths() {
            if !fresh.contains(&path) {
                continue;
            }
            if let Err(e) = fresh.expand(fs, &path) {
                tracing::debug!("reload could not re-expand {}: {e}", path.display());
            }
        }
        Ok(fresh)
    }
}
