//! File entry representation.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use unicode_normalization::UnicodeNormalization;

use crate::format::{format_date, format_size};
use crate::fs::adapter::{DirItem, FileStat};

/// Kind of filesystem node, fixed when the [`Entry`] is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// A single file or directory entry.
///
/// Everything but the `expanded` flag is snapshot data taken when the entry
/// was read. A rename produces a new `Entry`; directory sizes are never
/// stored here (see [`crate::fs::walker::aggregate_size`]).
///
/// # Examples
///
/// ```
/// use fsview_core::{Entry, EntryKind};
///
/// let entry = Entry::file("/data/notes.txt".into(), 42, None);
/// assert_eq!(entry.name(), "notes.txt");
/// assert_eq!(entry.kind(), EntryKind::File);
/// assert_eq!(entry.size(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: PathBuf,
    name: String,
    kind: EntryKind,
    size: Option<u64>,
    modified: Option<SystemTime>,
    expanded: bool,
}

/// The fields that flag a content change between two snapshots of the same
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStamp {
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
    pub expanded: bool,
}

impl Entry {
    /// Creates a file entry.
    pub fn file(path: PathBuf, size: u64, modified: Option<SystemTime>) -> Self {
        Self::build(path, EntryKind::File, Some(size), modified)
    }

    /// Creates a collapsed directory entry with no known size.
    pub fn directory(path: PathBuf, modified: Option<SystemTime>) -> Self {
        Self::build(path, EntryKind::Directory, None, modified)
    }

    /// Creates the entry for a child of `parent` as reported by a listing.
    pub fn from_item(parent: &Path, item: DirItem) -> Self {
        let path = parent.join(&item.name);
        if item.is_dir {
            Self::directory(path, item.modified)
        } else {
            Self::file(path, item.size, item.modified)
        }
    }

    /// Creates an entry of the given kind at `path` from a stat result.
    pub fn from_stat(path: PathBuf, kind: EntryKind, stat: FileStat) -> Self {
        match kind {
            EntryKind::File => Self::file(path, stat.size, stat.modified),
            EntryKind::Directory => Self::directory(path, stat.modified),
        }
    }

    fn build(
        path: PathBuf,
        kind: EntryKind,
        size: Option<u64>,
        modified: Option<SystemTime>,
    ) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().nfc().collect::<String>())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            path,
            name,
            kind,
            size,
            modified,
            expanded: false,
        }
    }

    /// Returns the full path; this is the entry's identity.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the last path component.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns `true` if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Returns the byte length of a file. Always `None` for directories.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Returns the last-modified time, if available.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Returns `true` if this is a directory whose children are shown.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub(crate) fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded && self.is_dir();
    }

    /// Human-readable size for list rows: `"Folder"` for directories.
    pub fn size_label(&self) -> String {
        match self.size {
            Some(bytes) => format_size(bytes),
            None => "Folder".to_string(),
        }
    }

    /// Last-modified date for list rows as `dd/mm/yyyy` in local time, or
    /// `None` when the filesystem did not report one.
    pub fn modified_label(&self) -> Option<String> {
        self.modified.map(|time| format_date(time, &chrono::Local))
    }

    /// Returns the fields compared when diffing two snapshots.
    pub fn stamp(&self) -> EntryStamp {
        EntryStamp {
            size: self.size,
            modified: self.modified,
            expanded: self.expanded,
        }
    }
}
