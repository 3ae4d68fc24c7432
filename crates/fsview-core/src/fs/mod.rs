//! File system side of fsview.
//!
//! [`entry::Entry`] is the value every component passes around,
//! [`adapter::FileSystem`] is the capability the core calls into,
//! [`reader::list`] reads one directory, [`walker`] does recursive search
//! and folder sizes, and [`mutate`] renames and deletes.

pub mod adapter;
pub mod entry;
#[cfg(test)]
pub(crate) mod memfs;
pub mod mutate;
pub mod reader;
pub mod walker;

pub use adapter::{DirItem, FileStat, FileSystem, StdFs};
pub use entry::{Entry, EntryKind, EntryStamp};
pub use walker::{CancelToken, WalkOptions};
