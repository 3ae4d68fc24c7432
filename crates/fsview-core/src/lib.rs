//! fsview core library: UI-agnostic filesystem tree browsing.
//!
//! `fsview-core` keeps an ordered, expansion-aware view of a directory tree
//! in step with the filesystem. A frontend renders the rows it hands out,
//! sends back [`Command`]s, and redraws from the [`Diff`] in each
//! [`Update`].
//!
//! # Modules
//!
//! - [`fs`]: [`Entry`], the [`FileSystem`] capability, directory reading, recursive walks, rename/delete.
//! - [`view`]: the flattened tree, the browsing session, async access, and row diffing.
//! - [`config`]: TOML-based settings.
//! - [`event`]: [`Command`] and [`Update`] types for UI ↔ Core communication.
//! - [`error`]: Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod fs;
pub mod view;

pub use config::settings::Config;
pub use error::{CoreError, CoreResult};
pub use event::{Command, Update};
pub use format::{format_date, format_size};
pub use fs::adapter::{DirItem, FileStat, FileSystem, StdFs};
pub use fs::entry::{Entry, EntryKind, EntryStamp};
pub use fs::mutate::{delete, rename};
pub use fs::reader::{compare_entries, list};
pub use fs::walker::{aggregate_size, search, CancelToken, WalkOptions};
pub use view::{diff, Browser, Diff, FlatView, Move, Row, SharedBrowser};
