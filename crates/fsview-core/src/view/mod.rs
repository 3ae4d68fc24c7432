//! What the display layer sees.
//!
//! [`tree::FlatView`] keeps the expansion-aware row order,
//! [`browser::Browser`] adds search and mutations on top of it,
//! [`shared::SharedBrowser`] serialises access from async code, and
//! [`diff`] compares two row sequences by identity.

pub mod browser;
pub mod diff;
pub mod shared;
pub mod tree;

pub use browser::Browser;
pub use diff::{diff, Diff, Move};
pub use shared::SharedBrowser;
pub use tree::{FlatView, Row};
