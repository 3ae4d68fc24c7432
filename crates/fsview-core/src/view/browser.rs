//! Browsing session over one root directory.
//!
//! [`Browser`] owns the [`FlatView`], the active search (if any) and the
//! filesystem handle, and turns [`Command`]s into [`Update`]s. Every error
//! leaves both the tree and the search results exactly as they were.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::event::{Command, Update};
use crate::fs::adapter::FileSystem;
use crate::fs::entry::Entry;
use crate::fs::mutate;
use crate::fs::walker::{self, CancelToken, WalkOptions};
use crate::view::tree::{FlatView, Row};

#[derive(Debug, Clone)]
struct SearchResults {
    query: String,
    entries: Vec<Entry>,
}

/// A rename or delete that search results must be reconciled with.
#[derive(Debug, Clone)]
enum Mutation {
    Renamed { from: PathBuf, to: Entry },
    Deleted(PathBuf),
}

impl Mutation {
    fn apply(&self, entries: &mut Vec<Entry>) {
        match self {
            Mutation::Renamed { from, to } => {
                entries.retain(|e| e.path() == from || !e.path().starts_with(from));
                if let Some(slot) = entries.iter_mut().find(|e| e.path() == from) {
                    *slot = to.clone();
                }
            }
            Mutation::Deleted(path) => entries.retain(|e| !e.path().starts_with(path)),
        }
    }
}

/// The latest search whose walk has not been installed yet.
#[derive(Debug)]
struct PendingSearch {
    generation: u64,
    missed: Vec<Mutation>,
}

/// A browsing session: tree state, search state and the backend.
#[derive(Debug)]
pub struct Browser<F: FileSystem> {
    fs: Arc<F>,
    view: FlatView,
    search: Option<SearchResults>,
    generation: u64,
    pending: Option<PendingSearch>,
    options: WalkOptions,
}

impl<F: FileSystem> Browser<F> {
    /// Lists `root` and starts a session with every directory collapsed.
    ///
    /// # Errors
    ///
    /// Any [`crate::fs::reader::list`] error for `root`.
    pub fn open(fs: Arc<F>, root: impl Into<PathBuf>, options: WalkOptions) -> CoreResult<Self> {
        let root = root.into();
        let view = FlatView::load(fs.as_ref(), &root)?;
        tracing::debug!("opened {} with {} entries", root.display(), view.len());
        Ok(Self {
            fs,
            view,
            search: None,
            generation: 0,
            pending: None,
            options,
        })
    }

    pub fn root(&self) -> &Path {
        self.view.root()
    }

    pub fn fs(&self) -> &Arc<F> {
        &self.fs
    }

    pub fn options(&self) -> WalkOptions {
        self.options
    }

    /// The browsed tree, whether or not it is currently displayed.
    pub fn tree(&self) -> &FlatView {
        &self.view
    }

    /// The active search query, if search results are displayed.
    pub fn search_query(&self) -> Option<&str> {
        self.search.as_ref().map(|s| s.query.as_str())
    }

    /// Rows to display: search results while a search is active, the
    /// flattened tree otherwise.
    pub fn current_view(&self) -> Vec<Row> {
        match &self.search {
            Some(results) => results
                .entries
                .iter()
                .map(|entry| Row::new(entry.clone(), 0))
                .collect(),
            None => self.view.rows(),
        }
    }

    /// Applies `command` and reports the rows before and after.
    pub fn handle(&mut self, command: Command) -> CoreResult<Update> {
        let before = self.current_view();
        tracing::debug!(?command, "handling command");
        match command {
            Command::Expand(path) => self.expand(&path)?,
            Command::Collapse(path) => self.collapse(&path)?,
            Command::Toggle(path) => self.toggle(&path)?,
            Command::Search(query) => self.search(&query, &CancelToken::new())?,
            Command::Rename(path, new_name) => {
                self.rename(&path, &new_name)?;
            }
            Command::Delete(path) => self.delete(&path)?,
            Command::Refresh => self.refresh()?,
        }
        Ok(Update::between(&before, self.current_view()))
    }

    pub fn expand(&mut self, path: &Path) -> CoreResult<()> {
        self.view.expand(self.fs.as_ref(), path)
    }

    pub fn collapse(&mut self, path: &Path) -> CoreResult<()> {
        self.view.collapse(path)
    }

    pub fn toggle(&mut self, path: &Path) -> CoreResult<()> {
        self.view.toggle(self.fs.as_ref(), path)
    }

    /// Runs a recursive name search from the root, or clears the search
    /// when `query` is empty. The tree underneath is left untouched.
    ///
    /// # Errors
    ///
    /// Root listing failures and [`CoreError::Cancelled`]; the previous
    /// results (or tree) stay displayed.
    pub fn search(&mut self, query: &str, cancel: &CancelToken) -> CoreResult<()> {
        if query.is_empty() {
            self.clear_search();
            return Ok(());
        }
        let generation = self.begin_search();
        match walker::search(self.fs.as_ref(), self.view.root(), query, self.options, cancel) {
            Ok(entries) => {
                self.install_search(generation, query.to_string(), entries);
                Ok(())
            }
            Err(e) => {
                self.abandon_search(generation);
                Err(e)
            }
        }
    }

    /// Drops the displayed results and supersedes any search still walking.
    pub(crate) fn clear_search(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.search = None;
    }

    /// Registers a new search and returns its generation. Any older search
    /// still walking is superseded.
    pub(crate) fn begin_search(&mut self) -> u64 {
        self.generation += 1;
        self.pending = Some(PendingSearch {
            generation: self.generation,
            missed: Vec::new(),
        });
        self.generation
    }

    /// Displays `entries` as the results for `query` if `generation` is still
    /// the latest search. Renames and deletes made while it was walking are
    /// applied first. Returns `false` when the results were stale and dropped.
    pub(crate) fn install_search(
        &mut self,
        generation: u64,
        query: String,
        mut entries: Vec<Entry>,
    ) -> bool {
        if !self.is_latest(generation) {
            tracing::debug!("dropping stale results for {query:?}");
            return false;
        }
        let missed = self.pending.take().map(|p| p.missed).unwrap_or_default();
        for mutation in &missed {
            mutation.apply(&mut entries);
        }
        tracing::debug!("search {query:?} found {} entries", entries.len());
        self.search = Some(SearchResults { query, entries });
        true
    }

    /// Forgets the search registered as `generation` after its walk failed.
    pub(crate) fn abandon_search(&mut self, generation: u64) {
        if self.is_latest(generation) {
            self.pending = None;
        }
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.pending.as_ref().map(|p| p.generation) == Some(generation)
    }

    fn reconcile_search(&mut self, mutation: Mutation) {
        if let Some(results) = &mut self.search {
            mutation.apply(&mut results.entries);
        }
        if let Some(pending) = &mut self.pending {
            pending.missed.push(mutation);
        }
    }

    /// Looks `path` up among the tree rows, then among search results.
    pub fn entry(&self, path: &Path) -> CoreResult<&Entry> {
        self.view
            .get(path)
            .or_else(|| {
                self.search
                    .as_ref()
                    .and_then(|s| s.entries.iter().find(|e| e.path() == path))
            })
            .ok_or_else(|| CoreError::NotFound(path.to_path_buf()))
    }

    /// Renames the entry at `path` and puts the replacement in its place in
    /// the tree and in the search results. Anything shown under a renamed
    /// directory is dropped.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if `path` is not displayed, otherwise see
    /// [`mutate::rename`]. The view is unchanged on error.
    pub fn rename(&mut self, path: &Path, new_name: &str) -> CoreResult<Entry> {
        let entry = self.entry(path)?.clone();
        let renamed = mutate::rename(self.fs.as_ref(), &entry, new_name)?;

        self.view.replace_after_rename(path, renamed.clone());
        self.reconcile_search(Mutation::Renamed {
            from: path.to_path_buf(),
            to: renamed.clone(),
        });
        tracing::debug!("renamed {} to {}", path.display(), renamed.path().display());
        Ok(renamed)
    }

    /// Deletes the entry at `path` and removes it, with everything shown
    /// under it, from the tree and the search results.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if `path` is not displayed, otherwise see
    /// [`mutate::delete`]. The view is unchanged on error.
    pub fn delete(&mut self, path: &Path) -> CoreResult<()> {
        let entry = self.entry(path)?.clone();
        mutate::delete(self.fs.as_ref(), &entry)?;

        self.view.reconcile_after_delete(path);
        self.reconcile_search(Mutation::Deleted(path.to_path_buf()));
        Ok(())
    }

    /// Re-reads the root and every expanded directory.
    pub fn refresh(&mut self) -> CoreResult<()> {
        self.view = self.view.reload(self.fs.as_ref())?;
        Ok(())
    }

    /// Total size of the file or directory at `path`. The root itself is
    /// accepted even though it has no row. May be slow on big trees.
    pub fn folder_size_of(&self, path: &Path, cancel: &CancelToken) -> CoreResult<u64> {
        let entry = self.size_target(path)?;
        walker::aggregate_size(self.fs.as_ref(), &entry, self.options, cancel)
    }

    pub(crate) fn size_target(&self, path: &Path) -> CoreResult<Entry> {
        if path == self.view.root() {
            return Ok(Entry::directory(path.to_path_buf(), None));
        }
        self.entry(path).cloned()
    }
}
