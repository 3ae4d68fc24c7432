//! Async access to a [`Browser`] from an event loop.
//!
//! View mutations take the browser lock and run on tokio's blocking pool,
//! so at most one structural change is in flight and the caller's task never
//! blocks on disk I/O. Folder sizes and the walk part of a search run
//! without the lock against a shared handle to the filesystem.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{CoreError, CoreResult};
use crate::event::{Command, Update};
use crate::fs::adapter::FileSystem;
use crate::fs::walker::{self, CancelToken, WalkOptions};
use crate::view::browser::Browser;
use crate::view::tree::Row;

/// Cloneable handle to one browsing session.
#[derive(Debug)]
pub struct SharedBrowser<F: FileSystem + 'static> {
    inner: Arc<Mutex<Browser<F>>>,
    fs: Arc<F>,
    root: PathBuf,
    options: WalkOptions,
}

impl<F: FileSystem + 'static> Clone for SharedBrowser<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            fs: Arc::clone(&self.fs),
            root: self.root.clone(),
            options: self.options,
        }
    }
}

async fn run_blocking<T, Job>(job: Job) -> CoreResult<T>
where
    T: Send + 'static,
    Job: FnOnce() -> CoreResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| CoreError::Worker(e.to_string()))?
}

impl<F: FileSystem + 'static> SharedBrowser<F> {
    pub fn new(browser: Browser<F>) -> Self {
        Self {
            fs: Arc::clone(browser.fs()),
            root: browser.root().to_path_buf(),
            options: browser.options(),
            inner: Arc::new(Mutex::new(browser)),
        }
    }

    /// Opens `root` on the blocking pool.
    pub async fn open(fs: Arc<F>, root: PathBuf, options: WalkOptions) -> CoreResult<Self> {
        let browser = run_blocking(move || Browser::open(fs, root, options)).await?;
        Ok(Self::new(browser))
    }

    /// Snapshot of the rows currently displayed.
    pub async fn current_view(&self) -> Vec<Row> {
        self.inner.lock().await.current_view()
    }

    /// Applies `command` with exclusive access to the view.
    ///
    /// Searches are routed through [`SharedBrowser::search`] so the walk does
    /// not hold the lock.
    pub async fn handle(&self, command: Command) -> CoreResult<Update> {
        if let Command::Search(query) = command {
            return self.search(query, CancelToken::new()).await;
        }
        let mut guard = Arc::clone(&self.inner).lock_owned().await;
        run_blocking(move || guard.handle(command)).await
    }

    /// Runs a search and installs its results, or clears the search when
    /// `query` is empty.
    ///
    /// A search that is overtaken by a newer search or a clear while it walks
    /// has its results dropped; the returned update then reflects whatever is
    /// displayed when it finishes.
    pub async fn search(&self, query: String, cancel: CancelToken) -> CoreResult<Update> {
        if query.is_empty() {
            let mut guard = self.inner.lock().await;
            return guard.handle(Command::Search(query));
        }

        let generation = self.inner.lock().await.begin_search();

        let fs = Arc::clone(&self.fs);
        let root = self.root.clone();
        let options = self.options;
        let needle = query.clone();
        let walked =
            run_blocking(move || walker::search(fs.as_ref(), &root, &needle, options, &cancel))
                .await;

        let mut guard = self.inner.lock().await;
        let entries = match walked {
            Ok(entries) => entries,
            Err(e) => {
                guard.abandon_search(generation);
                return Err(e);
            }
        };
        let before = guard.current_view();
        guard.install_search(generation, query, entries);
        Ok(Update::between(&before, guard.current_view()))
    }

    /// Total size of the entry at `path`, computed on the blocking pool from
    /// a snapshot of the entry.
    pub async fn folder_size_of(&self, path: &Path, cancel: CancelToken) -> CoreResult<u64> {
        let entry = self.inner.lock().await.size_target(path)?;
        let fs = Arc::clone(&self.fs);
        let options = self.options;
        run_blocking(move || walker::aggregate_size(fs.as_ref(), &entry, options, &cancel)).await
    }
}
