//! In-memory [`FileSystem`] for unit tests.
//!
//! Lets tests build trees without touching disk and inject the failures a
//! real filesystem makes hard to reproduce (denied reads while running as
//! root, children vanishing mid-listing, refused renames and deletes).

use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::fs::adapter::{DirItem, FileStat, FileSystem};
use crate::fs::walker::CancelToken;

#[derive(Debug, Clone, Copy)]
enum Node {
    File(u64),
    Dir,
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<PathBuf, Node>,
    denied: HashSet<PathBuf>,
    vanished: HashSet<PathBuf>,
    undeletable: HashSet<PathBuf>,
    refuse_renames: bool,
    list_calls: usize,
    trips: Vec<(PathBuf, CancelToken)>,
}

#[derive(Debug, Default)]
pub struct MemFs {
    state: Mutex<State>,
}

fn mtime() -> Option<SystemTime> {
    Some(UNIX_EPOCH + Duration::from_secs(1_700_000_000))
}

impl MemFs {
    /// Creates a filesystem containing only the directory `root`.
    pub fn with_root(root: &str) -> Self {
        let fs = Self::default();
        fs.dir(root);
        fs
    }

    fn insert(&self, path: &str, node: Node) {
        let mut state = self.state.lock().unwrap();
        let path = PathBuf::from(path);
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            state.nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
        state.nodes.insert(path, node);
    }

    pub fn dir(&self, path: &str) -> &Self {
        self.insert(path, Node::Dir);
        self
    }

    pub fn file(&self, path: &str, size: u64) -> &Self {
        self.insert(path, Node::File(size));
        self
    }

    /// Makes listing `path` fail with `PermissionDenied`.
    pub fn deny(&self, path: &str) -> &Self {
        self.state.lock().unwrap().denied.insert(PathBuf::from(path));
        self
    }

    /// Makes `path` show up in its parent's listing but fail to stat.
    pub fn vanish(&self, path: &str) -> &Self {
        self.state.lock().unwrap().vanished.insert(PathBuf::from(path));
        self
    }

    /// Makes deleting `path` fail.
    pub fn protect(&self, path: &str) -> &Self {
        self.state.lock().unwrap().undeletable.insert(PathBuf::from(path));
        self
    }

    /// Cancels `token` while `path` is being listed, as a user would while
    /// a walk is in progress.
    pub fn cancel_on(&self, path: &str, token: &CancelToken) -> &Self {
        self.state
            .lock()
            .unwrap()
            .trips
            .push((PathBuf::from(path), token.clone()));
        self
    }

    pub fn refuse_renames(&self) -> &Self {
        self.state.lock().unwrap().refuse_renames = true;
        self
    }

    pub fn exists(&self, path: &str) -> bool {
        self.state.lock().unwrap().nodes.contains_key(Path::new(path))
    }

    /// Number of `list_dir` calls made so far.
    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }
}

impl FileSystem for MemFs {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<io::Result<DirItem>>> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        for (trip, token) in &state.trips {
            if trip == path {
                token.cancel();
            }
        }
        if state.denied.contains(path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        match state.nodes.get(path) {
            None => return Err(io::Error::from(io::ErrorKind::NotFound)),
            Some(Node::File(_)) => return Err(io::Error::from(io::ErrorKind::NotADirectory)),
            Some(Node::Dir) => {}
        }

        // Reverse order so callers cannot rely on the backend's ordering.
        let items = state
            .nodes
            .iter()
            .rev()
            .filter(|(child, _)| child.parent() == Some(path))
            .map(|(child, node)| {
                if state.vanished.contains(child) {
                    return Err(io::Error::from(io::ErrorKind::NotFound));
                }
                let name = child
                    .file_name()
                    .map(|n| n.to_os_string())
                    .unwrap_or_default();
                Ok(match node {
                    Node::File(size) => DirItem {
                        name,
                        is_dir: false,
                        size: *size,
                        modified: mtime(),
                    },
                    Node::Dir => DirItem {
                        name,
                        is_dir: true,
                        size: 4096,
                        modified: mtime(),
                    },
                })
            })
            .collect();
        Ok(items)
    }

    fn rename_path(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.refuse_renames {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        if !state.nodes.contains_key(from) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        if state.nodes.contains_key(to) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        let moved: Vec<PathBuf> = state
            .nodes
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for old in moved {
            if let Some(node) = state.nodes.remove(&old) {
                let suffix = old.strip_prefix(from).unwrap_or(Path::new(""));
                let new = if suffix.as_os_str().is_empty() {
                    to.to_path_buf()
                } else {
                    to.join(suffix)
                };
                state.nodes.insert(new, node);
            }
        }
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.undeletable.contains(path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        match state.nodes.get(path) {
            Some(Node::File(_)) => {
                state.nodes.remove(path);
                Ok(())
            }
            Some(Node::Dir) => Err(io::Error::from(io::ErrorKind::IsADirectory)),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn delete_dir_recursive(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.undeletable.contains(path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        if !state.nodes.contains_key(path) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        state.nodes.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn stat_file(&self, path: &Path) -> io::Result<FileStat> {
        let state = self.state.lock().unwrap();
        match state.nodes.get(path) {
            Some(Node::File(size)) => Ok(FileStat {
                size: *size,
                modified: mtime(),
            }),
            Some(Node::Dir) => Ok(FileStat {
                size: 4096,
                modified: mtime(),
            }),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }
}
