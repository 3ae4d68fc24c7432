//! Directory reading.

use std::cmp::Ordering;
use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::fs::adapter::FileSystem;
use crate::fs::entry::Entry;

/// Sibling order used by every listing: directories first, then files,
/// each group by case-insensitive name. Names equal after lowercasing fall
/// back to the exact name, then to the raw path, so the order is total even
/// for file names that differ only in bytes the display name cannot show.
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        .then_with(|| a.name().cmp(b.name()))
        .then_with(|| a.path().cmp(b.path()))
}

/// Reads the immediate children of `path`, sorted with [`compare_entries`].
///
/// Children that cannot be inspected (usually because they were removed
/// between the directory read and the stat) are skipped.
///
/// # Errors
///
/// - [`CoreError::NotFound`]: the path does not exist.
/// - [`CoreError::NotADirectory`]: the path is not a directory.
/// - [`CoreError::PermissionDenied`]: read access is denied.
/// - [`CoreError::Io`]: any other I/O error.
///
/// # Examples
///
/// ```no_run
/// use fsview_core::{list, StdFs};
/// use std::path::Path;
///
/// let entries = list(&StdFs::default(), Path::new("/home/user")).unwrap();
/// for entry in &entries {
///     println!("{}", entry.name());
/// }
/// ```
pub fn list<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> CoreResult<Vec<Entry>> {
    let items = fs
        .list_dir(path)
        .map_err(|e| CoreError::from_io(path, e))?;

    let mut entries: Vec<Entry> = items
        .into_iter()
        .filter_map(|item| match item {
            Ok(item) => Some(Entry::from_item(path, item)),
            Err(e) => {
                tracing::debug!("skipping child of {}: {e}", path.display());
                None
            }
        })
        .collect();

    entries.sort_by(compare_entries);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::adapter::StdFs;
    use crate::fs::memfs::MemFs;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name()).collect()
    }

    #[test]
    fn list_sorts_dirs_first_then_name() {
        let mem = MemFs::with_root("/root");
        mem.file("/root/a.txt", 10).dir("/root/sub").file("/root/sub/b.txt", 20);

        let entries = list(&mem, Path::new("/root")).unwrap();

        assert_eq!(names(&entries), vec!["sub", "a.txt"]);
        assert!(entries[0].is_dir());
        assert_eq!(entries[1].size(), Some(10));
    }

    #[test]
    fn list_ordering_is_case_insensitive() {
        let mem = MemFs::with_root("/r");
        mem.file("/r/banana", 1)
            .file("/r/Apple", 1)
            .file("/r/cherry", 1)
            .dir("/r/zeta")
            .dir("/r/Alpha");

        let entries = list(&mem, Path::new("/r")).unwrap();

        assert_eq!(
            names(&entries),
            vec!["Alpha", "zeta", "Apple", "banana", "cherry"]
        );
    }

    #[test]
    fn list_ordering_is_independent_of_creation_order() {
        let expected = vec!["dir_a", "Dir_b", "file_a", "FILE_B", "file_c"];
        let orders: [&[&str]; 3] = [
            &["file_c", "Dir_b", "FILE_B", "dir_a", "file_a"],
            &["dir_a", "file_a", "file_c", "FILE_B", "Dir_b"],
            &["FILE_B", "file_c", "file_a", "Dir_b", "dir_a"],
        ];

        for order in orders {
            let tmp = TempDir::new().unwrap();
            for name in order {
                let path = tmp.path().join(name);
                if name.to_lowercase().starts_with("dir") {
                    fs::create_dir(path).unwrap();
                } else {
                    fs::write(path, "").unwrap();
                }
            }
            let entries = list(&StdFs::default(), tmp.path()).unwrap();
            assert_eq!(names(&entries), expected);
        }
    }

    #[test]
    fn list_ties_break_on_exact_name() {
        let mem = MemFs::with_root("/r");
        mem.file("/r/readme", 1).file("/r/README", 1);

        let entries = list(&mem, Path::new("/r")).unwrap();
        assert_eq!(names(&entries), vec!["README", "readme"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn list_keeps_distinct_paths_for_lossy_lookalikes() {
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let raw = std::ffi::OsStr::from_bytes(b"x\xff.txt");
        fs::write(tmp.path().join(raw), "raw").unwrap();
        fs::write(tmp.path().join("x\u{FFFD}.txt"), "lookalike").unwrap();

        let entries = list(&StdFs::default(), tmp.path()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name(), entries[1].name());
        assert_ne!(entries[0].path(), entries[1].path());
        assert!(entries.iter().all(|e| e.path().exists()));
        assert!(entries.iter().any(|e| e.path() == tmp.path().join(raw)));
    }

    #[test]
    fn list_returns_only_immediate_children() {
        let mem = MemFs::with_root("/r");
        mem.file("/r/deep/er/x.txt", 1).file("/r/top.txt", 1);

        let entries = list(&mem, Path::new("/r")).unwrap();
        assert_eq!(names(&entries), vec!["deep", "top.txt"]);
    }

    #[test]
    fn list_skips_vanished_children() {
        let mem = MemFs::with_root("/r");
        mem.file("/r/keep.txt", 1).file("/r/gone.txt", 1).vanish("/r/gone.txt");

        let entries = list(&mem, Path::new("/r")).unwrap();
        assert_eq!(names(&entries), vec!["keep.txt"]);
    }

    #[test]
    fn list_missing_returns_not_found() {
        let mem = MemFs::with_root("/r");
        let err = list(&mem, Path::new("/r/missing")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(p) if p == PathBuf::from("/r/missing")));
    }

    #[test]
    fn list_file_returns_not_a_directory() {
        let mem = MemFs::with_root("/r");
        mem.file("/r/f.txt", 3);

        let err = list(&mem, Path::new("/r/f.txt")).unwrap_err();
        assert!(matches!(err, CoreError::NotADirectory(_)));
    }

    #[test]
    fn list_denied_returns_permission_denied() {
        let mem = MemFs::with_root("/r");
        mem.dir("/r/secret").deny("/r/secret");

        let err = list(&mem, Path::new("/r/secret")).unwrap_err();
        assert!(matches!(err, CoreError::PermissionDenied(_)));
    }

    #[test]
    fn list_on_real_file_returns_not_a_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not_a_dir.txt");
        fs::write(&file, "content").unwrap();

        let err = list(&StdFs::default(), &file).unwrap_err();
        assert!(matches!(err, CoreError::NotADirectory(_)));
    }

    #[test]
    fn list_real_dir_reports_sizes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("small.txt"), "abc").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();

        let entries = list(&StdFs::default(), tmp.path()).unwrap();

        assert_eq!(names(&entries), vec!["nested", "small.txt"]);
        assert_eq!(entries[0].size(), None);
        assert_eq!(entries[1].size(), Some(3));
    }
}
