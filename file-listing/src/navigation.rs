use std::path::{Path, PathBuf};

use crate::breadcrumb::{Breadcrumb, BreadcrumbChange};
use crate::core::{FileListingError, Result};
use crate::entry::{EntryRecord, classify, synthetic};
use crate::filter::FilterEngine;
use crate::fs::FileSystem;
use crate::path_segments::PathSegments;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Navigation state of one dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationState {
    /// Nothing displayed yet.
    Uninitialized,
    /// Listing the given directory.
    Displaying(PathSegments),
}

/// Filtered, unsorted records of one directory, `.` and `..` first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryListing {
    /// Listed directory.
    pub dir: PathSegments,
    /// Records that passed the filter.
    pub entries: Vec<EntryRecord>,
}

/// Result of a display request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationOutcome {
    /// What happened to the breadcrumb.
    pub breadcrumb: BreadcrumbChange,
    /// New listing; `None` when the target is the directory already shown.
    pub listing: Option<DirectoryListing>,
}

/// What double-clicking a row asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowActivation {
    /// Nothing (`.`, or `..` at the root).
    Stay,
    /// Display this directory.
    Navigate(PathBuf),
    /// A non-directory; opening it is up to the host.
    OpenFile(PathBuf),
}

/// Tracks the displayed directory and breadcrumb and produces listings.
#[derive(Clone, Debug)]
pub struct NavigationController {
    state: NavigationState,
    breadcrumb: Breadcrumb,
}

impl NavigationController {
    /// Controller with nothing displayed.
    pub fn new(home: Option<PathSegments>, show_root: bool) -> Self {
        Self {
            state: NavigationState::Uninitialized,
            breadcrumb: Breadcrumb::new(home, show_root),
        }
    }

    /// Current state.
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Displayed directory, if any.
    pub fn current_dir(&self) -> Option<&PathSegments> {
        match &self.state {
            NavigationState::Displaying(dir) => Some(dir),
            NavigationState::Uninitialized => None,
        }
    }

    /// Breadcrumb buttons and selection.
    pub fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    /// Display `target`.
    ///
    /// Re-displaying the current directory only refreshes the breadcrumb.
    /// Any other target is listed first; on failure nothing changes.
    pub fn display_directory(
        &mut self,
        fs: &dyn FileSystem,
        target: &Path,
        filter: &FilterEngine,
    ) -> Result<NavigationOutcome> {
        let segments = PathSegments::segment(target)?;
        if self.current_dir() == Some(&segments) {
            let change = self.breadcrumb.display(&segments);
            return Ok(NavigationOutcome {
                breadcrumb: change,
                listing: None,
            });
        }
        let listing = list_directory(fs, &segments, filter)?;
        let change = self.breadcrumb.display(&segments);
        trace_displayed(&segments, listing.entries.len(), change);
        self.state = NavigationState::Displaying(segments);
        Ok(NavigationOutcome {
            breadcrumb: change,
            listing: Some(listing),
        })
    }

    /// Back to [`NavigationState::Uninitialized`] with an empty breadcrumb.
    pub fn reset(&mut self) {
        self.state = NavigationState::Uninitialized;
        self.breadcrumb.clear();
    }

    /// List the current directory again.
    pub fn relist(&self, fs: &dyn FileSystem, filter: &FilterEngine) -> Result<DirectoryListing> {
        let dir = self.current_dir().ok_or_else(nothing_displayed)?;
        list_directory(fs, dir, filter)
    }

    /// Directory to display after activating breadcrumb button `index`, if
    /// it differs from the current one.
    pub fn activate_breadcrumb(&mut self, index: usize) -> Option<PathBuf> {
        self.breadcrumb.activate(index).map(|segments| segments.join())
    }

    /// Toggle the breadcrumb root button. Returns whether it changed.
    pub fn set_show_root(&mut self, show_root: bool) -> bool {
        self.breadcrumb.set_show_root(show_root)
    }

    /// Parent of the current directory; `None` at the root or before display.
    pub fn parent_dir(&self) -> Option<PathBuf> {
        self.current_dir()
            .and_then(PathSegments::parent)
            .map(|p| p.join())
    }

    /// What double-clicking `record` asks for.
    pub fn activation_for(&self, record: &EntryRecord) -> RowActivation {
        match record.name.as_str() {
            "." => RowActivation::Stay,
            ".." => self
                .parent_dir()
                .map_or(RowActivation::Stay, RowActivation::Navigate),
            _ if record.is_directory => match self.current_dir() {
                Some(dir) => RowActivation::Navigate(dir.join().join(&record.name)),
                None => RowActivation::Navigate(record.path.clone()),
            },
            _ => RowActivation::OpenFile(record.path.clone()),
        }
    }
}

/// Enumerate, classify and filter `dir`, with synthetic `.` and `..` first.
///
/// A missing directory is created (with parents) before listing.
pub fn list_directory(
    fs: &dyn FileSystem,
    dir: &PathSegments,
    filter: &FilterEngine,
) -> Result<DirectoryListing> {
    let path = dir.join();
    let enumeration_error = |source: std::io::Error| FileListingError::Enumeration {
        path: path.clone(),
        source,
    };
    match fs.probe_dir(&path) {
        Ok(true) => {}
        Ok(false) => {
            return Err(enumeration_error(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                "not a directory",
            )));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs.create_dir_all(&path)
                .map_err(|source| FileListingError::DirectoryCreation {
                    path: path.clone(),
                    source,
                })?;
        }
        Err(e) => return Err(enumeration_error(e)),
    }

    let self_meta = fs.metadata(&path).map_err(enumeration_error)?;
    let parent_meta = match dir.parent() {
        Some(parent) => fs
            .metadata(&parent.join())
            .unwrap_or_else(|_| self_meta.clone()),
        None => self_meta.clone(),
    };
    let raw_entries = fs.read_dir(&path).map_err(enumeration_error)?;

    let mut entries = Vec::with_capacity(raw_entries.len() + 2);
    entries.push(synthetic(fs, ".", self_meta));
    entries.push(synthetic(fs, "..", parent_meta));
    entries.extend(
        raw_entries
            .into_iter()
            .map(|raw| classify(fs, raw))
            .filter(|record| filter.should_include(record)),
    );
    Ok(DirectoryListing {
        dir: dir.clone(),
        entries,
    })
}

pub(crate) fn nothing_displayed() -> FileListingError {
    FileListingError::PathResolution {
        path: PathBuf::new(),
        reason: "no directory is displayed".to_string(),
    }
}

#[cfg(feature = "tracing")]
fn trace_displayed(dir: &PathSegments, entries: usize, change: BreadcrumbChange) {
    debug!(event = "navigation.displayed", dir = %dir, entries, ?change, "directory displayed");
}

#[cfg(not(feature = "tracing"))]
fn trace_displayed(_dir: &PathSegments, _entries: usize, _change: BreadcrumbChange) {}

#[cfg(all(test, unix))]
pub(crate) mod tests {
    use super::*;
    use crate::core::DialogMode;
    use crate::filter::FilterSpec;
    use crate::fs::{FileKind, FsEntry, SpecialKind};
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;
    use std::io;

    /// In-memory tree. Symlink targets are absolute paths into the tree.
    #[derive(Default)]
    pub(crate) struct TestFs {
        pub nodes: RefCell<BTreeMap<PathBuf, FsEntry>>,
        pub read_dir_calls: Cell<usize>,
        pub home: Option<PathBuf>,
        pub deny_create: bool,
    }

    impl TestFs {
        pub(crate) fn new() -> Self {
            let fs = Self::default();
            fs.add("/", FileKind::Directory, 0o040755, 4096);
            fs
        }

        pub(crate) fn add(&self, path: &str, kind: FileKind, mode: u32, size: u64) {
            let path = PathBuf::from(path);
            let missing_parent = path
                .parent()
                .filter(|parent| !self.nodes.borrow().contains_key(*parent))
                .map(Path::to_path_buf);
            if let Some(parent) = missing_parent {
                self.add(&parent.to_string_lossy(), FileKind::Directory, 0o040755, 4096);
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "/".to_string());
            let mut entry = crate::entry::tests::raw(&name, kind, mode);
            entry.path = path.clone();
            entry.size = size;
            self.nodes.borrow_mut().insert(path, entry);
        }

        pub(crate) fn dir(&self, path: &str) {
            self.add(path, FileKind::Directory, 0o040755, 4096);
        }

        pub(crate) fn file(&self, path: &str, mode: u32, size: u64) {
            self.add(path, FileKind::Regular, 0o100000 | mode, size);
        }

        pub(crate) fn symlink(&self, path: &str, target: &str) {
            self.add(path, FileKind::Symlink, 0o120777, 0);
            let target_mode = self.nodes.borrow().get(Path::new(target)).map(|t| t.mode);
            if let Some(link) = self.nodes.borrow_mut().get_mut(Path::new(path)) {
                link.symlink_target = Some(PathBuf::from(target));
                link.target_mode = target_mode;
            }
        }

        fn get(&self, path: &Path) -> io::Result<FsEntry> {
            self.nodes
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such node"))
        }
    }

    impl FileSystem for TestFs {
        fn read_dir(&self, dir: &Path) -> io::Result<Vec<FsEntry>> {
            self.read_dir_calls.set(self.read_dir_calls.get() + 1);
            if self.get(dir)?.kind != FileKind::Directory {
                return Err(io::Error::new(io::ErrorKind::NotADirectory, "not a dir"));
            }
            Ok(self
                .nodes
                .borrow()
                .values()
                .filter(|e| e.path.parent() == Some(dir))
                .cloned()
                .collect())
        }

        fn metadata(&self, path: &Path) -> io::Result<FsEntry> {
            let node = self.get(path)?;
            match &node.symlink_target {
                Some(target) => self.get(target),
                None => Ok(node),
            }
        }

        fn probe_dir(&self, path: &Path) -> io::Result<bool> {
            Ok(self.metadata(path)?.kind == FileKind::Directory)
        }

        fn special_kind(&self, path: &Path) -> io::Result<Option<SpecialKind>> {
            match self.get(path)?.kind {
                FileKind::Special => Ok(Some(SpecialKind::Fifo)),
                _ => Ok(None),
            }
        }

        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            if self.deny_create {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            match self.nodes.borrow().get(path) {
                Some(e) if e.kind == FileKind::Directory => return Ok(()),
                Some(_) => return Err(io::Error::new(io::ErrorKind::AlreadyExists, "exists")),
                None => {}
            }
            self.dir(&path.to_string_lossy());
            Ok(())
        }

        fn create_dir(&self, path: &Path) -> io::Result<()> {
            if self.deny_create {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            if self.nodes.borrow().contains_key(path) {
                return Err(io::Error::new(io::ErrorKind::AlreadyExists, "exists"));
            }
            match path.parent() {
                Some(parent) if self.probe_dir(parent)? => {
                    self.dir(&path.to_string_lossy());
                    Ok(())
                }
                _ => Err(io::Error::new(io::ErrorKind::NotFound, "no parent")),
            }
        }

        fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
            self.file(&path.to_string_lossy(), 0o644, contents.len() as u64);
            Ok(())
        }

        fn home_dir(&self) -> Option<PathBuf> {
            self.home.clone()
        }
    }

    /// `/home/alice` with `notes.txt`, `bin/` and `run.sh`.
    pub(crate) fn alice_fs() -> TestFs {
        let mut fs = TestFs::new();
        fs.home = Some(PathBuf::from("/home/alice"));
        fs.file("/home/alice/notes.txt", 0o644, 120);
        fs.dir("/home/alice/bin");
        fs.file("/home/alice/run.sh", 0o755, 300);
        fs
    }

    fn txt_filter(mode: DialogMode) -> FilterEngine {
        FilterEngine::new(FilterSpec::parse(r"/.*\.txt$/i", "").unwrap(), mode)
    }

    fn names(listing: &DirectoryListing) -> Vec<&str> {
        listing.entries.iter().map(|e| e.display_name.as_str()).collect()
    }

    #[test]
    fn listing_injects_dot_entries_and_filters() {
        let fs = alice_fs();
        let dir = PathSegments::segment(Path::new("/home/alice")).unwrap();
        let listing = list_directory(&fs, &dir, &txt_filter(DialogMode::Open)).unwrap();
        assert_eq!(names(&listing), [".", "..", "bin/", "notes.txt"]);
        assert!(listing.entries[..2].iter().all(|e| e.is_directory));
        assert_eq!(listing.entries[1].path, PathBuf::from("/home"));

        let listing = list_directory(&fs, &dir, &txt_filter(DialogMode::SelectDir)).unwrap();
        assert_eq!(names(&listing), [".", "..", "bin/"]);
    }

    #[test]
    fn root_parent_is_itself() {
        let fs = TestFs::new();
        let listing = list_directory(&fs, &PathSegments::root(), &FilterEngine::default()).unwrap();
        assert_eq!(listing.entries[1].path, PathBuf::from("/"));
        assert_eq!(listing.entries[1].name, "..");
    }

    #[test]
    fn missing_directories_are_created() {
        let fs = alice_fs();
        let dir = PathSegments::segment(Path::new("/home/alice/new/deeper")).unwrap();
        let listing = list_directory(&fs, &dir, &FilterEngine::default()).unwrap();
        assert_eq!(names(&listing), [".", ".."]);
        assert!(fs.probe_dir(Path::new("/home/alice/new")).unwrap());

        let fs = TestFs {
            deny_create: true,
            ..alice_fs()
        };
        let err = list_directory(&fs, &dir, &FilterEngine::default()).unwrap_err();
        assert!(matches!(err, FileListingError::DirectoryCreation { .. }));
    }

    #[test]
    fn files_cannot_be_listed() {
        let fs = alice_fs();
        let mut nav = NavigationController::new(None, false);
        let err = nav
            .display_directory(&fs, Path::new("/home/alice/notes.txt"), &FilterEngine::default())
            .unwrap_err();
        assert!(matches!(err, FileListingError::Enumeration { .. }));
        assert_eq!(nav.state(), &NavigationState::Uninitialized);
    }

    #[test]
    fn reset_forgets_the_displayed_directory() {
        let fs = alice_fs();
        let filter = FilterEngine::default();
        let mut nav = NavigationController::new(None, true);
        nav.display_directory(&fs, Path::new("/home/alice"), &filter).unwrap();

        nav.reset();
        assert_eq!(nav.state(), &NavigationState::Uninitialized);
        assert!(nav.breadcrumb().buttons().is_empty());
        assert!(nav.breadcrumb().show_root());

        let again = nav.display_directory(&fs, Path::new("/home/alice"), &filter).unwrap();
        assert_eq!(again.breadcrumb, BreadcrumbChange::Built);
        assert!(again.listing.is_some());
    }

    #[test]
    fn display_transitions() {
        let fs = alice_fs();
        fs.dir("/home/alice/bin/sub");
        let filter = FilterEngine::default();
        let mut nav = NavigationController::new(None, false);

        let first = nav.display_directory(&fs, Path::new("/home/alice/bin"), &filter).unwrap();
        assert_eq!(first.breadcrumb, BreadcrumbChange::Built);
        assert!(first.listing.is_some());

        // Ancestor on the trail: breadcrumb reused, content relisted.
        let up = nav.display_directory(&fs, Path::new("/home/alice"), &filter).unwrap();
        assert_eq!(up.breadcrumb, BreadcrumbChange::Refreshed);
        assert_eq!(up.listing.map(|l| l.dir.join()), Some(PathBuf::from("/home/alice")));

        // Same directory again: nothing to relist.
        let calls = fs.read_dir_calls.get();
        let same = nav.display_directory(&fs, Path::new("/home/alice"), &filter).unwrap();
        assert_eq!(same.breadcrumb, BreadcrumbChange::Refreshed);
        assert_eq!(same.listing, None);
        assert_eq!(fs.read_dir_calls.get(), calls);

        let down = nav.display_directory(&fs, Path::new("/home/alice/bin/sub"), &filter).unwrap();
        assert_eq!(down.breadcrumb, BreadcrumbChange::Rebuilt);
        assert_eq!(
            nav.current_dir().map(PathSegments::join),
            Some(PathBuf::from("/home/alice/bin/sub"))
        );
    }

    #[test]
    fn failed_display_keeps_previous_directory() {
        let fs = alice_fs();
        let filter = FilterEngine::default();
        let mut nav = NavigationController::new(None, false);
        nav.display_directory(&fs, Path::new("/home/alice"), &filter).unwrap();
        assert!(nav.display_directory(&fs, Path::new("/home/alice/run.sh"), &filter).is_err());
        assert!(nav.display_directory(&fs, Path::new("relative"), &filter).is_err());
        assert_eq!(nav.parent_dir(), Some(PathBuf::from("/home")));
        assert_eq!(nav.breadcrumb().selected().map(PathSegments::join), Some(PathBuf::from("/home/alice")));
    }

    #[test]
    fn activation_targets() {
        let fs = alice_fs();
        fs.symlink("/home/alice/docs", "/home/alice/bin");
        let filter = FilterEngine::default();
        let mut nav = NavigationController::new(None, false);
        let listing = nav
            .display_directory(&fs, Path::new("/home/alice"), &filter)
            .unwrap()
            .listing
            .unwrap();
        let by_name = |name: &str| {
            listing
                .entries
                .iter()
                .find(|e| e.name == name)
                .cloned()
                .unwrap()
        };
        assert_eq!(nav.activation_for(&by_name(".")), RowActivation::Stay);
        assert_eq!(
            nav.activation_for(&by_name("..")),
            RowActivation::Navigate(PathBuf::from("/home"))
        );
        assert_eq!(
            nav.activation_for(&by_name("docs")),
            RowActivation::Navigate(PathBuf::from("/home/alice/docs"))
        );
        assert_eq!(by_name("docs").display_name, "docs -> /home/alice/bin/");
        assert_eq!(
            nav.activation_for(&by_name("run.sh")),
            RowActivation::OpenFile(PathBuf::from("/home/alice/run.sh"))
        );
    }
}
