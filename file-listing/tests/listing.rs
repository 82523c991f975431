#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use file_listing::{
    Breadcrumb, BreadcrumbChange, DialogConfig, DialogMode, DialogView, EntryRecord,
    FileDialogController, FileListingError, ManualClickTimers, RowId, SortField, StdFileSystem,
    permissions_string,
};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    p.push(format!("file-listing-{prefix}-{pid}-{t}"));
    p
}

#[derive(Default)]
struct Rows {
    shown: Vec<(RowId, String)>,
    errors: Vec<String>,
}

impl DialogView for Rows {
    fn clear_rows(&mut self) {
        self.shown.clear();
    }

    fn insert_row_at(&mut self, index: usize, row: RowId, record: &EntryRecord) {
        self.shown.insert(index, (row, record.display_name.clone()));
    }

    fn insert_row_before(&mut self, sibling: RowId, row: RowId, record: &EntryRecord) {
        let at = self.shown.iter().position(|(id, _)| *id == sibling).unwrap();
        self.shown.insert(at, (row, record.display_name.clone()));
    }

    fn breadcrumb_changed(&mut self, _change: BreadcrumbChange, _breadcrumb: &Breadcrumb) {}

    fn show_error(&mut self, error: &FileListingError) {
        self.errors.push(error.to_string());
    }
}

type Dialog = FileDialogController<StdFileSystem, Rows, ManualClickTimers>;

fn open(config: DialogConfig) -> Dialog {
    let mut dialog =
        FileDialogController::new(config, StdFileSystem, Rows::default(), ManualClickTimers::new())
            .unwrap();
    dialog.open().unwrap();
    dialog
}

fn names(dialog: &Dialog) -> Vec<String> {
    dialog.view().shown.iter().map(|(_, n)| n.clone()).collect()
}

fn populate(dir: &Path) {
    std::fs::create_dir_all(dir.join("bin")).unwrap();
    std::fs::write(dir.join("notes.txt"), vec![b'n'; 120]).unwrap();
    std::fs::write(dir.join("run.sh"), b"#!/bin/sh\n").unwrap();
    std::fs::set_permissions(dir.join("notes.txt"), std::fs::Permissions::from_mode(0o644)).unwrap();
    std::fs::set_permissions(dir.join("run.sh"), std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn std_fs_filtered_listing() {
    let dir = unique_temp_dir("filtered");
    let _ = std::fs::remove_dir_all(&dir);
    populate(&dir);
    std::os::unix::fs::symlink(dir.join("bin"), dir.join("link")).unwrap();
    let _sock = std::os::unix::net::UnixListener::bind(dir.join("sock")).unwrap();

    let mut dialog = open(
        DialogConfig::new(DialogMode::Open)
            .directory(&dir)
            .filter(r"/.*\.txt$/i"),
    );
    let link = format!("link -> {}/", dir.join("bin").display());
    assert_eq!(names(&dialog), [".", "..", "bin/", link.as_str(), "notes.txt", "sock="]);

    dialog.set_sort_field(SortField::Size);
    let shown = names(&dialog);
    assert_eq!(&shown[..2], [".", ".."]);
    assert_eq!(shown.iter().position(|n| n == "notes.txt").map(|i| i >= 4), Some(true));

    let notes_mode = dialog
        .rows()
        .find(|(_, r)| r.name == "notes.txt")
        .map(|(_, r)| permissions_string(r));
    assert_eq!(notes_mode.as_deref(), Some(".rw-r--r--"));

    drop(dialog);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn std_fs_dangling_symlink_is_listed() {
    let dir = unique_temp_dir("dangling");
    let _ = std::fs::remove_dir_all(&dir);
    populate(&dir);
    std::os::unix::fs::symlink("/nonexistent/target", dir.join("dangling")).unwrap();

    let dialog = open(DialogConfig::new(DialogMode::Open).directory(&dir));
    assert_eq!(
        names(&dialog),
        [".", "..", "bin/", "dangling -> /nonexistent/target", "notes.txt", "run.sh*"]
    );
    assert!(dialog.view().errors.is_empty());

    drop(dialog);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn std_fs_missing_start_directory_is_created() {
    let dir = unique_temp_dir("missing");
    let _ = std::fs::remove_dir_all(&dir);
    let start = dir.join("a").join("b");

    let mut dialog = open(DialogConfig::new(DialogMode::SelectDir).directory(&start));
    assert!(start.is_dir());
    assert_eq!(names(&dialog), [".", ".."]);

    let made = dialog.create_directory("c").unwrap();
    assert!(made.is_dir());
    assert_eq!(dialog.current_dir(), Some(made));
    assert!(dialog.create_directory("c/d").is_err());

    dialog.navigate_up().unwrap();
    assert_eq!(names(&dialog), [".", "..", "c/"]);
    assert_eq!(dialog.confirm().unwrap().path, start);

    drop(dialog);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn std_fs_file_is_not_listable() {
    let dir = unique_temp_dir("notdir");
    let _ = std::fs::remove_dir_all(&dir);
    populate(&dir);

    let mut dialog = open(DialogConfig::new(DialogMode::Open).directory(&dir));
    let before = names(&dialog);
    let err = dialog.display_directory(dir.join("notes.txt")).unwrap_err();
    assert!(matches!(err, FileListingError::Enumeration { .. }));
    assert_eq!(names(&dialog), before);
    assert_eq!(dialog.view().errors.len(), 1);

    drop(dialog);
    std::fs::remove_dir_all(&dir).unwrap();
}
