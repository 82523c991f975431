#![deny(missing_docs)]
//! Filtering, sorting and navigation engine for file-picker dialogs.
//!
//! The crate turns a directory, a glob or regex filter and a set of column
//! preferences into an ordered, navigable listing of entries, and drives a
//! breadcrumb bar and per-row click detection on top of it. Rendering,
//! timers and the filesystem are injected:
//!
//! - [`FileSystem`] supplies metadata and directory creation
//!   ([`StdFileSystem`] for the real thing)
//! - [`DialogView`] receives row and breadcrumb updates
//! - [`ClickTimers`] schedules double-click timeouts on the host event loop
//!
//! [`FileDialogController`] composes everything. The leaf modules
//! ([`PathSegments`], [`Pattern`], [`classify`], [`SortEngine`],
//! [`FilterEngine`], [`DoubleClickDetector`]) are usable on their own.
//!
//! With the default `tracing` feature, navigation, filtering, click and
//! settings events are emitted through `tracing`.

mod breadcrumb;
mod click;
mod columns;
mod config;
mod core;
mod dialog;
mod entry;
mod filter;
mod fs;
mod navigation;
mod path_segments;
mod pattern;
mod settings;
mod sort;

pub use breadcrumb::{Breadcrumb, BreadcrumbButton, BreadcrumbChange};
pub use click::{
    ClickTimers, DEFAULT_DOUBLE_CLICK_MS, DoubleClickDetector, DoubleClickThreshold,
    MAX_DOUBLE_CLICK_MS, MIN_DOUBLE_CLICK_MS, ManualClickTimers, PressOutcome, ReleaseOutcome,
    RowId, TimerId,
};
pub use columns::{
    Column, DisplayColumns, OwnerColumns, TimeColumns, cell_text, format_file_size,
    format_timestamp, row_cells, visible_columns,
};
pub use config::{
    DEFAULT_FILE_NAME, DEFAULT_ICON_SIZE, DialogConfig, MAX_ICON_SIZE, MIN_ICON_SIZE,
    remember_selection,
};
pub use core::{
    DialogMode, FileListingError, Modifiers, PointerButton, Result, Selection, SortField,
    SortOrder,
};
pub use dialog::{DialogEvent, DialogResponse, DialogView, FileDialogController};
pub use entry::{EntryRecord, classify, decorated_name, permissions_string};
pub use filter::{FilterEngine, FilterSpec, should_include};
pub use fs::{FileKind, FileSystem, FsEntry, SpecialKind, StdFileSystem};
pub use navigation::{
    DirectoryListing, NavigationController, NavigationOutcome, NavigationState, RowActivation,
    list_directory,
};
pub use path_segments::{PathSegments, is_prefix_of};
pub use pattern::{
    DEFAULT_FLAGS, IntoPattern, MATCH_ALL, Pattern, glob_to_regex, parse_pattern, regex_to_glob,
};
pub use settings::{FileSettings, MemorySettings, SettingValue, SettingsStore, keys};
pub use sort::{SortEngine, locale_compare};
