use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::breadcrumb::{Breadcrumb, BreadcrumbChange};
use crate::click::{
    ClickTimers, DoubleClickDetector, DoubleClickThreshold, PressOutcome, ReleaseOutcome, RowId,
    TimerId,
};
use crate::columns::{Column, DisplayColumns, row_cells, visible_columns};
use crate::config::{DialogConfig, remember_selection};
use crate::core::{
    DialogMode, FileListingError, Modifiers, PointerButton, Result, Selection, SortField,
    SortOrder,
};
use crate::entry::EntryRecord;
use crate::filter::{FilterEngine, FilterSpec};
use crate::fs::FileSystem;
use crate::navigation::{NavigationController, NavigationState, RowActivation, nothing_displayed};
use crate::path_segments::PathSegments;
use crate::settings::{SettingsStore, keys};
use crate::sort::SortEngine;

#[cfg(feature = "tracing")]
use tracing::{debug, info, trace, warn};

/// Rendering sink driven by [`FileDialogController`].
///
/// Rows are identified by [`RowId`]; the controller keeps the displayed order
/// in sync with the sort order by inserting each row before its sorted
/// successor, or at the end.
pub trait DialogView {
    /// Destroy every displayed row.
    fn clear_rows(&mut self);
    /// Insert `row` at `index` (only ever the current row count).
    fn insert_row_at(&mut self, index: usize, row: RowId, record: &EntryRecord);
    /// Insert `row` directly before the displayed row `sibling`.
    fn insert_row_before(&mut self, sibling: RowId, row: RowId, record: &EntryRecord);
    /// Breadcrumb buttons or their checked states changed.
    fn breadcrumb_changed(&mut self, change: BreadcrumbChange, breadcrumb: &Breadcrumb);
    /// Surface an error to the user. The dialog stays in its previous state.
    fn show_error(&mut self, error: &FileListingError);
}

/// Input event for driving the dialog without direct UI coupling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogEvent {
    /// Display the configured start directory.
    Open,
    /// Display a directory.
    DisplayDirectory(PathBuf),
    /// List the current directory again.
    Refresh,
    /// Display the parent directory.
    NavigateUp,
    /// Breadcrumb button clicked.
    ActivateBreadcrumb(usize),
    /// Toggle the breadcrumb root button.
    SetShowRoot(bool),
    /// Column header activated.
    SetSortField(SortField),
    /// Sort direction changed.
    SetSortOrder(SortOrder),
    /// Filter typed as a regex.
    SetFilter(String),
    /// Filter typed as a glob.
    SetGlob(String),
    /// Filter picked from the configured list; `None` picks the first.
    SelectFilter(Option<usize>),
    /// Pointer pressed over a row.
    PointerPressed {
        /// Row under the pointer.
        row: RowId,
        /// Button pressed.
        button: PointerButton,
        /// Event time.
        at: Instant,
    },
    /// Pointer released over a row.
    PointerReleased {
        /// Row under the pointer.
        row: RowId,
        /// Button released.
        button: PointerButton,
        /// Modifier keys held.
        modifiers: Modifiers,
        /// Event time.
        at: Instant,
    },
    /// A click timeout armed for `row` fired.
    ClickTimeout(RowId),
    /// Create a directory in the current one and enter it.
    CreateDirectory(String),
    /// File name edited.
    SetFileName(String),
    /// Accept the dialog.
    Confirm,
    /// Accept a save dialog and write the bytes.
    Save(Vec<u8>),
    /// Dismiss the dialog.
    Close,
}

/// Side effect reported after handling a [`DialogEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogResponse {
    /// Handled; nothing further for the host.
    Handled,
    /// Not handled; let other handlers see the event.
    Propagate,
    /// A single click selected this file name.
    FileSelected(String),
    /// A new directory is displayed.
    Navigated(PathBuf),
    /// A non-directory row was double-clicked; opening it is up to the host.
    FileActivated {
        /// Activated file.
        path: PathBuf,
        /// Modifier keys held on release.
        modifiers: Modifiers,
    },
    /// The dialog was accepted.
    Confirmed(Selection),
    /// The dialog was dismissed.
    Cancelled,
    /// The event failed; the error went to [`DialogView::show_error`].
    Failed,
}

#[derive(Debug)]
struct Row {
    id: RowId,
    record: EntryRecord,
    clicks: DoubleClickDetector,
    timer: Option<TimerId>,
}

/// One file dialog: navigation, sorting, filtering and click handling over
/// an injected filesystem, rendering sink and timer source.
///
/// Every failing operation reports its error through
/// [`DialogView::show_error`] and returns it; state is left as it was before
/// the call.
pub struct FileDialogController<F: FileSystem, V: DialogView, T: ClickTimers> {
    config: DialogConfig,
    fs: F,
    view: V,
    timers: T,
    navigation: NavigationController,
    sort: SortEngine,
    filter: FilterEngine,
    filters: Vec<FilterSpec>,
    threshold: DoubleClickThreshold,
    unsorted: Vec<EntryRecord>,
    rows: Vec<Row>,
    next_row: u64,
    file_name: String,
    settings: Option<Box<dyn SettingsStore>>,
}

impl<F: FileSystem, V: DialogView, T: ClickTimers> FileDialogController<F, V, T> {
    /// Dialog for a validated `config`. Nothing is displayed until
    /// [`open`](Self::open).
    pub fn new(config: DialogConfig, fs: F, view: V, timers: T) -> Result<Self> {
        config.validate()?;
        let threshold = config.double_click_threshold()?;
        let filter = FilterEngine::new(config.filter_spec()?, config.mode);
        let filters = config.filter_specs()?;
        let home = fs
            .home_dir()
            .and_then(|home| PathSegments::segment(&home).ok());
        Ok(Self {
            navigation: NavigationController::new(home, config.show_root),
            sort: SortEngine::new(config.sort_field),
            file_name: config.file_name.clone(),
            config,
            fs,
            view,
            timers,
            filter,
            filters,
            threshold,
            unsorted: Vec::new(),
            rows: Vec::new(),
            next_row: 0,
            settings: None,
        })
    }

    /// Dialog configured from `store`; preference changes and confirmed
    /// selections are written back to it.
    pub fn from_settings(
        store: Box<dyn SettingsStore>,
        mode: DialogMode,
        fs: F,
        view: V,
        timers: T,
    ) -> Result<Self> {
        let config = DialogConfig::load(store.as_ref(), mode)?;
        Ok(Self::new(config, fs, view, timers)?.with_settings(store))
    }

    /// Persist preference changes and selections to `store`.
    pub fn with_settings(mut self, store: Box<dyn SettingsStore>) -> Self {
        self.settings = Some(store);
        self
    }

    /// Active configuration, including changes made through the dialog.
    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    /// Filesystem.
    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Rendering sink.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable rendering sink.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Timer source.
    pub fn timers(&self) -> &T {
        &self.timers
    }

    /// Mutable timer source, e.g. to poll due timeouts.
    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    /// Settings store, if any.
    pub fn settings(&self) -> Option<&dyn SettingsStore> {
        self.settings.as_deref()
    }

    /// Navigation state.
    pub fn state(&self) -> &NavigationState {
        self.navigation.state()
    }

    /// Displayed directory.
    pub fn current_dir(&self) -> Option<PathBuf> {
        self.navigation.current_dir().map(PathSegments::join)
    }

    /// Breadcrumb buttons.
    pub fn breadcrumb(&self) -> &Breadcrumb {
        self.navigation.breadcrumb()
    }

    /// Sort field and direction.
    pub fn sort(&self) -> &SortEngine {
        &self.sort
    }

    /// Active filter.
    pub fn filter(&self) -> &FilterSpec {
        self.filter.spec()
    }

    /// Selectable filters.
    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }

    /// Selected file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Displayed rows in order.
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &EntryRecord)> {
        self.rows.iter().map(|row| (row.id, &row.record))
    }

    /// Record behind a displayed row.
    pub fn row(&self, id: RowId) -> Option<&EntryRecord> {
        self.rows
            .iter()
            .find(|row| row.id == id)
            .map(|row| &row.record)
    }

    /// Visible columns in display order.
    pub fn columns(&self) -> Vec<Column> {
        visible_columns(&self.config.columns)
    }

    /// Cell texts of a displayed row.
    pub fn row_cells(&self, id: RowId) -> Option<Vec<String>> {
        self.row(id)
            .map(|record| row_cells(record, &self.config.columns))
    }

    /// Display the start directory, falling back to home (then `/`) when the
    /// start directory cannot be resolved.
    pub fn open(&mut self) -> Result<()> {
        let home = self.fs.home_dir().unwrap_or_else(|| PathBuf::from("/"));
        let start = self.config.start_dir.clone().unwrap_or_else(|| home.clone());
        let result = match self.show(&start) {
            Err(err) if err.is_path_resolution() && start != home => {
                trace_start_fallback(&start, &home, &err);
                self.show(&home)
            }
            other => other,
        };
        self.report(result)
    }

    /// Display `target`, creating it if missing.
    pub fn display_directory(&mut self, target: impl AsRef<Path>) -> Result<()> {
        let result = self.show(target.as_ref());
        self.report(result)
    }

    /// List the current directory again.
    pub fn refresh(&mut self) -> Result<()> {
        let result = self
            .navigation
            .relist(&self.fs, &self.filter)
            .map(|listing| self.replace_rows(listing.entries));
        self.report(result)
    }

    /// Display the parent directory; nothing happens at the root.
    pub fn navigate_up(&mut self) -> Result<()> {
        match self.navigation.parent_dir() {
            Some(parent) => self.display_directory(parent),
            None => Ok(()),
        }
    }

    /// Breadcrumb button `index` clicked.
    pub fn activate_breadcrumb(&mut self, index: usize) -> Result<()> {
        match self.navigation.activate_breadcrumb(index) {
            Some(target) => self.display_directory(target),
            None => {
                self.view
                    .breadcrumb_changed(BreadcrumbChange::Refreshed, self.navigation.breadcrumb());
                Ok(())
            }
        }
    }

    /// Toggle the breadcrumb root button.
    pub fn set_show_root(&mut self, show_root: bool) -> Result<()> {
        if !self.navigation.set_show_root(show_root) {
            return Ok(());
        }
        self.config.show_root = show_root;
        self.view
            .breadcrumb_changed(BreadcrumbChange::Rebuilt, self.navigation.breadcrumb());
        let result = self.persist();
        self.report(result)
    }

    /// Sort by `field` and rebuild the rows.
    pub fn set_sort_field(&mut self, field: SortField) {
        self.sort.set_field(field);
        self.config.sort_field = field;
        self.resort();
    }

    /// Sort by a column's field.
    pub fn sort_by_column(&mut self, column: Column) {
        self.set_sort_field(column.sort_field());
    }

    /// Change the sort direction and rebuild the rows.
    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort.set_order(order);
        self.resort();
    }

    /// Change the visible columns.
    pub fn set_columns(&mut self, columns: DisplayColumns) -> Result<()> {
        self.config.columns = columns;
        let result = self.persist();
        self.report(result)
    }

    /// Apply a regex filter (`/regex/flags` or bare). An invalid pattern
    /// keeps the previous filter.
    pub fn set_filter(&mut self, input: &str) -> Result<()> {
        let result = FilterSpec::parse(input, &self.config.filter_flags)
            .and_then(|spec| self.apply_filter(spec, input.trim().to_string()));
        self.report(result)
    }

    /// Apply a glob filter such as `*.txt, *.md`.
    pub fn set_glob(&mut self, glob: &str) -> Result<()> {
        let result = FilterSpec::from_glob(glob, &self.config.filter_flags).and_then(|spec| {
            let source = spec.pattern().to_string();
            self.apply_filter(spec, source)
        });
        self.report(result)
    }

    /// Apply one of the configured filters. `None` picks the first, or the
    /// match-all filter when none are configured.
    pub fn select_filter(&mut self, index: Option<usize>) -> Result<()> {
        let spec = match index {
            Some(i) => self.filters.get(i).cloned().ok_or_else(|| {
                FileListingError::invalid_config(keys::FILTERS, format!("no filter at index {i}"))
            }),
            None => Ok(self.filters.first().cloned().unwrap_or_default()),
        };
        let result = spec.and_then(|spec| {
            let source = spec.pattern().to_string();
            self.apply_filter(spec, source)
        });
        self.report(result)
    }

    /// Pointer pressed over `row`.
    pub fn pointer_pressed(&mut self, row: RowId, button: PointerButton, at: Instant) -> DialogResponse {
        let Some(entry) = self.rows.iter_mut().find(|r| r.id == row) else {
            return DialogResponse::Propagate;
        };
        match entry.clicks.press(button, at) {
            PressOutcome::Started { deadline } => {
                if let Some(stale) = entry.timer.take() {
                    self.timers.disarm(stale);
                }
                entry.timer = Some(self.timers.arm(row, deadline));
                DialogResponse::Handled
            }
            PressOutcome::Continued => DialogResponse::Handled,
            PressOutcome::Propagate => DialogResponse::Propagate,
        }
    }

    /// Pointer released over `row`.
    ///
    /// A single click on a file selects its name (not in
    /// [`DialogMode::SelectDir`]); a double click enters directories and
    /// reports files as activated.
    pub fn pointer_released(
        &mut self,
        row: RowId,
        button: PointerButton,
        modifiers: Modifiers,
        at: Instant,
    ) -> Result<DialogResponse> {
        let Some(entry) = self.rows.iter_mut().find(|r| r.id == row) else {
            return Ok(DialogResponse::Propagate);
        };
        let outcome = entry.clicks.release(button, at);
        if matches!(outcome, ReleaseOutcome::DoubleClick | ReleaseOutcome::Abandoned)
            && let Some(timer) = entry.timer.take()
        {
            self.timers.disarm(timer);
        }
        let record = entry.record.clone();
        match outcome {
            ReleaseOutcome::Propagate => Ok(DialogResponse::Propagate),
            ReleaseOutcome::Abandoned => Ok(DialogResponse::Handled),
            ReleaseOutcome::SingleClick => {
                trace_click("click.single", &record.name);
                if record.is_directory || self.config.mode == DialogMode::SelectDir {
                    return Ok(DialogResponse::Handled);
                }
                self.file_name = record.name.clone();
                Ok(DialogResponse::FileSelected(record.name))
            }
            ReleaseOutcome::DoubleClick => {
                trace_click("click.double", &record.name);
                match self.navigation.activation_for(&record) {
                    RowActivation::Stay => Ok(DialogResponse::Handled),
                    RowActivation::Navigate(target) => {
                        self.display_directory(&target)?;
                        Ok(DialogResponse::Navigated(target))
                    }
                    RowActivation::OpenFile(path) => {
                        Ok(DialogResponse::FileActivated { path, modifiers })
                    }
                }
            }
        }
    }

    /// The timeout armed for `row` fired; its click sequence is abandoned.
    pub fn click_timeout(&mut self, row: RowId) {
        if let Some(entry) = self.rows.iter_mut().find(|r| r.id == row) {
            entry.clicks.timeout();
            entry.timer = None;
        }
    }

    /// Create `name` in the current directory and display it.
    pub fn create_directory(&mut self, name: &str) -> Result<PathBuf> {
        let result = self.make_directory(name);
        self.report(result)
    }

    /// Set the selected file name.
    pub fn set_file_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.contains(['/', '\\']) {
            return self.report(Err(FileListingError::invalid_config(
                keys::LAST_FILE_NAME,
                "file name must not contain a path separator",
            )));
        }
        self.file_name = name;
        Ok(())
    }

    /// Accept the dialog.
    ///
    /// Open and save dialogs select the current directory joined with the
    /// file name; save dialogs make sure the directory exists first. Directory
    /// dialogs select the current directory. The selection is remembered in
    /// the settings store.
    pub fn confirm(&mut self) -> Result<Selection> {
        let result = self.build_selection();
        self.report(result)
    }

    /// Accept a save dialog and write `contents` to the selected path.
    pub fn save(&mut self, contents: &[u8]) -> Result<Selection> {
        let result = self.write_selection(contents);
        self.report(result)
    }

    /// Dismiss the dialog: rows are destroyed and their timers disarmed.
    /// Navigation starts over, so a later [`open`](Self::open) lists again.
    pub fn close(&mut self) {
        self.destroy_rows();
        self.unsorted.clear();
        self.navigation.reset();
    }

    /// Typed entry point for host events.
    pub fn handle_event(&mut self, event: DialogEvent) -> DialogResponse {
        let result = match event {
            DialogEvent::Open => self.open().map(|()| DialogResponse::Handled),
            DialogEvent::DisplayDirectory(path) => self
                .display_directory(&path)
                .map(|()| DialogResponse::Navigated(path)),
            DialogEvent::Refresh => self.refresh().map(|()| DialogResponse::Handled),
            DialogEvent::NavigateUp => self.navigate_up().map(|()| DialogResponse::Handled),
            DialogEvent::ActivateBreadcrumb(index) => self
                .activate_breadcrumb(index)
                .map(|()| DialogResponse::Handled),
            DialogEvent::SetShowRoot(show_root) => self
                .set_show_root(show_root)
                .map(|()| DialogResponse::Handled),
            DialogEvent::SetSortField(field) => {
                self.set_sort_field(field);
                Ok(DialogResponse::Handled)
            }
            DialogEvent::SetSortOrder(order) => {
                self.set_sort_order(order);
                Ok(DialogResponse::Handled)
            }
            DialogEvent::SetFilter(input) => self.set_filter(&input).map(|()| DialogResponse::Handled),
            DialogEvent::SetGlob(glob) => self.set_glob(&glob).map(|()| DialogResponse::Handled),
            DialogEvent::SelectFilter(index) => self
                .select_filter(index)
                .map(|()| DialogResponse::Handled),
            DialogEvent::PointerPressed { row, button, at } => {
                Ok(self.pointer_pressed(row, button, at))
            }
            DialogEvent::PointerReleased {
                row,
                button,
                modifiers,
                at,
            } => self.pointer_released(row, button, modifiers, at),
            DialogEvent::ClickTimeout(row) => {
                self.click_timeout(row);
                Ok(DialogResponse::Handled)
            }
            DialogEvent::CreateDirectory(name) => self
                .create_directory(&name)
                .map(DialogResponse::Navigated),
            DialogEvent::SetFileName(name) => self
                .set_file_name(name)
                .map(|()| DialogResponse::Handled),
            DialogEvent::Confirm => self.confirm().map(DialogResponse::Confirmed),
            DialogEvent::Save(contents) => self.save(&contents).map(DialogResponse::Confirmed),
            DialogEvent::Close => {
                self.close();
                Ok(DialogResponse::Cancelled)
            }
        };
        result.unwrap_or(DialogResponse::Failed)
    }

    fn show(&mut self, target: &Path) -> Result<()> {
        let outcome = self
            .navigation
            .display_directory(&self.fs, target, &self.filter)?;
        self.view
            .breadcrumb_changed(outcome.breadcrumb, self.navigation.breadcrumb());
        if let Some(listing) = outcome.listing {
            self.replace_rows(listing.entries);
        }
        Ok(())
    }

    fn apply_filter(&mut self, spec: FilterSpec, source: String) -> Result<()> {
        let mut engine = self.filter.clone();
        engine.set_spec(spec);
        let listing = match self.navigation.current_dir() {
            Some(_) => Some(self.navigation.relist(&self.fs, &engine)?),
            None => None,
        };
        trace_filter_changed(&source);
        self.filter = engine;
        self.config.filter = source;
        if let Some(listing) = listing {
            self.replace_rows(listing.entries);
        }
        self.persist()
    }

    fn make_directory(&mut self, name: &str) -> Result<PathBuf> {
        let path = self
            .navigation
            .current_dir()
            .ok_or_else(nothing_displayed)?
            .child(name)?
            .join();
        self.fs
            .create_dir(&path)
            .map_err(|source| FileListingError::DirectoryCreation {
                path: path.clone(),
                source,
            })?;
        self.show(&path)?;
        Ok(path)
    }

    fn build_selection(&mut self) -> Result<Selection> {
        let dir = self
            .navigation
            .current_dir()
            .ok_or_else(nothing_displayed)?
            .join();
        let mode = self.config.mode;
        let path = match mode {
            DialogMode::SelectDir => dir.clone(),
            DialogMode::Open | DialogMode::Save => {
                if self.file_name.is_empty() {
                    return Err(FileListingError::invalid_config(
                        keys::LAST_FILE_NAME,
                        "no file name selected",
                    ));
                }
                if mode == DialogMode::Save {
                    self.fs.create_dir_all(&dir).map_err(|source| {
                        FileListingError::DirectoryCreation {
                            path: dir.clone(),
                            source,
                        }
                    })?;
                }
                dir.join(&self.file_name)
            }
        };
        let selection = Selection { mode, dir, path };
        if let Some(store) = self.settings.as_mut() {
            remember_selection(store.as_mut(), &selection)?;
        }
        trace_confirmed(&selection);
        Ok(selection)
    }

    fn write_selection(&mut self, contents: &[u8]) -> Result<Selection> {
        if self.config.mode != DialogMode::Save {
            return Err(FileListingError::invalid_config(
                "mode",
                "only save dialogs write files",
            ));
        }
        let selection = self.build_selection()?;
        self.fs.write_file(&selection.path, contents)?;
        Ok(selection)
    }

    fn resort(&mut self) {
        if self.navigation.current_dir().is_some() {
            let entries = std::mem::take(&mut self.unsorted);
            self.replace_rows(entries);
        }
    }

    fn replace_rows(&mut self, entries: Vec<EntryRecord>) {
        self.destroy_rows();
        for record in &entries {
            self.insert_row(record.clone());
        }
        self.unsorted = entries;
    }

    fn insert_row(&mut self, record: EntryRecord) {
        let id = RowId(self.next_row);
        self.next_row += 1;
        let index = self
            .sort
            .insertion_index(self.rows.iter().map(|row| &row.record), &record);
        match self.rows.get(index) {
            Some(sibling) => self.view.insert_row_before(sibling.id, id, &record),
            None => self.view.insert_row_at(index, id, &record),
        }
        self.rows.insert(
            index,
            Row {
                id,
                record,
                clicks: DoubleClickDetector::new(self.threshold),
                timer: None,
            },
        );
    }

    fn destroy_rows(&mut self) {
        for row in self.rows.drain(..) {
            if let Some(timer) = row.timer {
                self.timers.disarm(timer);
            }
        }
        self.view.clear_rows();
    }

    fn persist(&mut self) -> Result<()> {
        match self.settings.as_mut() {
            Some(store) => self.config.store(store.as_mut()),
            None => Ok(()),
        }
    }

    fn report<R>(&mut self, result: Result<R>) -> Result<R> {
        if let Err(err) = &result {
            trace_failed(err);
            self.view.show_error(err);
        }
        result
    }
}

impl<F: FileSystem, V: DialogView, T: ClickTimers> Drop for FileDialogController<F, V, T> {
    fn drop(&mut self) {
        for timer in self.rows.iter_mut().filter_map(|row| row.timer.take()) {
            self.timers.disarm(timer);
        }
    }
}

#[cfg(feature = "tracing")]
fn trace_click(event: &'static str, name: &str) {
    trace!(event, name, "row click");
}

#[cfg(not(feature = "tracing"))]
fn trace_click(_event: &'static str, _name: &str) {}

#[cfg(feature = "tracing")]
fn trace_filter_changed(source: &str) {
    debug!(event = "filter.changed", filter = source, "filter applied");
}

#[cfg(not(feature = "tracing"))]
fn trace_filter_changed(_source: &str) {}

#[cfg(feature = "tracing")]
fn trace_start_fallback(start: &Path, home: &Path, err: &FileListingError) {
    debug!(
        event = "dialog.start_fallback",
        start = %start.display(),
        home = %home.display(),
        error = %err,
        "start directory unresolvable; using home"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_start_fallback(_start: &Path, _home: &Path, _err: &FileListingError) {}

#[cfg(feature = "tracing")]
fn trace_confirmed(selection: &Selection) {
    info!(
        event = "dialog.confirmed",
        mode = ?selection.mode,
        path = %selection.path.display(),
        "selection confirmed"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_confirmed(_selection: &Selection) {}

#[cfg(feature = "tracing")]
fn trace_failed(err: &FileListingError) {
    warn!(event = "dialog.failed", error = %err, "dialog operation failed");
}

#[cfg(not(feature = "tracing"))]
fn trace_failed(_err: &FileListingError) {}
