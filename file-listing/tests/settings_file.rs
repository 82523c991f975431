use std::path::PathBuf;

use file_listing::{
    Breadcrumb, BreadcrumbChange, DialogConfig, DialogMode, DialogView, DisplayColumns,
    EntryRecord, FileDialogController, FileListingError, FileSettings, ManualClickTimers, RowId,
    SettingValue, SettingsStore, StdFileSystem, TimeColumns, keys,
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

struct NullView;

impl DialogView for NullView {
    fn clear_rows(&mut self) {}
    fn insert_row_at(&mut self, _index: usize, _row: RowId, _record: &EntryRecord) {}
    fn insert_row_before(&mut self, _sibling: RowId, _row: RowId, _record: &EntryRecord) {}
    fn breadcrumb_changed(&mut self, _change: BreadcrumbChange, _breadcrumb: &Breadcrumb) {}
    fn show_error(&mut self, _error: &FileListingError) {}
}

#[test]
fn settings_file_round_trip() {
    let dir = unique_temp_dir("settings");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("file-listing.settings");

    let mut settings = FileSettings::open(&path).unwrap();
    settings
        .set(keys::FILTER, SettingValue::Text("/tab\there/i".into()))
        .unwrap();
    settings
        .set(
            keys::FILTERS,
            SettingValue::TextList(vec![r"/.*\.txt$/i".into(), "line\nbreak".into()]),
        )
        .unwrap();
    settings.set(keys::DOUBLE_CLICK_TIME, SettingValue::Int(600)).unwrap();
    settings.set(keys::SHOW_ROOT, SettingValue::Bool(true)).unwrap();
    assert!(path.is_file());

    let reopened = FileSettings::open(&path).unwrap();
    assert_eq!(
        reopened.get(keys::FILTER),
        Some(SettingValue::Text("/tab\there/i".into()))
    );
    assert_eq!(
        reopened.get(keys::FILTERS),
        Some(SettingValue::TextList(vec![
            r"/.*\.txt$/i".into(),
            "line\nbreak".into()
        ]))
    );
    assert_eq!(reopened.get(keys::DOUBLE_CLICK_TIME), Some(SettingValue::Int(600)));
    assert_eq!(reopened.get(keys::SHOW_ROOT), Some(SettingValue::Bool(true)));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn corrupt_settings_report_line() {
    let dir = unique_temp_dir("corrupt");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad.settings");
    std::fs::write(&path, "v1\nb\tshow-root\tmaybe\n").unwrap();

    let err = FileSettings::open(&path).unwrap_err();
    assert!(matches!(err, FileListingError::Settings { line: 2, .. }));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn save_dialog_persists_selection_and_preferences() {
    let dir = unique_temp_dir("save");
    let _ = std::fs::remove_dir_all(&dir);
    let target = dir.join("docs");
    let path = dir.join("file-listing.settings");

    let mut settings = FileSettings::open(&path).unwrap();
    settings
        .set(
            keys::LAST_DIR,
            SettingValue::Text(target.to_string_lossy().into_owned()),
        )
        .unwrap();

    let mut dialog = FileDialogController::from_settings(
        Box::new(settings),
        DialogMode::Save,
        StdFileSystem,
        NullView,
        ManualClickTimers::new(),
    )
    .unwrap();
    dialog.open().unwrap();
    assert_eq!(dialog.current_dir(), Some(target.clone()));

    dialog.set_file_name("out.txt").unwrap();
    let selection = dialog.save(b"data").unwrap();
    assert_eq!(selection.path, target.join("out.txt"));
    assert_eq!(std::fs::read(&selection.path).unwrap(), b"data");

    let columns = DisplayColumns {
        times: TimeColumns::MODIFIED | TimeColumns::ACCESSED,
        ..DisplayColumns::default()
    };
    dialog.set_columns(columns).unwrap();
    dialog.set_glob("*.txt, *.md").unwrap();
    drop(dialog);

    let reopened = FileSettings::open(&path).unwrap();
    assert_eq!(
        reopened.get(keys::LAST_FILE_NAME),
        Some(SettingValue::Text("out.txt".into()))
    );
    let config = DialogConfig::load(&reopened, DialogMode::Save).unwrap();
    assert_eq!(config.start_dir, Some(target));
    assert_eq!(config.file_name, "out.txt");
    assert_eq!(config.columns, columns);
    assert_eq!(config.filter_spec().unwrap().glob(), Some("*.txt, *.md"));

    std::fs::remove_dir_all(&dir).unwrap();
}
