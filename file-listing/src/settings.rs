//! Persistent key/value settings.
//!
//! The file format is line based: a `v1` version token, then one setting per
//! line as tab-separated fields `kind<TAB>key<TAB>value...` where kind is `b`
//! (bool), `i` (integer), `s` (text) or `l` (text list, one field per item).
//! Backslash, tab, CR and LF inside fields are escaped.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::core::{FileListingError, Result};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Well-known setting keys.
pub mod keys {
    /// Double-click threshold in milliseconds.
    pub const DOUBLE_CLICK_TIME: &str = "double-click-time";
    /// Active filter pattern, `/regex/flags`.
    pub const FILTER: &str = "filter";
    /// Selectable filter patterns.
    pub const FILTERS: &str = "filters";
    /// Show the inode column.
    pub const DISPLAY_INODE: &str = "display-inode";
    /// Show the permissions column.
    pub const DISPLAY_MODE: &str = "display-mode";
    /// Show the link count column.
    pub const DISPLAY_NUMBER_LINKS: &str = "display-number-links";
    /// Show the size column.
    pub const DISPLAY_SIZE: &str = "display-size";
    /// Sizes in powers of 1024.
    pub const BASE2_FILE_SIZES: &str = "base2-file-sizes";
    /// Timestamp column bits (1 created, 2 modified, 4 accessed).
    pub const TIME_TYPE: &str = "time-type";
    /// Ownership column bits (1 user, 2 group).
    pub const USER_GROUP: &str = "user-group";
    /// Row icon size in pixels.
    pub const ICON_SIZE: &str = "icon-size";
    /// Breadcrumb starts at the root.
    pub const SHOW_ROOT: &str = "show-root";
    /// Last confirmed directory.
    pub const LAST_DIR: &str = "last-dir";
    /// Last confirmed file name.
    pub const LAST_FILE_NAME: &str = "last-file-name";
}

/// Typed setting value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingValue {
    /// Boolean toggle.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Text.
    Text(String),
    /// List of texts.
    TextList(Vec<String>),
}

impl SettingValue {
    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The integer, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The text, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// The list, if this is one.
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            SettingValue::TextList(v) => Some(v),
            _ => None,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "bool",
            SettingValue::Int(_) => "integer",
            SettingValue::Text(_) => "text",
            SettingValue::TextList(_) => "text list",
        }
    }
}

/// Get/set boundary to wherever user preferences live.
pub trait SettingsStore {
    /// Current value of `key`.
    fn get(&self, key: &str) -> Option<SettingValue>;
    /// Store `value` under `key`.
    fn set(&mut self, key: &str, value: SettingValue) -> Result<()>;
}

/// Read `key` expecting a bool.
pub(crate) fn get_bool(store: &dyn SettingsStore, key: &str) -> Result<Option<bool>> {
    typed(store, key, "bool", SettingValue::as_bool)
}

/// Read `key` expecting an integer.
pub(crate) fn get_int(store: &dyn SettingsStore, key: &str) -> Result<Option<i64>> {
    typed(store, key, "integer", SettingValue::as_int)
}

/// Read `key` expecting text.
pub(crate) fn get_text(store: &dyn SettingsStore, key: &str) -> Result<Option<String>> {
    typed(store, key, "text", |v| v.as_text().map(str::to_string))
}

/// Read `key` expecting a text list.
pub(crate) fn get_text_list(store: &dyn SettingsStore, key: &str) -> Result<Option<Vec<String>>> {
    typed(store, key, "text list", |v| v.as_text_list().map(<[String]>::to_vec))
}

fn typed<T>(
    store: &dyn SettingsStore,
    key: &str,
    expected: &str,
    extract: impl Fn(&SettingValue) -> Option<T>,
) -> Result<Option<T>> {
    match store.get(key) {
        None => Ok(None),
        Some(value) => extract(&value).map(Some).ok_or_else(|| {
            FileListingError::invalid_config(
                key,
                format!("expected {expected}, found {}", value.kind_name()),
            )
        }),
    }
}

/// In-memory store that keeps insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySettings {
    values: IndexMap<String, SettingValue>,
}

impl MemorySettings {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serialize into the compact `v1` text format.
    pub fn serialize_compact(&self) -> String {
        let mut out = String::new();
        out.push_str("v1\n");
        for (key, value) in &self.values {
            let (kind, fields) = match value {
                SettingValue::Bool(v) => ("b", vec![(if *v { "1" } else { "0" }).to_string()]),
                SettingValue::Int(v) => ("i", vec![v.to_string()]),
                SettingValue::Text(v) => ("s", vec![escape_field(v)]),
                SettingValue::TextList(items) => ("l", items.iter().map(|v| escape_field(v)).collect()),
            };
            out.push_str(kind);
            out.push('\t');
            out.push_str(&escape_field(key));
            for field in fields {
                out.push('\t');
                out.push_str(&field);
            }
            out.push('\n');
        }
        out
    }

    /// Parse the compact `v1` text format. Blank input yields an empty store.
    pub fn deserialize_compact(input: &str) -> Result<Self> {
        let mut settings = Self::new();
        let mut version_ok = false;

        for (line_idx, raw_line) in input.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = raw_line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            if !version_ok {
                if line == "v1" {
                    version_ok = true;
                    continue;
                }
                return Err(parse_error(line_no, "missing or unsupported version token"));
            }

            let mut fields = line.split('\t');
            let kind = fields.next().unwrap_or_default();
            let key = fields
                .next()
                .ok_or_else(|| parse_error(line_no, "missing key field"))
                .and_then(|k| unescape_field(k).map_err(|m| parse_error(line_no, m)))?;
            let values = fields
                .map(|f| unescape_field(f).map_err(|m| parse_error(line_no, m)))
                .collect::<Result<Vec<_>>>()?;

            let value = match kind {
                "l" => SettingValue::TextList(values),
                "b" | "i" | "s" => {
                    let [single] = <[String; 1]>::try_from(values)
                        .map_err(|_| parse_error(line_no, "expected exactly one value field"))?;
                    match kind {
                        "b" => match single.as_str() {
                            "1" => SettingValue::Bool(true),
                            "0" => SettingValue::Bool(false),
                            _ => return Err(parse_error(line_no, "invalid bool value")),
                        },
                        "i" => SettingValue::Int(
                            single
                                .parse()
                                .map_err(|_| parse_error(line_no, "invalid integer value"))?,
                        ),
                        _ => SettingValue::Text(single),
                    }
                }
                _ => return Err(parse_error(line_no, "unknown kind")),
            };
            settings.values.insert(key, value);
        }

        Ok(settings)
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: SettingValue) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store persisted to a settings file; every `set` writes the file.
#[derive(Clone, Debug)]
pub struct FileSettings {
    path: PathBuf,
    values: MemorySettings,
}

impl FileSettings {
    /// Load `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => MemorySettings::deserialize_compact(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace_settings_missing(&path);
                MemorySettings::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all values to the backing file.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, self.values.serialize_compact()).inspect_err(|e| {
            trace_settings_write_failed(&self.path, e);
        })?;
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: SettingValue) -> Result<()> {
        if self.values.get(key).as_ref() == Some(&value) {
            return Ok(());
        }
        self.values.set(key, value)?;
        self.save()
    }
}

fn parse_error(line: usize, message: &str) -> FileListingError {
    FileListingError::Settings {
        line,
        message: message.to_string(),
    }
}

fn escape_field(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape_field(s: &str) -> std::result::Result<String, &'static str> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(esc) = chars.next() else {
            return Err("dangling escape");
        };
        match esc {
            '\\' => out.push('\\'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            _ => return Err("unknown escape"),
        }
    }
    Ok(out)
}

#[cfg(feature = "tracing")]
fn trace_settings_missing(path: &Path) {
    debug!(event = "settings.missing", path = %path.display(), "settings file not found; using defaults");
}

#[cfg(not(feature = "tracing"))]
fn trace_settings_missing(_path: &Path) {}

#[cfg(feature = "tracing")]
fn trace_settings_write_failed(path: &Path, err: &std::io::Error) {
    warn!(event = "settings.write_failed", path = %path.display(), error = %err, "cannot write settings");
}

#[cfg(not(feature = "tracing"))]
fn trace_settings_write_failed(_path: &Path, _err: &std::io::Error) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemorySettings {
        let mut s = MemorySettings::new();
        s.set(keys::DOUBLE_CLICK_TIME, SettingValue::Int(800)).unwrap();
        s.set(keys::DISPLAY_INODE, SettingValue::Bool(true)).unwrap();
        s.set(keys::FILTER, SettingValue::Text("/.*\\.txt$/i".into())).unwrap();
        s.set(
            keys::FILTERS,
            SettingValue::TextList(vec!["/^.*$/i".into(), "tab\there".into()]),
        )
        .unwrap();
        s
    }

    #[test]
    fn compact_format_layout() {
        let text = sample().serialize_compact();
        assert_eq!(
            text,
            "v1\ni\tdouble-click-time\t800\nb\tdisplay-inode\t1\ns\tfilter\t/.*\\\\.txt$/i\nl\tfilters\t/^.*$/i\ttab\\there\n"
        );
        assert_eq!(MemorySettings::deserialize_compact(&text).unwrap(), sample());
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        let err = MemorySettings::deserialize_compact("v1\nb\tx\tmaybe\n").unwrap_err();
        assert!(matches!(err, FileListingError::Settings { line: 2, .. }));
        let err = MemorySettings::deserialize_compact("v2\n").unwrap_err();
        assert!(matches!(err, FileListingError::Settings { line: 1, .. }));
        let err = MemorySettings::deserialize_compact("v1\n\ni\tx\t1\t2\n").unwrap_err();
        assert!(matches!(err, FileListingError::Settings { line: 3, .. }));
        let err = MemorySettings::deserialize_compact("v1\nq\tx\t1\n").unwrap_err();
        assert!(err.to_string().contains("unknown kind"));
        let err = MemorySettings::deserialize_compact("v1\ns\tx\tbad\\q\n").unwrap_err();
        assert!(err.to_string().contains("unknown escape"));
    }

    #[test]
    fn typed_reads_reject_wrong_kinds() {
        let s = sample();
        assert_eq!(get_int(&s, keys::DOUBLE_CLICK_TIME).unwrap(), Some(800));
        assert_eq!(get_bool(&s, keys::ICON_SIZE).unwrap(), None);
        let err = get_bool(&s, keys::DOUBLE_CLICK_TIME).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid setting 'double-click-time': expected bool, found integer"
        );
        assert_eq!(get_text_list(&s, keys::FILTERS).unwrap().map(|v| v.len()), Some(2));
        assert!(get_text(&s, keys::FILTERS).is_err());
    }

    #[test]
    fn empty_list_round_trips() {
        let mut s = MemorySettings::new();
        s.set("empty", SettingValue::TextList(Vec::new())).unwrap();
        let back = MemorySettings::deserialize_compact(&s.serialize_compact()).unwrap();
        assert_eq!(back.get("empty"), Some(SettingValue::TextList(Vec::new())));
    }
}
