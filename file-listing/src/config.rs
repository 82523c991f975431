use std::path::PathBuf;

use crate::click::{DEFAULT_DOUBLE_CLICK_MS, DoubleClickThreshold};
use crate::columns::{DisplayColumns, OwnerColumns, TimeColumns};
use crate::core::{DialogMode, FileListingError, Result, Selection, SortField};
use crate::filter::FilterSpec;
use crate::pattern::{DEFAULT_FLAGS, MATCH_ALL, parse_pattern};
use crate::settings::{
    SettingValue, SettingsStore, get_bool, get_int, get_text, get_text_list, keys,
};

/// File name offered when none is configured.
pub const DEFAULT_FILE_NAME: &str = "notes.txt";
/// Default row icon size in pixels.
pub const DEFAULT_ICON_SIZE: u32 = 48;
/// Smallest accepted icon size.
pub const MIN_ICON_SIZE: u32 = 16;
/// Largest accepted icon size.
pub const MAX_ICON_SIZE: u32 = 256;

/// Every option a dialog recognizes, with its default.
///
/// Check with [`DialogConfig::validate`]; the controller refuses invalid
/// configurations at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogConfig {
    /// Dialog mode.
    pub mode: DialogMode,
    /// Initial directory; `None` starts at home.
    pub start_dir: Option<PathBuf>,
    /// Initially selected file name.
    pub file_name: String,
    /// Active filter, bare regex or `/regex/flags`.
    pub filter: String,
    /// Flags for a bare-regex `filter`.
    pub filter_flags: String,
    /// Filters offered for selection.
    pub filters: Vec<String>,
    /// Double-click threshold in milliseconds.
    pub double_click_ms: u32,
    /// Row icon size in pixels.
    pub icon_size: u32,
    /// Breadcrumb starts at the root even under home.
    pub show_root: bool,
    /// Initial sort field.
    pub sort_field: SortField,
    /// Visible columns.
    pub columns: DisplayColumns,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            mode: DialogMode::Open,
            start_dir: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            filter: MATCH_ALL.to_string(),
            filter_flags: DEFAULT_FLAGS.to_string(),
            filters: Vec::new(),
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            icon_size: DEFAULT_ICON_SIZE,
            show_root: false,
            sort_field: SortField::Name,
            columns: DisplayColumns::default(),
        }
    }
}

impl DialogConfig {
    /// Defaults for `mode`.
    pub fn new(mode: DialogMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Set the initial directory.
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    /// Set the initial file name.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Set the active filter.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Set the selectable filters.
    pub fn filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = filters.into_iter().map(Into::into).collect();
        self
    }

    /// Set the double-click threshold.
    pub fn double_click_ms(mut self, ms: u32) -> Self {
        self.double_click_ms = ms;
        self
    }

    /// Set the visible columns.
    pub fn columns(mut self, columns: DisplayColumns) -> Self {
        self.columns = columns;
        self
    }

    /// Check every option.
    pub fn validate(&self) -> Result<()> {
        self.double_click_threshold()?;
        if !(MIN_ICON_SIZE..=MAX_ICON_SIZE).contains(&self.icon_size) {
            return Err(FileListingError::invalid_config(
                keys::ICON_SIZE,
                format!(
                    "{} is outside {MIN_ICON_SIZE}..={MAX_ICON_SIZE}",
                    self.icon_size
                ),
            ));
        }
        if self.file_name.contains(['/', '\\']) {
            return Err(FileListingError::invalid_config(
                keys::LAST_FILE_NAME,
                "file name must not contain a path separator",
            ));
        }
        self.filter_spec()?;
        self.filter_specs()?;
        Ok(())
    }

    /// Validated double-click threshold.
    pub fn double_click_threshold(&self) -> Result<DoubleClickThreshold> {
        DoubleClickThreshold::from_millis(self.double_click_ms)
    }

    /// Compiled active filter.
    pub fn filter_spec(&self) -> Result<FilterSpec> {
        Ok(FilterSpec::new(parse_pattern(self.filter.as_str(), &self.filter_flags)?))
    }

    /// Compiled selectable filters.
    pub fn filter_specs(&self) -> Result<Vec<FilterSpec>> {
        self.filters
            .iter()
            .map(|f| FilterSpec::parse(f, &self.filter_flags))
            .collect()
    }

    /// Defaults for `mode` overlaid with whatever `store` holds, validated.
    pub fn load(store: &dyn SettingsStore, mode: DialogMode) -> Result<Self> {
        let mut config = Self::new(mode);
        if let Some(ms) = get_int(store, keys::DOUBLE_CLICK_TIME)? {
            config.double_click_ms = to_u32(keys::DOUBLE_CLICK_TIME, ms)?;
        }
        if let Some(filter) = get_text(store, keys::FILTER)? {
            config.filter = filter;
        }
        if let Some(filters) = get_text_list(store, keys::FILTERS)? {
            config.filters = filters;
        }
        if let Some(v) = get_bool(store, keys::DISPLAY_INODE)? {
            config.columns.inode = v;
        }
        if let Some(v) = get_bool(store, keys::DISPLAY_MODE)? {
            config.columns.mode = v;
        }
        if let Some(v) = get_bool(store, keys::DISPLAY_NUMBER_LINKS)? {
            config.columns.link_count = v;
        }
        if let Some(v) = get_bool(store, keys::DISPLAY_SIZE)? {
            config.columns.size = v;
        }
        if let Some(v) = get_bool(store, keys::BASE2_FILE_SIZES)? {
            config.columns.base2_sizes = v;
        }
        if let Some(bits) = get_int(store, keys::TIME_TYPE)? {
            config.columns.times = TimeColumns::from_bits(to_u32(keys::TIME_TYPE, bits)?)
                .ok_or_else(|| FileListingError::invalid_config(keys::TIME_TYPE, "unknown bits"))?;
        }
        if let Some(bits) = get_int(store, keys::USER_GROUP)? {
            config.columns.owner = OwnerColumns::from_bits(to_u32(keys::USER_GROUP, bits)?)
                .ok_or_else(|| FileListingError::invalid_config(keys::USER_GROUP, "unknown bits"))?;
        }
        if let Some(size) = get_int(store, keys::ICON_SIZE)? {
            config.icon_size = to_u32(keys::ICON_SIZE, size)?;
        }
        if let Some(v) = get_bool(store, keys::SHOW_ROOT)? {
            config.show_root = v;
        }
        if let Some(dir) = get_text(store, keys::LAST_DIR)? {
            config.start_dir = Some(PathBuf::from(dir));
        }
        if let Some(name) = get_text(store, keys::LAST_FILE_NAME)? {
            config.file_name = name;
        }
        config.validate()?;
        Ok(config)
    }

    /// Write display preferences and the active filter to `store`.
    pub fn store(&self, store: &mut dyn SettingsStore) -> Result<()> {
        let c = &self.columns;
        store.set(
            keys::DOUBLE_CLICK_TIME,
            SettingValue::Int(i64::from(self.double_click_ms)),
        )?;
        store.set(keys::FILTER, SettingValue::Text(self.filter.clone()))?;
        store.set(keys::FILTERS, SettingValue::TextList(self.filters.clone()))?;
        store.set(keys::DISPLAY_INODE, SettingValue::Bool(c.inode))?;
        store.set(keys::DISPLAY_MODE, SettingValue::Bool(c.mode))?;
        store.set(keys::DISPLAY_NUMBER_LINKS, SettingValue::Bool(c.link_count))?;
        store.set(keys::DISPLAY_SIZE, SettingValue::Bool(c.size))?;
        store.set(keys::BASE2_FILE_SIZES, SettingValue::Bool(c.base2_sizes))?;
        store.set(keys::TIME_TYPE, SettingValue::Int(i64::from(c.times.bits())))?;
        store.set(keys::USER_GROUP, SettingValue::Int(i64::from(c.owner.bits())))?;
        store.set(keys::ICON_SIZE, SettingValue::Int(i64::from(self.icon_size)))?;
        store.set(keys::SHOW_ROOT, SettingValue::Bool(self.show_root))?;
        Ok(())
    }
}

/// Remember a confirmed selection as the next dialog's starting point.
pub fn remember_selection(store: &mut dyn SettingsStore, selection: &Selection) -> Result<()> {
    store.set(
        keys::LAST_DIR,
        SettingValue::Text(selection.dir.to_string_lossy().into_owned()),
    )?;
    if selection.mode != DialogMode::SelectDir
        && let Some(name) = selection.path.file_name()
    {
        store.set(
            keys::LAST_FILE_NAME,
            SettingValue::Text(name.to_string_lossy().into_owned()),
        )?;
    }
    Ok(())
}

fn to_u32(key: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| FileListingError::invalid_config(key, format!("{value} is out of range")))
}
