use std::path::PathBuf;

use thiserror::Error;

/// Result type for file-listing operations.
pub type Result<T> = std::result::Result<T, FileListingError>;

/// Dialog mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DialogMode {
    /// Pick an existing file.
    #[default]
    Open,
    /// Choose a file name to save to.
    Save,
    /// Pick a directory; non-directory entries are never listed.
    SelectDir,
}

/// Field an entry listing is ordered by.
///
/// Whatever the field, directories always come before non-directories and
/// equal field values fall back to comparing names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Entry name.
    #[default]
    Name,
    /// Inode number.
    Inode,
    /// Raw mode bits.
    Mode,
    /// Hard link count.
    LinkCount,
    /// Creation time.
    Created,
    /// Last modification time.
    Modified,
    /// Last access time.
    Accessed,
    /// Owning user name.
    Owner,
    /// Owning group name.
    Group,
    /// Size in bytes.
    Size,
}

impl SortField {
    /// All sort fields in column order.
    pub const ALL: [SortField; 10] = [
        SortField::Name,
        SortField::Inode,
        SortField::Mode,
        SortField::LinkCount,
        SortField::Created,
        SortField::Modified,
        SortField::Accessed,
        SortField::Owner,
        SortField::Group,
        SortField::Size,
    ];

    /// Stable identifier, also used when persisting the active field.
    pub fn key(self) -> &'static str {
        match self {
            SortField::Name => "file_name",
            SortField::Inode => "inode_number",
            SortField::Mode => "mode",
            SortField::LinkCount => "nlink",
            SortField::Created => "create_time",
            SortField::Modified => "modification_time",
            SortField::Accessed => "access_time",
            SortField::Owner => "user_name",
            SortField::Group => "group_name",
            SortField::Size => "file_size",
        }
    }

    /// Parse an identifier produced by [`SortField::key`].
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Direction of the field comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first. Directories still come first.
    Descending,
}

/// Pointer button reported by the host for a row press/release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Primary (usually left) button.
    Primary,
    /// Middle button.
    Middle,
    /// Secondary (usually right) button.
    Secondary,
    /// Any other button, by host index.
    Other(u8),
}

/// Keyboard modifier keys held during a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Ctrl key held.
    pub ctrl: bool,
    /// Shift key held.
    pub shift: bool,
    /// Alt key held.
    pub alt: bool,
}

/// Result of a confirmed dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Mode the dialog ran in.
    pub mode: DialogMode,
    /// Directory that was displayed on confirm.
    pub dir: PathBuf,
    /// Selected path: the directory itself for [`DialogMode::SelectDir`],
    /// otherwise the directory joined with the selected file name.
    pub path: PathBuf,
}

/// Errors raised by the listing engine.
#[derive(Error, Debug)]
pub enum FileListingError {
    /// A path could not be resolved into segments.
    #[error("cannot resolve path '{path}': {reason}")]
    PathResolution {
        /// Offending path.
        path: PathBuf,
        /// Why resolution failed.
        reason: String,
    },
    /// A directory could not be listed.
    #[error("cannot list directory '{path}': {source}")]
    Enumeration {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// A user-supplied glob or regular expression is invalid.
    #[error("invalid pattern '{pattern}': {message}")]
    Pattern {
        /// Pattern as typed.
        pattern: String,
        /// Why it was rejected.
        message: String,
    },
    /// A directory could not be created.
    #[error("cannot create directory '{path}': {source}")]
    DirectoryCreation {
        /// Directory being created.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// A configuration value is out of range or malformed.
    #[error("invalid setting '{setting}': {reason}")]
    InvalidConfig {
        /// Settings key.
        setting: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// A persisted settings file could not be parsed.
    #[error("settings error at line {line}: {message}")]
    Settings {
        /// 1-based line number.
        line: usize,
        /// Parse failure.
        message: String,
    },
    /// Other I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FileListingError {
    pub(crate) fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(setting: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            setting: setting.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error is recoverable by falling back to a default path.
    pub fn is_path_resolution(&self) -> bool {
        matches!(self, Self::PathResolution { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_keys_round_trip() {
        for field in SortField::ALL {
            assert_eq!(SortField::from_key(field.key()), Some(field));
        }
        assert_eq!(SortField::from_key("colour"), None);
    }

    #[test]
    fn errors_render_context() {
        let err = FileListingError::Enumeration {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "cannot list directory '/nope': gone");
        let err = FileListingError::invalid_config("icon-size", "must be within 16..=256");
        assert_eq!(
            err.to_string(),
            "invalid setting 'icon-size': must be within 16..=256"
        );
    }
}
