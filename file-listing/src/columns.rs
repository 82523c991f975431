use std::time::SystemTime;

use bitflags::bitflags;

use crate::core::SortField;
use crate::entry::{EntryRecord, permissions_string};

bitflags! {
    /// Timestamp columns to display.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TimeColumns: u32 {
        /// Creation time.
        const CREATED = 1 << 0;
        /// Modification time.
        const MODIFIED = 1 << 1;
        /// Access time.
        const ACCESSED = 1 << 2;
    }
}

bitflags! {
    /// Ownership columns to display.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OwnerColumns: u32 {
        /// Owning user.
        const USER = 1 << 0;
        /// Owning group.
        const GROUP = 1 << 1;
    }
}

/// Which columns a listing shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayColumns {
    /// Inode number column.
    pub inode: bool,
    /// Permission string column.
    pub mode: bool,
    /// Hard link count column.
    pub link_count: bool,
    /// Size column.
    pub size: bool,
    /// Show sizes in KiB/MiB/... instead of kB/MB/...
    pub base2_sizes: bool,
    /// Timestamp columns.
    pub times: TimeColumns,
    /// Ownership columns.
    pub owner: OwnerColumns,
}

impl Default for DisplayColumns {
    fn default() -> Self {
        Self {
            inode: false,
            mode: true,
            link_count: false,
            size: true,
            base2_sizes: false,
            times: TimeColumns::MODIFIED,
            owner: OwnerColumns::USER | OwnerColumns::GROUP,
        }
    }
}

/// A listing column, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    /// Inode number.
    Inode,
    /// Permission string.
    Mode,
    /// Hard link count.
    LinkCount,
    /// Decorated name; always shown.
    Name,
    /// Creation time.
    Created,
    /// Modification time.
    Modified,
    /// Access time.
    Accessed,
    /// Owning user.
    User,
    /// Owning group.
    Group,
    /// Size.
    Size,
}

impl Column {
    /// Header text.
    pub fn label(self) -> &'static str {
        match self {
            Column::Inode => "Inode Number",
            Column::Mode => "Permissions",
            Column::LinkCount => "#Link",
            Column::Name => "File Name",
            Column::Created => "Create",
            Column::Modified => "Modification Time",
            Column::Accessed => "Access",
            Column::User => "User",
            Column::Group => "Group",
            Column::Size => "File Size",
        }
    }

    /// Sort field activated by this column's header.
    pub fn sort_field(self) -> SortField {
        match self {
            Column::Inode => SortField::Inode,
            Column::Mode => SortField::Mode,
            Column::LinkCount => SortField::LinkCount,
            Column::Name => SortField::Name,
            Column::Created => SortField::Created,
            Column::Modified => SortField::Modified,
            Column::Accessed => SortField::Accessed,
            Column::User => SortField::Owner,
            Column::Group => SortField::Group,
            Column::Size => SortField::Size,
        }
    }
}

/// Visible columns in display order.
pub fn visible_columns(columns: &DisplayColumns) -> Vec<Column> {
    let candidates = [
        (Column::Inode, columns.inode),
        (Column::Mode, columns.mode),
        (Column::LinkCount, columns.link_count),
        (Column::Name, true),
        (Column::Created, columns.times.contains(TimeColumns::CREATED)),
        (Column::Modified, columns.times.contains(TimeColumns::MODIFIED)),
        (Column::Accessed, columns.times.contains(TimeColumns::ACCESSED)),
        (Column::User, columns.owner.contains(OwnerColumns::USER)),
        (Column::Group, columns.owner.contains(OwnerColumns::GROUP)),
        (Column::Size, columns.size),
    ];
    candidates
        .into_iter()
        .filter_map(|(column, shown)| shown.then_some(column))
        .collect()
}

/// Text of one cell.
pub fn cell_text(record: &EntryRecord, column: Column, columns: &DisplayColumns) -> String {
    match column {
        Column::Inode => record.inode.to_string(),
        Column::Mode => permissions_string(record),
        Column::LinkCount => record.link_count.to_string(),
        Column::Name => record.display_name.clone(),
        Column::Created => format_timestamp(record.created_at),
        Column::Modified => format_timestamp(record.modified_at),
        Column::Accessed => format_timestamp(record.accessed_at),
        Column::User => record.owner_user.clone(),
        Column::Group => record.owner_group.clone(),
        Column::Size => format_file_size(record.size_bytes, columns.base2_sizes),
    }
}

/// Cell texts of a row, one per visible column.
pub fn row_cells(record: &EntryRecord, columns: &DisplayColumns) -> Vec<String> {
    visible_columns(columns)
        .into_iter()
        .map(|column| cell_text(record, column, columns))
        .collect()
}

/// Compact size: whole units of 1000 (`kB`, `MB`, ...) or, with `base2`,
/// of 1024 (`KiB`, `MiB`, ...). Below one unit the size is in bytes.
pub fn format_file_size(size: u64, base2: bool) -> String {
    const DECIMAL: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];
    const BINARY: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
    let (base, units) = if base2 {
        (1024.0, BINARY)
    } else {
        (1000.0, DECIMAL)
    };
    let mut scaled = size as f64;
    let mut unit = 0;
    while scaled >= base && unit < units.len() - 1 {
        scaled /= base;
        unit += 1;
    }
    let mut rounded = scaled.round();
    if rounded >= base && unit < units.len() - 1 {
        rounded = (rounded / base).round();
        unit += 1;
    }
    format!("{rounded:.0}{}", units[unit])
}

/// Local `YYYY-MM-DD HH:MM:SS`; empty when unknown.
pub fn format_timestamp(time: Option<SystemTime>) -> String {
    use chrono::{DateTime, Local};
    match time {
        Some(t) => {
            let dt: DateTime<Local> = DateTime::<Local>::from(t);
            dt.format("%Y-%m-%d %H:%M:%S").to_string()
        }
        None => String::new(),
    }
}
