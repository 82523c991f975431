use std::cmp::Ordering;

use crate::core::{SortField, SortOrder};
use crate::entry::EntryRecord;

/// Orders entry records by the active [`SortField`].
///
/// Directories always sort before non-directories, with `.` and `..` first
/// among them. Within each group the field decides, then names break ties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortEngine {
    field: SortField,
    order: SortOrder,
}

impl SortEngine {
    /// Engine sorting ascending by `field`.
    pub fn new(field: SortField) -> Self {
        Self {
            field,
            order: SortOrder::Ascending,
        }
    }

    /// Active field.
    pub fn field(&self) -> SortField {
        self.field
    }

    /// Active direction.
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Swap the active comparator. Callers re-sort explicitly.
    pub fn set_field(&mut self, field: SortField) {
        self.field = field;
    }

    /// Set the direction of the field comparison.
    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
    }

    /// Total order over two records.
    pub fn compare(&self, a: &EntryRecord, b: &EntryRecord) -> Ordering {
        match (a.is_directory, b.is_directory) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (true, true) if dot_rank(a) != dot_rank(b) => dot_rank(a).cmp(&dot_rank(b)),
            (true, true) | (false, false) => {
                let by_field = compare_field(self.field, a, b);
                let by_field = match self.order {
                    SortOrder::Ascending => by_field,
                    SortOrder::Descending => by_field.reverse(),
                };
                by_field.then_with(|| locale_compare(&a.name, &b.name))
            }
        }
    }

    /// Fresh ordered copy of `entries`; the input order does not matter.
    pub fn sorted(&self, entries: &[EntryRecord]) -> Vec<EntryRecord> {
        let mut out = entries.to_vec();
        out.sort_by(|a, b| self.compare(a, b));
        out
    }

    /// Index at which `record` goes in the already sorted `rows`: before the
    /// first row it does not sort after.
    pub fn insertion_index<'a, I>(&self, rows: I, record: &EntryRecord) -> usize
    where
        I: IntoIterator<Item = &'a EntryRecord>,
    {
        let mut len = 0;
        for (i, row) in rows.into_iter().enumerate() {
            if self.compare(record, row) != Ordering::Greater {
                return i;
            }
            len = i + 1;
        }
        len
    }
}

// `.` then `..` lead the directories in either order.
fn dot_rank(record: &EntryRecord) -> u8 {
    match record.name.as_str() {
        "." => 0,
        ".." => 1,
        _ => 2,
    }
}

fn compare_field(field: SortField, a: &EntryRecord, b: &EntryRecord) -> Ordering {
    match field {
        SortField::Name => locale_compare(&a.name, &b.name),
        SortField::Inode => a.inode.cmp(&b.inode),
        SortField::Mode => a.mode.cmp(&b.mode),
        SortField::LinkCount => a.link_count.cmp(&b.link_count),
        SortField::Created => a.created_at.cmp(&b.created_at),
        SortField::Modified => a.modified_at.cmp(&b.modified_at),
        SortField::Accessed => a.accessed_at.cmp(&b.accessed_at),
        SortField::Owner => locale_compare(&a.owner_user, &b.owner_user),
        SortField::Group => locale_compare(&a.owner_group, &b.owner_group),
        SortField::Size => a.size_bytes.cmp(&b.size_bytes),
    }
}

/// Locale-style string comparison.
///
/// Case-folded text decides first, then lowercase sorts before uppercase at
/// the first differing position, then raw code points.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}
