use std::path::PathBuf;
use std::time::SystemTime;

use crate::fs::{FileKind, FileSystem, FsEntry, SpecialKind};

#[cfg(feature = "tracing")]
use tracing::debug;

const EXEC_BITS: u32 = 0o111;

/// One listed filesystem entry, ready for display.
///
/// Built fresh for every listing and never mutated afterwards.
/// `is_directory` and `is_special` are mutually exclusive; `is_symlink` is
/// orthogonal (a symlink to a directory has both `is_symlink` and
/// `is_directory` set).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryRecord {
    /// Raw name as enumerated.
    pub name: String,
    /// Name with its type decoration (see [`decorated_name`]).
    pub display_name: String,
    /// Full path.
    pub path: PathBuf,
    /// Raw node type, symlinks not followed.
    pub kind: FileKind,
    /// Directory, or symlink resolving to one.
    pub is_directory: bool,
    /// Symbolic link.
    pub is_symlink: bool,
    /// Device, socket or FIFO.
    pub is_special: bool,
    /// Regular file with any execute bit set.
    pub is_executable: bool,
    /// Result of the secondary type probe for special nodes; `None` when the
    /// probe failed or the node is not special.
    pub special_kind: Option<SpecialKind>,
    /// Raw mode bits.
    pub mode: u32,
    /// Inode number.
    pub inode: u64,
    /// Hard link count.
    pub link_count: u64,
    /// Owning user name.
    pub owner_user: String,
    /// Owning group name.
    pub owner_group: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Creation time.
    pub created_at: Option<SystemTime>,
    /// Last modification time.
    pub modified_at: Option<SystemTime>,
    /// Last access time.
    pub accessed_at: Option<SystemTime>,
    /// Link target, empty when not a symlink.
    pub symlink_target: String,
}

/// Turn raw metadata into a display record.
///
/// Symlinks are probed for a directory target; a failed probe (dangling link,
/// permission) leaves `is_directory` false and the link is still listed.
pub fn classify(fs: &dyn FileSystem, raw: FsEntry) -> EntryRecord {
    let is_symlink = raw.kind == FileKind::Symlink;
    let is_directory = match raw.kind {
        FileKind::Directory => true,
        FileKind::Symlink => fs.probe_dir(&raw.path).unwrap_or_else(|err| {
            trace_probe_failed("symlink-target", &raw.path, &err);
            false
        }),
        _ => false,
    };
    let is_special = raw.kind == FileKind::Special;
    let special_kind = if is_special {
        match fs.special_kind(&raw.path) {
            Ok(kind) => kind,
            Err(err) => {
                trace_probe_failed("special-kind", &raw.path, &err);
                None
            }
        }
    } else {
        None
    };
    let is_executable = raw.kind == FileKind::Regular && raw.mode & EXEC_BITS != 0;
    let target_is_executable = raw.target_mode.is_some_and(|m| m & EXEC_BITS != 0);
    let symlink_target = raw
        .symlink_target
        .as_ref()
        .map(|t| t.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut record = EntryRecord {
        display_name: String::new(),
        name: raw.name,
        path: raw.path,
        kind: raw.kind,
        is_directory,
        is_symlink,
        is_special,
        is_executable,
        special_kind,
        mode: raw.mode,
        inode: raw.inode,
        link_count: raw.link_count,
        owner_user: raw.user,
        owner_group: raw.group,
        size_bytes: raw.size,
        created_at: raw.created,
        modified_at: raw.modified,
        accessed_at: raw.accessed,
        symlink_target,
    };
    record.display_name = decorate(&record, target_is_executable);
    record
}

/// Decorated display name of a classified record.
///
/// Trailing slashes are stripped, then:
/// - symlink: `name -> target`, plus `/` for a directory target or `*` for an
///   executable one
/// - directory: trailing `/`
/// - special: `=` socket, `|` FIFO, nothing for devices, `?` if the type probe
///   failed
/// - executable regular file: trailing `*`
/// - anything else: `???`
pub fn decorated_name(record: &EntryRecord) -> &str {
    &record.display_name
}

fn decorate(record: &EntryRecord, target_is_executable: bool) -> String {
    let name = record.name.trim_end_matches('/');
    match record.kind {
        FileKind::Symlink => {
            let target = record.symlink_target.trim_end_matches('/');
            let suffix = if record.is_directory {
                "/"
            } else if target_is_executable {
                "*"
            } else {
                ""
            };
            format!("{name} -> {target}{suffix}")
        }
        FileKind::Directory => format!("{name}/"),
        FileKind::Special => {
            let suffix = match record.special_kind {
                Some(SpecialKind::Socket) => "=",
                Some(SpecialKind::Fifo) => "|",
                Some(SpecialKind::BlockDevice) | Some(SpecialKind::CharDevice) => "",
                None => "?",
            };
            format!("{name}{suffix}")
        }
        FileKind::Regular if record.is_executable => format!("{name}*"),
        FileKind::Regular => name.to_string(),
        FileKind::Unknown => format!("{name}???"),
    }
}

/// `ls -l` style permission string: a type char followed by three `rwx`
/// triplets.
///
/// The type char is `l`, `d`, `S`/`b`/`c`/`|` for special nodes (`|` when the
/// probe failed), `.` for regular files and `?` otherwise. Set-id bits show as
/// `s` and the sticky bit as `T` in place of an execute `x`.
pub fn permissions_string(record: &EntryRecord) -> String {
    let mut out = String::with_capacity(10);
    out.push(match record.kind {
        FileKind::Symlink => 'l',
        FileKind::Directory => 'd',
        FileKind::Special => match record.special_kind {
            Some(SpecialKind::Socket) => 'S',
            Some(SpecialKind::BlockDevice) => 'b',
            Some(SpecialKind::CharDevice) => 'c',
            Some(SpecialKind::Fifo) | None => '|',
        },
        FileKind::Regular => '.',
        FileKind::Unknown => '?',
    });

    let perms = record.mode & 0o7777;
    if perms == 0 {
        out.push_str("---------");
        return out;
    }
    let triplets = [
        (0o400, 0o200, 0o100, 0o4000, 's'),
        (0o040, 0o020, 0o010, 0o2000, 's'),
        (0o004, 0o002, 0o001, 0o1000, 'T'),
    ];
    for (r, w, x, special, special_char) in triplets {
        out.push(if perms & r != 0 { 'r' } else { '-' });
        out.push(if perms & w != 0 { 'w' } else { '-' });
        out.push(match (perms & x != 0, perms & special != 0) {
            (true, true) => special_char,
            (true, false) => 'x',
            (false, _) => '-',
        });
    }
    out
}

/// Record for a synthetic `.` or `..` row pointing at `raw`.
pub(crate) fn synthetic(fs: &dyn FileSystem, name: &str, raw: FsEntry) -> EntryRecord {
    let mut record = classify(fs, raw);
    // `.` and `..` are shown bare.
    record.name = name.to_string();
    record.display_name = name.to_string();
    record.is_directory = true;
    record.is_special = false;
    record
}

#[cfg(feature = "tracing")]
fn trace_probe_failed(probe: &'static str, path: &std::path::Path, err: &std::io::Error) {
    debug!(
        event = "classify.probe_failed",
        probe,
        path = %path.display(),
        error = %err,
        "probe failed; using default"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_probe_failed(_probe: &'static str, _path: &std::path::Path, _err: &std::io::Error) {}
