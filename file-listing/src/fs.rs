use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Raw type of a filesystem node, as reported without following symlinks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// Symbolic link (the link itself).
    Symlink,
    /// Device, socket or FIFO.
    Special,
    /// Anything the platform could not classify.
    Unknown,
}

/// Kind of a special node, from the secondary type probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecialKind {
    /// Unix domain socket.
    Socket,
    /// Block device.
    BlockDevice,
    /// Character device.
    CharDevice,
    /// Named pipe.
    Fifo,
}

/// Raw metadata for one filesystem node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsEntry {
    /// Base name (no parent path)
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Node type, symlinks not followed.
    pub kind: FileKind,
    /// Raw `st_mode` bits, including the file type bits.
    pub mode: u32,
    /// Inode number.
    pub inode: u64,
    /// Hard link count.
    pub link_count: u64,
    /// Owning user name.
    pub user: String,
    /// Owning group name.
    pub group: String,
    /// Size in bytes.
    pub size: u64,
    /// Creation time (when available).
    pub created: Option<SystemTime>,
    /// Last modified time (when available).
    pub modified: Option<SystemTime>,
    /// Last access time (when available).
    pub accessed: Option<SystemTime>,
    /// Link target as stored in the link, for symlinks.
    pub symlink_target: Option<PathBuf>,
    /// Mode of the node a symlink resolves to; `None` when dangling or not a link.
    pub target_mode: Option<u32>,
}

/// File system abstraction consumed by the listing engine.
///
/// All calls are blocking and run on the caller's thread.
pub trait FileSystem {
    /// List the immediate children of a directory without following symlinks.
    fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<FsEntry>>;
    /// Fetch metadata for a path, following symlinks.
    fn metadata(&self, path: &Path) -> std::io::Result<FsEntry>;
    /// Probe whether `path` can be enumerated as a directory.
    ///
    /// `Ok(false)` means the node exists but is not a directory.
    fn probe_dir(&self, path: &Path) -> std::io::Result<bool>;
    /// Secondary type probe for special nodes. `Ok(None)` for ordinary nodes.
    fn special_kind(&self, path: &Path) -> std::io::Result<Option<SpecialKind>>;
    /// Create a directory and its parents; an existing directory is success.
    fn create_dir_all(&self, path: &Path) -> std::io::Result<()>;
    /// Create a single directory.
    fn create_dir(&self, path: &Path) -> std::io::Result<()>;
    /// Create or truncate a file and write `contents` to it.
    fn write_file(&self, path: &Path, contents: &[u8]) -> std::io::Result<()>;
    /// Current user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Default filesystem implementation using `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<FsEntry>> {
        let mut out = Vec::new();
        for e in std::fs::read_dir(dir)? {
            let e = match e {
                Ok(v) => v,
                Err(_) => continue,
            };
            // `DirEntry::metadata` does not traverse symlinks.
            let md = match e.metadata() {
                Ok(v) => v,
                Err(_) => continue,
            };
            let name = e.file_name().to_string_lossy().to_string();
            out.push(entry_from_metadata(name, e.path(), &md));
        }
        Ok(out)
    }

    fn metadata(&self, path: &Path) -> std::io::Result<FsEntry> {
        let md = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "/".to_string());
        Ok(entry_from_metadata(name, path.to_path_buf(), &md))
    }

    fn probe_dir(&self, path: &Path) -> std::io::Result<bool> {
        match std::fs::read_dir(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotADirectory => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn special_kind(&self, path: &Path) -> std::io::Result<Option<SpecialKind>> {
        let md = std::fs::symlink_metadata(path)?;
        Ok(special_kind_of(&md.file_type()))
    }

    fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn create_dir(&self, path: &Path) -> std::io::Result<()> {
        std::fs::create_dir(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        std::fs::write(path, contents)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

fn entry_from_metadata(name: String, path: PathBuf, md: &std::fs::Metadata) -> FsEntry {
    let ft = md.file_type();
    let kind = if ft.is_symlink() {
        FileKind::Symlink
    } else if ft.is_dir() {
        FileKind::Directory
    } else if ft.is_file() {
        FileKind::Regular
    } else if special_kind_of(&ft).is_some() {
        FileKind::Special
    } else {
        FileKind::Unknown
    };
    let (symlink_target, target_mode) = if kind == FileKind::Symlink {
        let target = std::fs::read_link(&path).ok();
        let target_mode = std::fs::metadata(&path).ok().map(|m| mode_bits(&m));
        (target, target_mode)
    } else {
        (None, None)
    };
    let (user, group) = owner_names(md);
    FsEntry {
        name,
        path,
        kind,
        mode: mode_bits(md),
        inode: inode_number(md),
        link_count: link_count(md),
        user,
        group,
        size: md.len(),
        created: md.created().ok(),
        modified: md.modified().ok(),
        accessed: md.accessed().ok(),
        symlink_target,
        target_mode,
    }
}

#[cfg(unix)]
fn special_kind_of(ft: &std::fs::FileType) -> Option<SpecialKind> {
    use std::os::unix::fs::FileTypeExt;
    if ft.is_socket() {
        Some(SpecialKind::Socket)
    } else if ft.is_block_device() {
        Some(SpecialKind::BlockDevice)
    } else if ft.is_char_device() {
        Some(SpecialKind::CharDevice)
    } else if ft.is_fifo() {
        Some(SpecialKind::Fifo)
    } else {
        None
    }
}

#[cfg(not(unix))]
fn special_kind_of(_ft: &std::fs::FileType) -> Option<SpecialKind> {
    None
}

#[cfg(unix)]
fn mode_bits(md: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    md.mode()
}

#[cfg(not(unix))]
fn mode_bits(md: &std::fs::Metadata) -> u32 {
    let ft = md.file_type();
    let (kind_bits, perm) = if ft.is_symlink() {
        (0o120000, 0o777)
    } else if ft.is_dir() {
        (0o040000, 0o755)
    } else {
        (0o100000, 0o644)
    };
    let perm = if md.permissions().readonly() {
        perm & !0o222
    } else {
        perm
    };
    kind_bits | perm
}

#[cfg(unix)]
fn inode_number(md: &std::fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    md.ino()
}

#[cfg(not(unix))]
fn inode_number(_md: &std::fs::Metadata) -> u64 {
    0
}

#[cfg(unix)]
fn link_count(md: &std::fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    md.nlink()
}

#[cfg(not(unix))]
fn link_count(_md: &std::fs::Metadata) -> u64 {
    1
}

#[cfg(unix)]
fn owner_names(md: &std::fs::Metadata) -> (String, String) {
    use std::os::unix::fs::MetadataExt;
    let (uid, gid) = (md.uid(), md.gid());
    let user = uzers::get_user_by_uid(uid)
        .map(|u| u.name().to_string_lossy().into_owned())
        .unwrap_or_else(|| uid.to_string());
    let group = uzers::get_group_by_gid(gid)
        .map(|g| g.name().to_string_lossy().into_owned())
        .unwrap_or_else(|| gid.to_string());
    (user, group)
}

#[cfg(not(unix))]
fn owner_names(_md: &std::fs::Metadata) -> (String, String) {
    (String::new(), String::new())
}
