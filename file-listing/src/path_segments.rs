//! Absolute paths as root-to-leaf segment sequences.
//!
//! Segment 0 is the root marker: the empty string on Unix, or the drive
//! prefix (e.g. `C:`) where the platform has one. Joining all segments gives
//! back the absolute path.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::core::{FileListingError, Result};

/// Ordered, never-empty sequence of path segments starting at the root marker.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathSegments(Vec<String>);

#[allow(clippy::len_without_is_empty)]
impl PathSegments {
    /// Segments of the filesystem root.
    pub fn root() -> Self {
        Self(vec![String::new()])
    }

    /// Split an absolute path into segments.
    ///
    /// `.` components are dropped and `..` pops the previous segment (never
    /// above the root). Relative paths and non UTF-8 components are rejected.
    pub fn segment(path: &Path) -> Result<Self> {
        if !path.is_absolute() {
            return Err(resolution_error(path, "path is not absolute"));
        }
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Prefix(prefix) => {
                    let Some(marker) = prefix.as_os_str().to_str() else {
                        return Err(resolution_error(path, "path prefix is not valid UTF-8"));
                    };
                    segments.clear();
                    segments.push(marker.to_string());
                }
                Component::RootDir => {
                    if segments.is_empty() {
                        segments.push(String::new());
                    }
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if segments.len() > 1 {
                        segments.pop();
                    }
                }
                Component::Normal(name) => {
                    let Some(name) = name.to_str() else {
                        return Err(resolution_error(path, "path segment is not valid UTF-8"));
                    };
                    segments.push(name.to_string());
                }
            }
        }
        if segments.is_empty() {
            return Err(resolution_error(path, "path has no root"));
        }
        Ok(Self(segments))
    }

    /// Rejoin segments into an absolute path.
    pub fn join(&self) -> PathBuf {
        let mut out = match self.0.first().map(String::as_str) {
            Some("") | None => PathBuf::from("/"),
            Some(marker) => PathBuf::from(format!("{marker}{}", std::path::MAIN_SEPARATOR)),
        };
        for name in &self.0[1..] {
            out.push(name);
        }
        out
    }

    /// Whether `self` is an ordered prefix of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &PathSegments) -> bool {
        is_prefix_of(&self.0, &other.0)
    }

    /// Number of segments, root marker included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether these are the root's segments.
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Borrow the raw segments.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Last segment; the root marker for the root.
    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// The first `len` segments, or `None` when `len` is zero or too long.
    pub fn prefix(&self, len: usize) -> Option<Self> {
        if len == 0 || len > self.0.len() {
            return None;
        }
        Some(Self(self.0[..len].to_vec()))
    }

    /// Parent directory segments; `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        self.prefix(self.0.len().saturating_sub(1))
    }

    /// Segments of a direct child named `name`.
    pub fn child(&self, name: &str) -> Result<Self> {
        let mut parts = Path::new(name).components();
        match (parts.next(), parts.next()) {
            (Some(Component::Normal(_)), None) => {
                let mut next = self.0.clone();
                next.push(name.to_string());
                Ok(Self(next))
            }
            _ => Err(resolution_error(
                &self.join().join(name),
                "not a single path component",
            )),
        }
    }
}

impl fmt::Display for PathSegments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join().display())
    }
}

/// Whether `lhs` is an ordered prefix of (or equal to) `rhs`.
pub fn is_prefix_of<T: PartialEq>(lhs: &[T], rhs: &[T]) -> bool {
    lhs.len() <= rhs.len() && lhs.iter().zip(rhs).all(|(a, b)| a == b)
}

fn resolution_error(path: &Path, reason: &str) -> FileListingError {
    FileListingError::PathResolution {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
