use crate::core::{DialogMode, Result};
use crate::entry::EntryRecord;
use crate::pattern::{IntoPattern, Pattern};

#[cfg(feature = "tracing")]
use tracing::trace;

/// Active name filter: a compiled pattern plus its glob form when one exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSpec {
    pattern: Pattern,
    glob: Option<String>,
}

impl FilterSpec {
    /// Filter from a compiled pattern; the glob form is derived.
    pub fn new(pattern: Pattern) -> Self {
        let glob = pattern.to_glob();
        Self { pattern, glob }
    }

    /// Parse `/regex/flags` or bare regex input.
    pub fn parse(input: impl IntoPattern, default_flags: &str) -> Result<Self> {
        Ok(Self::new(input.into_pattern(default_flags)?))
    }

    /// Filter from a glob such as `*.txt, *.md`.
    pub fn from_glob(glob: &str, flags: &str) -> Result<Self> {
        Ok(Self::new(Pattern::from_glob(glob, flags)?))
    }

    /// Compiled pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Equivalent glob, if the pattern has one.
    pub fn glob(&self) -> Option<&str> {
        self.glob.as_deref()
    }

    /// Whether matching ignores case.
    pub fn is_case_insensitive(&self) -> bool {
        self.pattern.is_case_insensitive()
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::new(Pattern::match_all())
    }
}

/// Decides which records make it into a listing.
#[derive(Clone, Debug, Default)]
pub struct FilterEngine {
    spec: FilterSpec,
    mode: DialogMode,
}

impl FilterEngine {
    /// Engine for `mode` with an initial filter.
    pub fn new(spec: FilterSpec, mode: DialogMode) -> Self {
        Self { spec, mode }
    }

    /// Active filter.
    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Replace the active filter.
    pub fn set_spec(&mut self, spec: FilterSpec) {
        self.spec = spec;
    }

    /// Dialog mode the engine filters for.
    pub fn mode(&self) -> DialogMode {
        self.mode
    }

    /// Whether `record` is listed.
    ///
    /// Directories and special nodes always pass so navigation is never
    /// blocked by the filter. In [`DialogMode::SelectDir`] nothing else passes.
    pub fn should_include(&self, record: &EntryRecord) -> bool {
        should_include(record, &self.spec, self.mode)
    }
}

/// See [`FilterEngine::should_include`].
pub fn should_include(record: &EntryRecord, spec: &FilterSpec, mode: DialogMode) -> bool {
    let navigable = record.is_directory || record.is_special;
    let include = if mode == DialogMode::SelectDir {
        navigable
    } else {
        navigable || spec.pattern.is_match(&record.name)
    };
    if !include {
        trace_rejected(&record.name, mode);
    }
    include
}

#[cfg(feature = "tracing")]
fn trace_rejected(name: &str, mode: DialogMode) {
    trace!(event = "filter.rejected", name, ?mode, "entry filtered out");
}

#[cfg(not(feature = "tracing"))]
fn trace_rejected(_name: &str, _mode: DialogMode) {}
