use crate::path_segments::PathSegments;

#[cfg(feature = "tracing")]
use tracing::trace;

/// One path button of the breadcrumb bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreadcrumbButton {
    /// Button text: `/` for the root, else the last segment.
    pub label: String,
    /// Directory the button navigates to.
    pub segments: PathSegments,
    /// Whether this is the selected (displayed) directory.
    pub checked: bool,
}

/// How a display request changed the breadcrumb.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreadcrumbChange {
    /// First display: buttons built from scratch.
    Built,
    /// Target already on the trail: only checked states changed.
    Refreshed,
    /// Target off the trail: buttons rebuilt for the new trail.
    Rebuilt,
}

/// Breadcrumb state: the longest visited path (the trail) and the selected
/// directory on it.
///
/// The selected directory is always a prefix of the trail, so navigating back
/// to an ancestor keeps the deeper buttons around.
#[derive(Clone, Debug)]
pub struct Breadcrumb {
    trail: Option<PathSegments>,
    selected: Option<PathSegments>,
    home: Option<PathSegments>,
    show_root: bool,
    buttons: Vec<BreadcrumbButton>,
}

impl Breadcrumb {
    /// Empty breadcrumb. With `home` set, trails under home start at the home
    /// button unless the root is shown.
    pub fn new(home: Option<PathSegments>, show_root: bool) -> Self {
        Self {
            trail: None,
            selected: None,
            home,
            show_root,
            buttons: Vec::new(),
        }
    }

    /// Drop the trail and buttons; home and the root toggle are kept.
    pub fn clear(&mut self) {
        self.trail = None;
        self.selected = None;
        self.buttons.clear();
    }

    /// Current buttons, root side first.
    pub fn buttons(&self) -> &[BreadcrumbButton] {
        &self.buttons
    }

    /// Longest path the buttons represent.
    pub fn trail(&self) -> Option<&PathSegments> {
        self.trail.as_ref()
    }

    /// Selected directory.
    pub fn selected(&self) -> Option<&PathSegments> {
        self.selected.as_ref()
    }

    /// Whether buttons start at the root even under home.
    pub fn show_root(&self) -> bool {
        self.show_root
    }

    /// Select `target`, reusing the buttons when it is already on the trail.
    pub fn display(&mut self, target: &PathSegments) -> BreadcrumbChange {
        let change = match &self.trail {
            None => BreadcrumbChange::Built,
            Some(trail) if target.is_prefix_of(trail) => BreadcrumbChange::Refreshed,
            Some(_) => BreadcrumbChange::Rebuilt,
        };
        self.selected = Some(target.clone());
        match change {
            BreadcrumbChange::Refreshed => self.refresh_checked(),
            BreadcrumbChange::Built | BreadcrumbChange::Rebuilt => {
                self.trail = Some(target.clone());
                self.rebuild();
            }
        }
        trace_display(target, change);
        change
    }

    /// Target of button `index`, or `None` when out of range or already
    /// selected. Checked states are refreshed either way.
    pub fn activate(&mut self, index: usize) -> Option<PathSegments> {
        let target = self
            .buttons
            .get(index)
            .map(|b| b.segments.clone())
            .filter(|segments| self.selected.as_ref() != Some(segments));
        self.refresh_checked();
        target
    }

    /// Toggle the root button; rebuilds when the value changes.
    pub fn set_show_root(&mut self, show_root: bool) -> bool {
        if self.show_root == show_root {
            return false;
        }
        self.show_root = show_root;
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        self.buttons.clear();
        let Some(trail) = &self.trail else {
            return;
        };
        let start = match &self.home {
            Some(home) if !self.show_root && home.is_prefix_of(trail) => home.len(),
            _ => 1,
        };
        for len in start..=trail.len() {
            if let Some(segments) = trail.prefix(len) {
                let label = if segments.is_root() {
                    "/".to_string()
                } else {
                    segments.last().to_string()
                };
                self.buttons.push(BreadcrumbButton {
                    label,
                    checked: self.selected.as_ref() == Some(&segments),
                    segments,
                });
            }
        }
    }

    fn refresh_checked(&mut self) {
        for button in &mut self.buttons {
            button.checked = self.selected.as_ref() == Some(&button.segments);
        }
    }
}

#[cfg(feature = "tracing")]
fn trace_display(target: &PathSegments, change: BreadcrumbChange) {
    trace!(event = "breadcrumb.display", target = %target, ?change, "breadcrumb updated");
}

#[cfg(not(feature = "tracing"))]
fn trace_display(_target: &PathSegments, _change: BreadcrumbChange) {}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::Path;

    fn seg(p: &str) -> PathSegments {
        PathSegments::segment(Path::new(p)).unwrap()
    }

    fn labels(b: &Breadcrumb) -> Vec<&str> {
        b.buttons().iter().map(|b| b.label.as_str()).collect()
    }

    fn checked(b: &Breadcrumb) -> Vec<&str> {
        b.buttons()
            .iter()
            .filter(|b| b.checked)
            .map(|b| b.label.as_str())
            .collect()
    }

    #[test]
    fn first_display_builds_from_root() {
        let mut b = Breadcrumb::new(None, false);
        assert_eq!(b.display(&seg("/a/b/c")), BreadcrumbChange::Built);
        assert_eq!(labels(&b), ["/", "a", "b", "c"]);
        assert_eq!(checked(&b), ["c"]);
    }

    #[test]
    fn ancestor_refreshes_and_descendant_rebuilds() {
        let mut b = Breadcrumb::new(None, false);
        b.display(&seg("/a/b/c"));
        assert_eq!(b.display(&seg("/a/b")), BreadcrumbChange::Refreshed);
        assert_eq!(labels(&b), ["/", "a", "b", "c"]);
        assert_eq!(checked(&b), ["b"]);
        // Back down the trail is still a refresh.
        assert_eq!(b.display(&seg("/a/b/c")), BreadcrumbChange::Refreshed);
        assert_eq!(b.display(&seg("/a/b/c/d")), BreadcrumbChange::Rebuilt);
        assert_eq!(labels(&b), ["/", "a", "b", "c", "d"]);
        assert_eq!(b.display(&seg("/x")), BreadcrumbChange::Rebuilt);
        assert_eq!(labels(&b), ["/", "x"]);
    }

    #[test]
    fn home_trails_start_at_home_unless_root_shown() {
        let mut b = Breadcrumb::new(Some(seg("/home/alice")), false);
        b.display(&seg("/home/alice/docs"));
        assert_eq!(labels(&b), ["alice", "docs"]);
        assert!(b.set_show_root(true));
        assert_eq!(labels(&b), ["/", "home", "alice", "docs"]);
        assert_eq!(checked(&b), ["docs"]);
        assert!(!b.set_show_root(true));
        b.set_show_root(false);
        b.display(&seg("/etc"));
        assert_eq!(labels(&b), ["/", "etc"]);
    }

    #[test]
    fn activation_returns_unselected_targets_only() {
        let mut b = Breadcrumb::new(None, false);
        b.display(&seg("/a/b"));
        assert_eq!(b.activate(1), Some(seg("/a")));
        assert_eq!(b.activate(2), None);
        assert_eq!(b.activate(9), None);
        assert_eq!(checked(&b), ["b"]);
    }
}
