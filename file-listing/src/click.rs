//! Per-row single/double click detection.
//!
//! The detector is a pure state machine fed with press/release instants. The
//! timeout that abandons an open sequence is scheduled through a
//! [`ClickTimers`] implementation owned by the host event loop.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::core::{FileListingError, PointerButton, Result};

/// Smallest accepted double-click threshold, in milliseconds.
pub const MIN_DOUBLE_CLICK_MS: u32 = 400;
/// Largest accepted double-click threshold, in milliseconds.
pub const MAX_DOUBLE_CLICK_MS: u32 = 2000;
/// Default double-click threshold, in milliseconds.
pub const DEFAULT_DOUBLE_CLICK_MS: u32 = 800;

/// Validated double-click threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoubleClickThreshold(Duration);

impl DoubleClickThreshold {
    /// Threshold of `ms` milliseconds; must lie in
    /// [`MIN_DOUBLE_CLICK_MS`]`..=`[`MAX_DOUBLE_CLICK_MS`].
    pub fn from_millis(ms: u32) -> Result<Self> {
        if !(MIN_DOUBLE_CLICK_MS..=MAX_DOUBLE_CLICK_MS).contains(&ms) {
            return Err(FileListingError::invalid_config(
                "double-click-time",
                format!("{ms} is outside {MIN_DOUBLE_CLICK_MS}..={MAX_DOUBLE_CLICK_MS} ms"),
            ));
        }
        Ok(Self(Duration::from_millis(u64::from(ms))))
    }

    /// Threshold as a duration.
    pub fn duration(self) -> Duration {
        self.0
    }
}

impl Default for DoubleClickThreshold {
    fn default() -> Self {
        Self(Duration::from_millis(u64::from(DEFAULT_DOUBLE_CLICK_MS)))
    }
}

/// Identity of a displayed row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u64);

/// Handle of an armed click timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// What a press did to the click sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    /// A new sequence started; its timeout fires at `deadline`.
    Started {
        /// When the sequence is abandoned unless completed.
        deadline: Instant,
    },
    /// Press inside an open sequence.
    Continued,
    /// Not the primary button; let other handlers see the event.
    Propagate,
}

/// What a release did to the click sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// First click of a sequence; the sequence stays open.
    SingleClick,
    /// Second click within the threshold; the sequence is closed.
    DoubleClick,
    /// Release outside any live sequence.
    Abandoned,
    /// Not the primary button; let other handlers see the event.
    Propagate,
}

/// Click timing state for one row.
#[derive(Clone, Debug, Default)]
pub struct DoubleClickDetector {
    threshold: DoubleClickThreshold,
    sequence_start: Option<Instant>,
    last_press: Option<Instant>,
    count: u32,
}

impl DoubleClickDetector {
    /// Detector using `threshold`.
    pub fn new(threshold: DoubleClickThreshold) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Clicks counted in the open sequence.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Whether a sequence is open.
    pub fn is_active(&self) -> bool {
        self.sequence_start.is_some()
    }

    /// Feed a button press.
    pub fn press(&mut self, button: PointerButton, now: Instant) -> PressOutcome {
        if button != PointerButton::Primary {
            return PressOutcome::Propagate;
        }
        // A sequence whose timeout never got delivered is stale.
        if self.sequence_start.is_some_and(|start| !self.within(start, now)) {
            self.reset();
        }
        self.last_press = Some(now);
        match self.sequence_start {
            Some(_) => PressOutcome::Continued,
            None => {
                self.sequence_start = Some(now);
                self.count = 0;
                PressOutcome::Started {
                    deadline: now + self.threshold.duration(),
                }
            }
        }
    }

    /// Feed a button release.
    pub fn release(&mut self, button: PointerButton, now: Instant) -> ReleaseOutcome {
        if button != PointerButton::Primary {
            return ReleaseOutcome::Propagate;
        }
        match self.sequence_start {
            Some(start) if self.last_press.is_some() && self.within(start, now) => {
                // Each counted release consumes its press.
                self.last_press = None;
                self.count += 1;
                if self.count >= 2 {
                    self.reset();
                    ReleaseOutcome::DoubleClick
                } else {
                    ReleaseOutcome::SingleClick
                }
            }
            _ => {
                self.reset();
                ReleaseOutcome::Abandoned
            }
        }
    }

    /// The sequence timeout fired: abandon the sequence.
    pub fn timeout(&mut self) {
        self.reset();
    }

    fn within(&self, start: Instant, now: Instant) -> bool {
        now.saturating_duration_since(start) < self.threshold.duration()
    }

    fn reset(&mut self) {
        self.sequence_start = None;
        self.last_press = None;
        self.count = 0;
    }
}

/// Deferred callbacks for click timeouts, provided by the host event loop.
///
/// When an armed timer fires, the host calls back into the dialog with the
/// row it was armed for. Disarmed timers must never fire.
pub trait ClickTimers {
    /// Schedule a timeout for `row` at `deadline`.
    fn arm(&mut self, row: RowId, deadline: Instant) -> TimerId;
    /// Cancel a pending timeout. Unknown ids are ignored.
    fn disarm(&mut self, id: TimerId);
}

impl<T: ClickTimers + ?Sized> ClickTimers for &mut T {
    fn arm(&mut self, row: RowId, deadline: Instant) -> TimerId {
        (**self).arm(row, deadline)
    }

    fn disarm(&mut self, id: TimerId) {
        (**self).disarm(id);
    }
}

/// Deterministic [`ClickTimers`] queue polled by the host.
#[derive(Clone, Debug, Default)]
pub struct ManualClickTimers {
    next_id: u64,
    pending: VecDeque<(TimerId, RowId, Instant)>,
}

impl ManualClickTimers {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(_, _, at)| *at).min()
    }

    /// Remove and return rows whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<RowId> {
        let mut due = Vec::new();
        self.pending.retain(|(_, row, at)| {
            if *at <= now {
                due.push(*row);
                false
            } else {
                true
            }
        });
        due
    }
}

impl ClickTimers for ManualClickTimers {
    fn arm(&mut self, row: RowId, deadline: Instant) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push_back((id, row, deadline));
        id
    }

    fn disarm(&mut self, id: TimerId) {
        self.pending.retain(|(pending, _, _)| *pending != id);
    }
}
