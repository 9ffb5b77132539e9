//! Two-register focus history used to toggle between the last two windows.
//!
//! A [`FocusTracker`] holds the window that currently has focus and the one
//! that had focus immediately before it. The window-manager event path
//! calls [`FocusTracker::observe_focus`] for every focus notification and the
//! signal path calls [`FocusTracker::switch_target`] to learn where to jump.
//! Both registers sit behind a single mutex, so readers always see a pair
//! that was produced by one complete update.
#![warn(missing_docs)]

use parking_lot::Mutex;
use tracing::trace;
pub use window_ids::WindowId;

/// A consistent view of both focus registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FocusState {
    /// Window that currently has focus.
    pub current: WindowId,
    /// Window that was focused right before `current`.
    pub previous: WindowId,
}

impl FocusState {
    /// State where both registers hold `id`.
    #[must_use]
    pub const fn seeded(id: WindowId) -> Self {
        Self {
            current: id,
            previous: id,
        }
    }
}

/// Shared focus history. Cheap to share behind an `Arc`.
#[derive(Debug, Default)]
pub struct FocusTracker {
    /// Register pair; the lock is held only for a copy or a two-field write.
    state: Mutex<FocusState>,
}

impl FocusTracker {
    /// Create a tracker seeded with the window focused at startup.
    ///
    /// Pass [`WindowId::UNKNOWN`] when nothing is focused.
    #[must_use]
    pub fn new(initial: WindowId) -> Self {
        Self {
            state: Mutex::new(FocusState::seeded(initial)),
        }
    }

    /// Record that `id` gained focus.
    ///
    /// Shifts `current` into `previous` and stores `id` as `current`.
    /// A notification for the window that is already current leaves the
    /// registers untouched. Returns `true` when the registers changed.
    pub fn observe_focus(&self, id: WindowId) -> bool {
        let mut state = self.state.lock();
        if state.current == id {
            return false;
        }
        state.previous = state.current;
        state.current = id;
        trace!(current = %state.current, previous = %state.previous, "focus_observed");
        true
    }

    /// Window to focus when the user asks to switch.
    #[must_use]
    pub fn switch_target(&self) -> WindowId {
        self.state.lock().previous
    }

    /// Copy of both registers taken under one lock acquisition.
    #[must_use]
    pub fn snapshot(&self) -> FocusState {
        *self.state.lock()
    }
}
