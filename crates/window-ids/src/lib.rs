//! Shared identifiers for windows managed by sway or i3.
#![warn(missing_docs)]

use std::fmt;

/// Identifier for a window (container) as assigned by the window manager.
///
/// The value is opaque: it is only ever compared for equality and echoed
/// back to the window manager in `[con_id=N]` criteria.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WindowId(i64);

impl WindowId {
    /// Placeholder used when no window is focused.
    pub const UNKNOWN: Self = Self(0);

    /// Wrap a raw container id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw container id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// True for the placeholder id.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        self.0 == Self::UNKNOWN.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for WindowId {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<WindowId> for i64 {
    fn from(value: WindowId) -> Self {
        value.get()
    }
}
