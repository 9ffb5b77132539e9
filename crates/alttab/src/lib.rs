//! Alt-tab for sway and i3.
//!
//! Tracks the two most recently focused windows from window-manager events
//! and focuses the previous one whenever the process receives `SIGUSR1`. The
//! key binding installed at startup sends that signal via
//! `pkill -USR1 -F <pidfile>`.
#![warn(missing_docs)]

pub mod binding;
mod error;
pub mod events;
pub mod pidfile;
pub mod session;
pub mod switch;
pub mod tree;

pub use error::{Error, Result};
pub use session::{ExitReason, Options, Session, Termination};
