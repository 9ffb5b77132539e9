//! Window event consumer feeding the focus tracker.

use std::{io::ErrorKind, ops::ControlFlow, sync::Arc};

use focus_tracker::{FocusTracker, WindowId};
use futures::StreamExt;
use swayipc_async::{Error as IpcError, Event, EventStream, WindowChange};
use tracing::{debug, info, trace, warn};

/// Why the event consumer stopped.
#[derive(Debug)]
pub enum StreamEnd {
    /// The window manager closed the connection.
    Closed,
    /// The window manager announced it is exiting.
    Shutdown,
    /// Reading from the connection failed.
    Failed(IpcError),
}

/// The part of an event the tracker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// A window gained focus.
    Focus(WindowId),
    /// The window manager is going away.
    Exit,
}

/// Reduce an event to an [`Update`]; everything but window focus and
/// shutdown is dropped.
pub fn classify(event: &Event) -> Option<Update> {
    match event {
        Event::Window(win) if matches!(win.change, WindowChange::Focus) => {
            Some(Update::Focus(WindowId::new(win.container.id)))
        }
        Event::Shutdown(_) => Some(Update::Exit),
        _ => None,
    }
}

/// Apply one update to `tracker`.
pub fn apply(update: Update, tracker: &FocusTracker) -> ControlFlow<StreamEnd> {
    match update {
        Update::Focus(id) => {
            if tracker.observe_focus(id) {
                debug!(window = %id, "focus changed");
            }
            ControlFlow::Continue(())
        }
        Update::Exit => {
            info!("window manager is exiting");
            ControlFlow::Break(StreamEnd::Shutdown)
        }
    }
}

/// Decide whether a read error ends the stream.
///
/// Undecodable payloads are skipped. The stream never yields `None`, so a
/// peer hanging up shows up as an unexpected EOF.
pub fn on_error(err: IpcError) -> ControlFlow<StreamEnd> {
    match err {
        IpcError::SerdeJson(_) | IpcError::UnimplementedEvent(..) => {
            warn!("undecodable event: {}", err);
            ControlFlow::Continue(())
        }
        IpcError::Io(e) if e.kind() == ErrorKind::UnexpectedEof => {
            ControlFlow::Break(StreamEnd::Closed)
        }
        other => ControlFlow::Break(StreamEnd::Failed(other)),
    }
}

/// Consume `stream` until it ends, updating `tracker` on focus changes.
pub async fn run(mut stream: EventStream, tracker: Arc<FocusTracker>) -> StreamEnd {
    while let Some(item) = stream.next().await {
        let flow = match item {
            Ok(event) => match classify(&event) {
                Some(update) => apply(update, &tracker),
                None => {
                    trace!("ignoring event");
                    ControlFlow::Continue(())
                }
            },
            Err(e) => on_error(e),
        };
        if let ControlFlow::Break(end) = flow {
            return end;
        }
    }
    StreamEnd::Closed
}
