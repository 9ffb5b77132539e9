use std::{io::Error as IoError, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Startup failures. Every variant is fatal; runtime failures are logged
/// where they happen and never surface as an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    /// Could not reach the window manager.
    #[error("connect: {0}")]
    Connect(#[source] swayipc_async::Error),

    /// Could not fetch the layout tree to seed focus state.
    #[error("get tree: {0}")]
    Tree(#[source] swayipc_async::Error),

    /// The window manager refused the key binding.
    #[error("failed to bind key: {0}")]
    Bind(#[source] swayipc_async::Error),

    /// Could not subscribe to window events.
    #[error("subscription to window events failed: {0}")]
    Subscribe(#[source] swayipc_async::Error),

    /// Could not write the PID file.
    #[error("write pid file {}: {source}", path.display())]
    PidFile {
        /// Location we tried to write.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: IoError,
    },

    /// Could not install a signal handler.
    #[error("install signal handler: {0}")]
    Signal(#[source] IoError),

    /// A termination signal arrived before startup finished.
    #[error("interrupted by {0} during startup")]
    Interrupted(&'static str),
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = StdResult<T, Error>;
