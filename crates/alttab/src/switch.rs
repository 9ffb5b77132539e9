//! Focus switching and teardown, written against [`CommandRunner`] so the
//! logic can be driven without a live window manager.

use async_trait::async_trait;
use focus_tracker::{FocusTracker, WindowId};
use swayipc_async::{Connection, Fallible};
use tracing::{debug, info, warn};

use crate::{binding::KeyBinding, pidfile::PidFile};

/// Anything that can run window-manager commands.
#[async_trait]
pub trait CommandRunner: Send {
    /// Run `command`, failing if the window manager rejects it.
    async fn run_command(&mut self, command: &str) -> Fallible<()>;
}

#[async_trait]
impl CommandRunner for Connection {
    /// Every command in `command` must succeed; the first failure is
    /// returned.
    async fn run_command(&mut self, command: &str) -> Fallible<()> {
        debug!(command, "run_command");
        let outcomes = Self::run_command(self, command).await?;
        outcomes.into_iter().collect::<Fallible<Vec<()>>>()?;
        Ok(())
    }
}

/// Command focusing `target`.
pub fn focus_command(target: WindowId) -> String {
    format!("[con_id={target}] focus")
}

/// Focus the previously focused window.
///
/// Failures are logged and otherwise ignored; the tracker is left as is and
/// the resulting focus event, if any, updates it. Returns `true` when the
/// window manager accepted the command.
pub async fn switch_focus<R>(tracker: &FocusTracker, runner: &mut R) -> bool
where
    R: CommandRunner + ?Sized,
{
    let target = tracker.switch_target();
    if target.is_unknown() {
        debug!("no previous window to switch to");
        return false;
    }
    match runner.run_command(&focus_command(target)).await {
        Ok(()) => {
            debug!(%target, "switched focus");
            true
        }
        Err(e) => {
            warn!("focus command failed: {}", e);
            false
        }
    }
}

/// Best-effort teardown: unbind the combo, then remove the PID file.
///
/// Each step runs even if the previous one failed.
pub async fn cleanup<R>(runner: &mut R, binding: &KeyBinding, pidfile: &PidFile)
where
    R: CommandRunner + ?Sized,
{
    if let Err(e) = runner.run_command(&binding.unbind_command()).await {
        warn!("failed to unbind key: {}", e);
    }
    if let Err(e) = pidfile.remove() {
        warn!(
            "failed to remove pid file {}: {}",
            pidfile.path().display(),
            e
        );
    }
    info!(combo = binding.combo(), "cleaned up");
}
