//! Startup sequence and the signal loop.
//!
//! A [`Session`] owns everything set up at startup: the command connection,
//! the shared [`FocusTracker`], the key binding, the PID file, the event
//! consumer task and the trigger signal stream. The event consumer runs as
//! its own task; [`Session::run`] is the signal consumer.

use std::{path::PathBuf, sync::Arc};

use focus_tracker::FocusTracker;
use swayipc_async::{Connection, EventType, Fallible};
use tokio::{
    signal::unix::{Signal, SignalKind, signal},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    binding::{DEFAULT_COMBO, KeyBinding},
    events::{self, StreamEnd},
    pidfile::{self, PidFile},
    switch::{CommandRunner, cleanup, switch_focus},
    tree,
};

/// Event kinds the consumer subscribes to.
const SUBSCRIPTIONS: [EventType; 2] = [EventType::Window, EventType::Shutdown];

/// Startup options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Key combo bound to the switch.
    pub combo: String,
    /// PID file location.
    pub pidfile: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            combo: DEFAULT_COMBO.to_string(),
            pidfile: pidfile::default_path(),
        }
    }
}

/// Why [`Session::run`] returned.
#[derive(Debug)]
pub enum ExitReason {
    /// A termination signal arrived.
    Signal(&'static str),
    /// The event consumer stopped.
    Events(StreamEnd),
    /// The event consumer task panicked or was cancelled.
    EventTaskLost,
}

/// `SIGINT` and `SIGTERM` streams.
///
/// Registering replaces the default action for both signals, so the owner
/// must keep polling [`Termination::recv`] from then on: during startup via
/// [`Session::start_interruptible`], afterwards via [`Session::run`].
pub struct Termination {
    /// `SIGINT`.
    interrupt: Signal,
    /// `SIGTERM`.
    terminate: Signal,
}

impl Termination {
    /// Register both handlers.
    pub fn register() -> Result<Self> {
        Ok(Self {
            interrupt: install(SignalKind::interrupt())?,
            terminate: install(SignalKind::terminate())?,
        })
    }

    /// Wait for either signal and return its name.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }
}

/// Register a handler for `kind`.
fn install(kind: SignalKind) -> Result<Signal> {
    signal(kind).map_err(Error::Signal)
}

/// What the signal loop does next.
enum Action {
    /// Focus the previous window.
    Switch,
    /// Clean up and return.
    Stop(ExitReason),
}

/// A running alt-tab session.
pub struct Session {
    /// Request connection used for focus and unbind commands.
    commands: Connection,
    /// Focus history shared with the event consumer.
    tracker: Arc<FocusTracker>,
    /// Installed key binding.
    binding: KeyBinding,
    /// Written PID file.
    pidfile: PidFile,
    /// Event consumer task.
    events: JoinHandle<StreamEnd>,
    /// `SIGUSR1`: switch focus.
    trigger: Signal,
}

impl Session {
    /// Run the startup sequence. Any error is fatal.
    ///
    /// The trigger handler is registered before the key binding exists so
    /// an early `SIGUSR1` can never hit its default action. The event
    /// subscription is made before the tree is read so that no focus change
    /// can slip between the two; events already reflected in the seed are
    /// no-ops for the tracker.
    pub async fn start(opts: &Options) -> Result<Self> {
        let trigger = install(SignalKind::user_defined1())?;

        let mut commands = Connection::new().await.map_err(Error::Connect)?;
        match commands.get_version().await {
            Ok(v) => info!(version = %v.human_readable, "connected to window manager"),
            Err(e) => debug!("version query failed: {}", e),
        }

        let stream = Connection::new()
            .await
            .map_err(Error::Connect)?
            .subscribe(SUBSCRIPTIONS)
            .await
            .map_err(Error::Subscribe)?;

        let root = commands.get_tree().await.map_err(Error::Tree)?;
        let seed = tree::focused_window(&root);
        info!(window = %seed, "initial focus");
        let tracker = Arc::new(FocusTracker::new(seed));

        let pidfile = PidFile::write(&opts.pidfile)?;
        let binding = KeyBinding::new(opts.combo.clone(), pidfile.path());
        if let Err(e) = bind(&mut commands, &binding).await {
            if let Err(rm) = pidfile.remove() {
                warn!("failed to remove pid file: {}", rm);
            }
            return Err(Error::Bind(e));
        }
        info!(combo = binding.combo(), "key bound");

        let events = tokio::spawn(events::run(stream, Arc::clone(&tracker)));

        Ok(Self {
            commands,
            tracker,
            binding,
            pidfile,
            events,
            trigger,
        })
    }

    /// [`Session::start`], abandoned if `term` fires first.
    ///
    /// An interrupted startup removes the PID file if it was already
    /// written and fails with [`Error::Interrupted`].
    pub async fn start_interruptible(opts: &Options, term: &mut Termination) -> Result<Self> {
        let name = tokio::select! {
            res = Self::start(opts) => return res,
            name = term.recv() => name,
        };
        warn!("{} received during startup", name);
        if let Err(e) = pidfile::remove_if_ours(&opts.pidfile) {
            warn!("failed to remove pid file: {}", e);
        }
        Err(Error::Interrupted(name))
    }

    /// Shared focus tracker.
    pub fn tracker(&self) -> &Arc<FocusTracker> {
        &self.tracker
    }

    /// Focus the previous window, logging failures.
    pub async fn switch(&mut self) -> bool {
        switch_focus(&self.tracker, &mut self.commands).await
    }

    /// Serve signals until termination, then clean up.
    pub async fn run(mut self, mut term: Termination) -> ExitReason {
        loop {
            let action = tokio::select! {
                _ = self.trigger.recv() => Action::Switch,
                name = term.recv() => Action::Stop(ExitReason::Signal(name)),
                end = &mut self.events => Action::Stop(match end {
                    Ok(end) => ExitReason::Events(end),
                    Err(e) => {
                        warn!("event task ended abnormally: {}", e);
                        ExitReason::EventTaskLost
                    }
                }),
            };
            match action {
                Action::Switch => {
                    self.switch().await;
                }
                Action::Stop(reason) => {
                    info!(?reason, "shutting down");
                    self.shutdown().await;
                    return reason;
                }
            }
        }
    }

    /// Stop the event consumer, unbind the combo and remove the PID file.
    pub async fn shutdown(mut self) {
        self.events.abort();
        cleanup(&mut self.commands, &self.binding, &self.pidfile).await;
    }
}

/// Install the key binding.
async fn bind(commands: &mut Connection, binding: &KeyBinding) -> Fallible<()> {
    CommandRunner::run_command(commands, &binding.bind_command()).await
}
