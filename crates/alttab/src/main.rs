//! Binary entrypoint for sway-alttab.
use std::{path::PathBuf, process};

use alttab::{Options, Session, Termination, binding, pidfile};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "sway-alttab",
    about = "Toggle focus between the two most recent windows in sway or i3",
    version
)]
/// Command-line interface for the `sway-alttab` binary.
struct Cli {
    /// Key combo bound to the switch
    #[arg(
        short = 'c',
        long,
        default_value = binding::DEFAULT_COMBO,
        value_parser = binding::parse_combo
    )]
    combo: String,

    /// PID file path (defaults to $XDG_RUNTIME_DIR/sway-alttab.pid)
    #[arg(long, value_name = "PATH")]
    pidfile: Option<PathBuf>,

    /// Logging controls
    #[command(flatten)]
    log: logging::LogArgs,
}

impl Cli {
    /// Resolve flags into session options.
    fn options(&self) -> Options {
        Options {
            combo: self.combo.clone(),
            pidfile: self.pidfile.clone().unwrap_or_else(pidfile::default_path),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log.spec());

    let started = match Termination::register() {
        Ok(mut term) => Session::start_interruptible(&cli.options(), &mut term)
            .await
            .map(|session| (session, term)),
        Err(e) => Err(e),
    };
    let (session, term) = match started {
        Ok(started) => started,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    let reason = session.run(term).await;
    info!(?reason, "exited");
}
