//! PID file used by the key binding to address our process with `pkill -F`.

use std::{
    env,
    fs::{self, OpenOptions},
    io::{self, Write},
    os::unix::fs::OpenOptionsExt,
    path::{Path, PathBuf},
    process,
};

use tracing::debug;

use crate::{Error, Result};

/// File name used under the runtime directory.
pub const PIDFILE_NAME: &str = "sway-alttab.pid";

/// Default PID file location: `$XDG_RUNTIME_DIR/sway-alttab.pid`, or
/// `/tmp/sway-alttab.pid` when the variable is unset or empty.
pub fn default_path() -> PathBuf {
    default_path_from(|name| env::var(name).ok())
}

/// [`default_path`] with an injectable environment lookup.
pub fn default_path_from<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let dir = lookup("XDG_RUNTIME_DIR")
        .filter(|dir| !dir.is_empty())
        .unwrap_or_else(|| "/tmp".to_string());
    PathBuf::from(dir).join(PIDFILE_NAME)
}

/// A PID file we have written.
#[derive(Debug)]
pub struct PidFile {
    /// Location on disk.
    path: PathBuf,
}

impl PidFile {
    /// Write the current process id to `path`, replacing any stale file.
    pub fn write(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        write_pid(&path, process::id()).map_err(|source| Error::PidFile {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "pid file written");
        Ok(Self { path })
    }

    /// Location on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file.
    pub fn remove(&self) -> io::Result<()> {
        fs::remove_file(&self.path)
    }
}

/// Remove the file at `path` if it holds our process id.
///
/// Used when startup is interrupted before a [`PidFile`] handle exists.
/// Returns `true` when a file was removed.
pub fn remove_if_ours(path: &Path) -> io::Result<bool> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if contents.trim() != process::id().to_string() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}

/// Write `pid` as bare decimal text with mode 0644.
fn write_pid(path: &Path, pid: u32) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o644)
        .open(path)?;
    file.write_all(pid.to_string().as_bytes())?;
    file.sync_all()
}
