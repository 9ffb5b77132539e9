//! Window-manager key binding that signals this process.

use std::path::PathBuf;

/// Default key combination.
pub const DEFAULT_COMBO: &str = "Mod1+Tab";

/// A key combo bound to `pkill -USR1 -F <pidfile>`.
///
/// Bind and unbind commands are both derived from this value so they always
/// refer to the same combo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    /// Combo in window-manager syntax, e.g. `Mod1+Tab`.
    combo: String,
    /// PID file passed to `pkill -F`.
    pidfile: PathBuf,
}

impl KeyBinding {
    /// Create a binding for `combo` that signals the process in `pidfile`.
    pub fn new(combo: impl Into<String>, pidfile: impl Into<PathBuf>) -> Self {
        Self {
            combo: combo.into(),
            pidfile: pidfile.into(),
        }
    }

    /// Key combo.
    pub fn combo(&self) -> &str {
        &self.combo
    }

    /// Command installing the binding.
    pub fn bind_command(&self) -> String {
        format!(
            "bindsym {} exec pkill -USR1 -F {}",
            self.combo,
            self.pidfile.display()
        )
    }

    /// Command removing the binding.
    pub fn unbind_command(&self) -> String {
        format!("unbindsym {}", self.combo)
    }
}

/// Validate a combo given on the command line.
pub fn parse_combo(raw: &str) -> Result<String, String> {
    let combo = raw.trim();
    if combo.is_empty() {
        return Err("key combo must not be empty".to_string());
    }
    if combo.chars().any(char::is_whitespace) {
        return Err(format!("key combo {combo:?} must not contain whitespace"));
    }
    Ok(combo.to_string())
}
