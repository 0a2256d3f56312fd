//! OS surface launching.
//!
//! The dispatcher never talks to the shell directly. Actions hold an
//! [`OsSurfaceLauncher`] and ask it to open a symbolic [`Surface`]; the
//! [`ShellLauncher`] resolves that surface to a platform [`Invocation`] and
//! starts it without waiting for the user to close it.

use std::fmt;
use std::process::{Command, Stdio};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

// ── Surfaces & platforms ─────────────────────────────────────────

/// A native OS UI surface that can be opened by symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    PrinterSettings,
}

impl Surface {
    pub fn slug(&self) -> &'static str {
        match self {
            Self::PrinterSettings => "printer_settings",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Host platform families with distinct shell conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    MacOs,
    Unix,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(unix) {
            Self::Unix
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Unix => "unix",
            Self::Other => "this platform",
        };
        f.write_str(name)
    }
}

/// Concrete shell request for a surface: a program plus fixed arguments.
/// No caller-supplied data ever ends up in here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl Invocation {
    pub fn resolve(surface: Surface, platform: Platform) -> Option<Invocation> {
        match (surface, platform) {
            (Surface::PrinterSettings, Platform::Windows) => Some(Invocation {
                program: "control.exe",
                args: &["/name", "Microsoft.DevicesAndPrinters"],
            }),
            (Surface::PrinterSettings, Platform::MacOs) => Some(Invocation {
                program: "open",
                args: &["x-apple.systempreferences:com.apple.Print-Scan-Settings.extension"],
            }),
            (Surface::PrinterSettings, Platform::Unix) => Some(Invocation {
                program: "system-config-printer",
                args: &[],
            }),
            (_, Platform::Other) => None,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program)?;
        for arg in self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// ── Launcher capability ──────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("no {surface} surface on {platform}")]
    UnsupportedSurface { surface: Surface, platform: Platform },
    #[error("launch rejected: {0}")]
    Rejected(String),
}

/// Capability to open a native OS surface. `open` returns once the request
/// has been handed to the OS; it does not wait for the surface to close.
pub trait OsSurfaceLauncher: Send + Sync {
    fn open(&self, surface: Surface) -> Result<(), LaunchError>;
}

/// Launches surfaces through the platform shell.
#[derive(Debug, Clone)]
pub struct ShellLauncher {
    platform: Platform,
    dry_run: bool,
    pinned: Option<Invocation>,
}

impl ShellLauncher {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            dry_run: false,
            pinned: None,
        }
    }

    pub fn for_current_platform() -> Self {
        Self::new(Platform::current())
    }

    /// Log invocations instead of running them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run `invocation` for every surface instead of the platform mapping.
    pub fn with_invocation(mut self, invocation: Invocation) -> Self {
        self.pinned = Some(invocation);
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

impl OsSurfaceLauncher for ShellLauncher {
    fn open(&self, surface: Surface) -> Result<(), LaunchError> {
        let invocation = self
            .pinned
            .or_else(|| Invocation::resolve(surface, self.platform))
            .ok_or(LaunchError::UnsupportedSurface {
                surface,
                platform: self.platform,
            })?;

        if self.dry_run {
            info!(%surface, %invocation, "dry run, not launching");
            return Ok(());
        }

        // GUI programs started this way get the default "show" window state.
        let mut child = Command::new(invocation.program)
            .args(invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: invocation.program,
                source,
            })?;

        info!(%surface, %invocation, pid = child.id(), "launched surface");

        // Reap off-thread; the exit status is informational only.
        let program = invocation.program;
        let reaper = std::thread::Builder::new()
            .name("surface-reaper".to_string())
            .spawn(move || match child.wait() {
                Ok(status) => debug!(program, %status, "surface process exited"),
                Err(e) => debug!(program, error = %e, "failed to wait on surface process"),
            });
        if let Err(e) = reaper {
            warn!(error = %e, "could not start reaper thread");
        }

        Ok(())
    }
}

/// Records requested surfaces instead of launching them. Optionally fails
/// every request, for exercising the error path.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    opened: Mutex<Vec<Surface>>,
    fail_with: Option<String>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
            fail_with: Some(reason.into()),
        }
    }

    /// Every surface requested so far, including rejected ones.
    pub fn opened(&self) -> Vec<Surface> {
        self.opened.lock().clone()
    }

    pub fn open_count(&self) -> usize {
        self.opened.lock().len()
    }
}

impl OsSurfaceLauncher for RecordingLauncher {
    fn open(&self, surface: Surface) -> Result<(), LaunchError> {
        self.opened.lock().push(surface);
        match &self.fail_with {
            Some(reason) => Err(LaunchError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn windows_printer_settings_uses_control_panel() {
        let inv = Invocation::resolve(Surface::PrinterSettings, Platform::Windows).unwrap();
        assert_eq!(inv.program, "control.exe");
        assert_eq!(inv.args, &["/name", "Microsoft.DevicesAndPrinters"]);
        assert_eq!(inv.to_string(), "control.exe /name Microsoft.DevicesAndPrinters");
    }

    #[test]
    fn unknown_platform_has_no_invocation() {
        assert!(Invocation::resolve(Surface::PrinterSettings, Platform::Other).is_none());

        let err = ShellLauncher::new(Platform::Other)
            .open(Surface::PrinterSettings)
            .unwrap_err();
        assert!(matches!(err, LaunchError::UnsupportedSurface { .. }));
        assert_eq!(err.to_string(), "no printer_settings surface on this platform");
    }

    #[test]
    fn dry_run_does_not_spawn() {
        let launcher = ShellLauncher::new(Platform::Windows).dry_run(true);
        assert!(launcher.open(Surface::PrinterSettings).is_ok());
    }

    #[test]
    fn pinned_invocation_overrides_platform() {
        let launcher = ShellLauncher::new(Platform::Other)
            .with_invocation(Invocation {
                program: "printer-settings-missing-program",
                args: &[],
            })
            .dry_run(true);
        assert!(launcher.open(Surface::PrinterSettings).is_ok());
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let launcher = ShellLauncher::new(Platform::current()).with_invocation(Invocation {
            program: "printer-settings-missing-program",
            args: &[],
        });

        let err = launcher.open(Surface::PrinterSettings).unwrap_err();

        assert!(matches!(
            err,
            LaunchError::Spawn { program: "printer-settings-missing-program", .. }
        ));
    }

    #[test]
    fn recording_launcher_counts_requests() {
        let launcher = RecordingLauncher::new();
        launcher.open(Surface::PrinterSettings).unwrap();
        launcher.open(Surface::PrinterSettings).unwrap();
        assert_eq!(launcher.opened(), vec![Surface::PrinterSettings; 2]);
    }

    #[test]
    fn failing_launcher_still_records() {
        let launcher = RecordingLauncher::failing("no shell");
        let err = launcher.open(Surface::PrinterSettings).unwrap_err();
        assert_eq!(err.to_string(), "launch rejected: no shell");
        assert_eq!(launcher.open_count(), 1);
    }
}
