//! Concrete actions exposed over the `printer_settings` channel.

use std::sync::Arc;

use serde_json::Value;

use super::{Action, CommandInfo};
use crate::dispatcher::{CommandResult, Failure};
use crate::launcher::{OsSurfaceLauncher, Surface};

pub const OPEN_WINDOWS_PRINTER_SETTINGS: &str = "openWindowsPrinterSettings";

/// Opens a native OS surface. Arguments are ignored; the result reports only
/// whether the launch could be initiated, not whether the surface appeared.
pub struct OpenSurface {
    info: CommandInfo,
    surface: Surface,
    launcher: Arc<dyn OsSurfaceLauncher>,
}

impl OpenSurface {
    pub fn new(info: CommandInfo, surface: Surface, launcher: Arc<dyn OsSurfaceLauncher>) -> Self {
        Self {
            info,
            surface,
            launcher,
        }
    }

    pub fn printer_settings(launcher: Arc<dyn OsSurfaceLauncher>) -> Self {
        Self::new(
            CommandInfo {
                name: OPEN_WINDOWS_PRINTER_SETTINGS,
                description: "Open the system printer settings.",
            },
            Surface::PrinterSettings,
            launcher,
        )
    }
}

impl Action for OpenSurface {
    fn info(&self) -> CommandInfo {
        self.info
    }

    fn run(&self, _arguments: Option<&Value>) -> CommandResult {
        match self.launcher.open(self.surface) {
            Ok(()) => CommandResult::Success(None),
            Err(e) => CommandResult::Failure(Failure::os_invocation(e.to_string())),
        }
    }
}
