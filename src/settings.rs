use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::channel::CHANNEL_NAME;
use crate::error::PluginError;

/// Host configuration, read from an optional JSON file. Every field has a
/// default so a partial (or absent) file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Name the method channel is registered under.
    pub channel: String,
    /// Log launches instead of performing them.
    pub dry_run: bool,
    /// `tracing` filter directive, e.g. `"debug"` or `"printer_settings=trace"`.
    pub log_level: Option<String>,
    /// Loopback port for the HTTP API. 0 picks a free port.
    pub http_port: u16,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            channel: CHANNEL_NAME.to_string(),
            dry_run: false,
            log_level: None,
            http_port: 0,
        }
    }
}

/// Where [`load_settings`] takes its values from. Reported by callers once
/// their logger is up, since loading happens before logging is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSource {
    /// No path given.
    Defaults,
    /// A path was given but nothing exists there; defaults are used.
    MissingFile,
    File,
}

impl SettingsSource {
    pub fn of(path: Option<&Path>) -> Self {
        match path {
            None => Self::Defaults,
            Some(p) if !p.exists() => Self::MissingFile,
            Some(_) => Self::File,
        }
    }
}

/// Load settings from `path`. No path, or a path that doesn't exist, yields
/// the defaults; a file that exists but doesn't parse is an error.
pub fn load_settings(path: Option<&Path>) -> Result<PluginSettings, PluginError> {
    let Some(path) = path else {
        return Ok(PluginSettings::default());
    };
    if SettingsSource::of(Some(path)) == SettingsSource::MissingFile {
        return Ok(PluginSettings::default());
    }

    let json = std::fs::read_to_string(path)?;
    let settings: PluginSettings =
        serde_json::from_str(&json).map_err(|e| PluginError::Config {
            message: format!("{}: {e}", path.display()),
        })?;

    if settings.channel.is_empty() {
        return Err(PluginError::Config {
            message: format!("{}: channel name must not be empty", path.display()),
        });
    }
    Ok(settings)
}
