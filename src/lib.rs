//! Host side of the `printer_settings` method channel.
//!
//! An embedding application sends named method calls over the channel; the
//! [`dispatcher::CommandDispatcher`] looks each name up in a fixed
//! [`registry::ActionRegistry`] and either runs the matching action or answers
//! "not implemented". The one built-in action, `openWindowsPrinterSettings`,
//! asks the OS shell (through [`launcher::OsSurfaceLauncher`]) to open the
//! system printer settings.

pub mod channel;
pub mod dispatcher;
pub mod error;
pub mod launcher;
pub mod registry;
pub mod settings;

#[cfg(feature = "http-api")]
pub mod api;
#[cfg(feature = "tauri-plugin")]
pub mod plugin;
