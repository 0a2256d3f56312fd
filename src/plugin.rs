//! Tauri plugin registering the `printer_settings` channel.
//!
//! ```ignore
//! tauri::Builder::default().plugin(printer_settings::plugin::init())
//! ```
//!
//! The frontend calls `plugin:printer-settings|invoke` with
//! `{ method, arguments }` and receives a [`MethodResponse`]. The app's
//! capability file must grant `printer-settings:default`.

use std::sync::Arc;

use serde_json::Value;
use tauri::plugin::{Builder, TauriPlugin};
use tauri::{Manager, Runtime, State};

use crate::channel::{MethodCall, MethodChannel, MethodResponse, CHANNEL_NAME};
use crate::dispatcher::CommandDispatcher;
use crate::launcher::{OsSurfaceLauncher, ShellLauncher};
use crate::registry::catalog::CommandRegistryEntry;
use crate::registry::ActionRegistry;

/// Plugin identifier. Must equal the package's `links` key; Tauri rejects
/// underscores here, so it differs from [`CHANNEL_NAME`].
pub const PLUGIN_NAME: &str = "printer-settings";

#[tauri::command]
fn invoke(
    channel: State<'_, Arc<MethodChannel>>,
    method: String,
    arguments: Option<Value>,
) -> MethodResponse {
    channel.invoke(MethodCall { method, arguments })
}

#[tauri::command]
fn commands(channel: State<'_, Arc<MethodChannel>>) -> Vec<CommandRegistryEntry> {
    channel.catalog()
}

pub fn init<R: Runtime>() -> TauriPlugin<R> {
    init_with_launcher(Arc::new(ShellLauncher::for_current_platform()))
}

/// Build the plugin around a specific launcher (e.g. a dry-run one).
pub fn init_with_launcher<R: Runtime>(launcher: Arc<dyn OsSurfaceLauncher>) -> TauriPlugin<R> {
    Builder::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![invoke, commands])
        .setup(move |app, _api| {
            let registry = ActionRegistry::with_defaults(launcher)?;
            app.manage(Arc::new(MethodChannel::new(
                CHANNEL_NAME,
                CommandDispatcher::new(registry),
            )));
            Ok(())
        })
        .build()
}

#[cfg(all(test, feature = "tauri-test"))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;
    use tauri::test::{mock_builder, mock_context, noop_assets, MockRuntime};
    use tauri::App;

    use super::*;
    use crate::launcher::{RecordingLauncher, Surface};
    use crate::registry::handlers::OPEN_WINDOWS_PRINTER_SETTINGS;

    fn app_with(launcher: Arc<RecordingLauncher>) -> App<MockRuntime> {
        mock_builder()
            .plugin(init_with_launcher(launcher))
            .build(mock_context(noop_assets()))
            .unwrap()
    }

    #[test]
    fn plugin_name_matches_links_key() {
        assert_eq!(PLUGIN_NAME, env!("CARGO_PKG_NAME"));
        assert!(!PLUGIN_NAME.contains('_'));
    }

    #[test]
    fn setup_manages_channel_and_invoke_dispatches() {
        let launcher = Arc::new(RecordingLauncher::new());
        let app = app_with(launcher.clone());

        let response = invoke(
            app.state::<Arc<MethodChannel>>(),
            OPEN_WINDOWS_PRINTER_SETTINGS.to_string(),
            Some(json!({ "ignored": true })),
        );

        assert_eq!(response, MethodResponse::Success { value: None });
        assert_eq!(launcher.opened(), vec![Surface::PrinterSettings]);
    }

    #[test]
    fn unknown_method_is_not_implemented() {
        let launcher = Arc::new(RecordingLauncher::new());
        let app = app_with(launcher.clone());

        let response = invoke(app.state(), "foo".to_string(), None);

        assert_eq!(response, MethodResponse::NotImplemented);
        assert_eq!(launcher.open_count(), 0);
    }

    #[test]
    fn commands_lists_catalog() {
        let app = app_with(Arc::new(RecordingLauncher::new()));

        let catalog = commands(app.state());

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.first().map(|e| e.name),
            Some(OPEN_WINDOWS_PRINTER_SETTINGS)
        );
    }
}
