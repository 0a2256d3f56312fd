use schemars::schema_for;
use serde::Serialize;
use serde_json::Value;

use super::CommandInfo;
use crate::channel::{MethodCall, MethodResponse};

/// A registry entry: metadata + JSON schema for the arguments.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "tauri-plugin", derive(ts_rs::TS))]
#[cfg_attr(feature = "tauri-plugin", ts(export))]
pub struct CommandRegistryEntry {
    pub name: &'static str,
    pub description: &'static str,
    #[cfg_attr(feature = "tauri-plugin", ts(type = "unknown"))]
    pub param_schema: Value,
}

pub fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

pub fn schema_value<T: schemars::JsonSchema>() -> Value {
    let root = schema_for!(T);
    serde_json::to_value(root).unwrap_or(empty_object_schema())
}

pub(super) fn entry(info: CommandInfo, param_schema: Value) -> CommandRegistryEntry {
    CommandRegistryEntry {
        name: info.name,
        description: info.description,
        param_schema,
    }
}

/// Wire schemas for the channel envelope, for clients that generate bindings.
pub fn channel_schema() -> Value {
    serde_json::json!({
        "call": schema_value::<MethodCall>(),
        "response": schema_value::<MethodResponse>(),
    })
}

/// Plain-text listing of the catalog, one command per line.
pub fn help_text(entries: &[CommandRegistryEntry]) -> String {
    if entries.is_empty() {
        return "No commands registered.".to_string();
    }
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|e| format!("{:width$}  {}", e.name, e.description))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::launcher::RecordingLauncher;
    use crate::registry::handlers::OPEN_WINDOWS_PRINTER_SETTINGS;
    use crate::registry::ActionRegistry;

    #[test]
    fn printer_settings_takes_no_params() {
        let registry = ActionRegistry::with_defaults(Arc::new(RecordingLauncher::new())).unwrap();
        let catalog = registry.catalog();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, OPEN_WINDOWS_PRINTER_SETTINGS);
        assert_eq!(catalog[0].param_schema, empty_object_schema());
    }

    #[test]
    fn channel_schema_describes_call_and_response() {
        let schema = channel_schema();
        let call_props = &schema["call"]["properties"];
        assert!(call_props.get("method").is_some());
        assert!(call_props.get("arguments").is_some());
        assert!(schema["response"].is_object());
    }

    #[test]
    fn help_text_aligns_descriptions() {
        let entries = vec![
            CommandRegistryEntry {
                name: "a",
                description: "first",
                param_schema: empty_object_schema(),
            },
            CommandRegistryEntry {
                name: "abc",
                description: "second",
                param_schema: empty_object_schema(),
            },
        ];
        assert_eq!(help_text(&entries), "a    first\nabc  second");
        assert_eq!(help_text(&[]), "No commands registered.");
    }
}
