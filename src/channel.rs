//! The `printer_settings` method channel: a JSON call/response envelope
//! around the [`CommandDispatcher`].

use parking_lot::Mutex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::dispatcher::{Command, CommandDispatcher, CommandResult};
use crate::error::PluginError;
use crate::registry::catalog::CommandRegistryEntry;

pub const CHANNEL_NAME: &str = "printer_settings";

/// An incoming call: `{"method": "...", "arguments": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "tauri-plugin", derive(ts_rs::TS))]
#[cfg_attr(feature = "tauri-plugin", ts(export))]
pub struct MethodCall {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "tauri-plugin", ts(type = "unknown"))]
    pub arguments: Option<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Option<Value>) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Exactly one of these answers every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "tauri-plugin", derive(ts_rs::TS))]
#[cfg_attr(feature = "tauri-plugin", ts(export))]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResponse {
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        #[cfg_attr(feature = "tauri-plugin", ts(type = "unknown"))]
        value: Option<Value>,
    },
    Error {
        code: String,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        #[cfg_attr(feature = "tauri-plugin", ts(type = "unknown"))]
        details: Option<Value>,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<CommandResult> for MethodResponse {
    fn from(result: CommandResult) -> Self {
        match result {
            CommandResult::Success(value) => Self::Success { value },
            CommandResult::Failure(failure) => Self::error(failure.kind.code(), failure.message),
            CommandResult::Unimplemented => Self::NotImplemented,
        }
    }
}

impl From<&PluginError> for MethodResponse {
    fn from(e: &PluginError) -> Self {
        Self::Error {
            code: e.code().to_string(),
            message: e.to_string(),
            details: serde_json::to_value(e).ok(),
        }
    }
}

/// A named channel bound to one dispatcher. Calls are handled one at a time.
pub struct MethodChannel {
    name: String,
    dispatcher: Mutex<CommandDispatcher>,
}

impl MethodChannel {
    pub fn new(name: impl Into<String>, dispatcher: CommandDispatcher) -> Self {
        Self {
            name: name.into(),
            dispatcher: Mutex::new(dispatcher),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, call: MethodCall) -> MethodResponse {
        debug!(channel = %self.name, method = %call.method, "method call");
        let command = Command::new(call.method, call.arguments);
        self.dispatcher.lock().dispatch(command).into()
    }

    /// Decode a JSON call, dispatch it, and encode the response. Messages
    /// that fail to decode are answered with `bad_request` and never reach
    /// the dispatcher.
    pub fn handle_message(&self, message: &str) -> String {
        let response = match decode_call(message) {
            Ok(call) => self.invoke(call),
            Err(e) => {
                debug!(channel = %self.name, error = %e, "rejected message");
                MethodResponse::from(&e)
            }
        };
        encode_response(&response)
    }

    pub fn catalog(&self) -> Vec<CommandRegistryEntry> {
        self.dispatcher.lock().registry().catalog()
    }
}

pub fn decode_call(message: &str) -> Result<MethodCall, PluginError> {
    Ok(serde_json::from_str(message)?)
}

pub fn encode_response(response: &MethodResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            r#"{{"status":"error","code":"encode_error","message":{}}}"#,
            Value::String(e.to_string())
        )
    })
}
