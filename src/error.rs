use serde::Serialize;
use thiserror::Error;

/// Structured error type for the plugin host. Serializes with a stable `code`
/// so channel clients can match on it instead of parsing messages.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "code", content = "detail")]
pub enum PluginError {
    #[error("command '{name}' is registered more than once")]
    DuplicateCommand { name: String },
    #[error("malformed method call: {message}")]
    Codec { message: String },
    #[error("unknown channel: {name}")]
    UnknownChannel { name: String },
    #[error("configuration error: {message}")]
    Config { message: String },
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl PluginError {
    /// Wire code used in `error` channel responses.
    pub fn code(&self) -> &'static str {
        match self {
            PluginError::DuplicateCommand { .. } => "duplicate_command",
            PluginError::Codec { .. } => "bad_request",
            PluginError::UnknownChannel { .. } => "unknown_channel",
            PluginError::Config { .. } => "config_error",
            PluginError::Io { .. } => "io_error",
        }
    }
}

impl From<std::io::Error> for PluginError {
    fn from(e: std::io::Error) -> Self {
        PluginError::Io {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(e: serde_json::Error) -> Self {
        PluginError::Codec {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_code_tag() {
        let err = PluginError::UnknownChannel {
            name: "scanner".to_string(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "UnknownChannel");
        assert_eq!(json["detail"]["name"], "scanner");
    }

    #[test]
    fn json_errors_become_bad_requests() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = PluginError::from(parse);
        assert_eq!(err.code(), "bad_request");
        assert!(err.to_string().starts_with("malformed method call"));
    }
}
