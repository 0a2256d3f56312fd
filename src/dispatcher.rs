use serde_json::Value;
use tracing::{debug, warn};

use crate::registry::ActionRegistry;

/// A named request arriving across the host boundary. Arguments are opaque;
/// an explicit JSON `null` is treated the same as no arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: String,
    arguments: Option<Value>,
}

impl Command {
    pub fn new(name: impl Into<String>, arguments: Option<Value>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.filter(|v| !v.is_null()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> Option<&Value> {
        self.arguments.as_ref()
    }
}

/// Why an action could not be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The OS primitive behind the action could not be started.
    OsInvocationError,
}

impl FailureKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::OsInvocationError => "os_invocation_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn os_invocation(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::OsInvocationError,
            message: message.into(),
        }
    }
}

/// Outcome of dispatching one [`Command`]. `Unimplemented` means this host
/// has no handler for the name; callers should treat it as a capability
/// signal, not a crash.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Success(Option<Value>),
    Failure(Failure),
    Unimplemented,
}

impl CommandResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Maps command names to registered actions. The registry is fixed at
/// construction; lookups are exact and case-sensitive.
pub struct CommandDispatcher {
    registry: ActionRegistry,
}

impl CommandDispatcher {
    pub fn new(registry: ActionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Run the action registered under `command.name`, at most once.
    #[allow(clippy::needless_pass_by_value)]
    pub fn dispatch(&self, command: Command) -> CommandResult {
        let Some(action) = self.registry.get(command.name()) else {
            debug!(command = command.name(), "no handler registered");
            return CommandResult::Unimplemented;
        };

        debug!(command = command.name(), "dispatching");
        let result = action.run(command.arguments());
        if let CommandResult::Failure(failure) = &result {
            warn!(
                command = command.name(),
                code = failure.kind.code(),
                "{}",
                failure.message
            );
        }
        result
    }
}
