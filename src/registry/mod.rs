pub mod catalog;
pub mod handlers;

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::dispatcher::CommandResult;
use crate::error::PluginError;
use crate::launcher::OsSurfaceLauncher;

use catalog::CommandRegistryEntry;

// ── Command metadata ────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
}

// ── Actions ─────────────────────────────────────────────────────

/// A host-side action reachable by name through the dispatcher.
///
/// Actions are constructed once with everything they need (launchers,
/// settings) and are read-only afterwards.
pub trait Action: Send + Sync {
    fn info(&self) -> CommandInfo;

    /// JSON schema for the arguments this action reads.
    fn param_schema(&self) -> Value {
        catalog::empty_object_schema()
    }

    fn run(&self, arguments: Option<&Value>) -> CommandResult;
}

// ── Registry ────────────────────────────────────────────────────

/// Name → action table. Built once; iteration follows registration order.
pub struct ActionRegistry {
    actions: IndexMap<&'static str, Box<dyn Action>>,
}

impl ActionRegistry {
    pub fn builder() -> ActionRegistryBuilder {
        ActionRegistryBuilder::default()
    }

    /// The standard table for this host, with every action bound to `launcher`.
    pub fn with_defaults(launcher: Arc<dyn OsSurfaceLauncher>) -> Result<Self, PluginError> {
        Self::builder()
            .register(handlers::OpenSurface::printer_settings(launcher))
            .build()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Action> {
        self.actions.get(name).map(Box::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn catalog(&self) -> Vec<CommandRegistryEntry> {
        self.actions
            .values()
            .map(|action| catalog::entry(action.info(), action.param_schema()))
            .collect()
    }
}

#[derive(Default)]
pub struct ActionRegistryBuilder {
    actions: Vec<Box<dyn Action>>,
}

impl ActionRegistryBuilder {
    pub fn register(mut self, action: impl Action + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    /// Fails if two actions claim the same name.
    pub fn build(self) -> Result<ActionRegistry, PluginError> {
        let mut actions = IndexMap::with_capacity(self.actions.len());
        for action in self.actions {
            let name = action.info().name;
            if actions.insert(name, action).is_some() {
                return Err(PluginError::DuplicateCommand {
                    name: name.to_string(),
                });
            }
        }
        Ok(ActionRegistry { actions })
    }
}
