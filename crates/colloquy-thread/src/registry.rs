use crate::error::ThreadError;
use anyhow::Result;
use async_trait::async_trait;
use colloquy_llm::Tool;
use std::collections::HashMap;
use std::sync::Arc;

/// An external capability the model may invoke.
///
/// The orchestrator never inspects tool internals; it serializes
/// name/description/parameters into the request's tool declarations and
/// passes the raw arguments string back to `execute`.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema object describing the arguments
    fn parameters(&self) -> serde_json::Value;

    /// Execute with the verbatim JSON arguments the model produced.
    async fn execute(&self, arguments: &str) -> Result<String>;
}

/// Mutable map from resolved name to handler. An alias override lets the
/// same handler instance be registered under several independent names.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the handler's own name, or `alias` when given.
    pub fn register(
        &mut self,
        tool: Arc<dyn ToolHandler>,
        alias: Option<&str>,
    ) -> Result<(), ThreadError> {
        let resolved = alias.unwrap_or_else(|| tool.name()).to_string();

        if self.tools.contains_key(&resolved) {
            return Err(ThreadError::DuplicateTool(resolved));
        }

        self.tools.insert(resolved, tool);
        Ok(())
    }

    /// Remove by resolved name; false when absent (non-fatal).
    pub fn unregister(&mut self, name: &str) -> bool {
        self.tools.remove(name).is_some()
    }

    pub fn unregister_all(&mut self) {
        self.tools.clear();
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Declarations for the outgoing request, name-sorted for deterministic
    /// payloads. The declared name is the resolved (possibly aliased) name.
    pub fn declarations(&self) -> Vec<Tool> {
        let mut names: Vec<&String> = self.tools.keys().collect();
        names.sort();

        names
            .into_iter()
            .map(|name| {
                let handler = &self.tools[name];
                Tool::new(name.clone(), handler.description(), handler.parameters())
            })
            .collect()
    }
}
