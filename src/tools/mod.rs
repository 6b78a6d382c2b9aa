//! Tool registry and the `Tool` trait.
//!
//! Tools are the agent's only way to touch domain data. Each one declares a
//! name, a description for the system prompt, and the arguments that must be
//! present before it may run. Tools without required fields accept whatever
//! arguments they are given and apply their own defaults; tools that handle
//! financial or identity data (the filter, the rejection explainer) must not
//! silently proceed with guessed values, so their required fields are
//! enforced before dispatch.

mod online_search;
mod policy_filter;
mod policy_info;
mod rejection_reasons;

pub use online_search::OnlineSearch;
pub use policy_filter::PoliciesFilter;
pub use policy_info::PolicyInfo;
pub use rejection_reasons::RejectionReasons;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::dataset::PolicyStore;
use crate::llm::LlmClient;

/// The terminal marker the model emits instead of a tool name when it has a
/// final answer for the user.
pub const FINAL_ANSWER: &str = "final_answer";

/// A named capability the agent can invoke with structured arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Arguments that must be present in an invocation before this tool may
    /// run, in declaration order. Empty means the tool applies its own
    /// defaults.
    fn required_fields(&self) -> &[&str] {
        &[]
    }

    /// Execute with the invocation's arguments. The returned value is a
    /// semi-structured bag of optional fields, not a fixed schema.
    async fn invoke(&self, args: &Value) -> anyhow::Result<Value>;
}

/// Fixed mapping from tool name to an invocable unit. Registration order is
/// preserved: it drives both the system-prompt listing and the response
/// parser's allow-list.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry with the full production tool set.
    pub fn with_default_tools(
        store: Arc<PolicyStore>,
        llm: Arc<dyn LlmClient>,
        serpapi_api_key: Option<String>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PoliciesFilter::new(store.clone())));
        registry.register(Arc::new(PolicyInfo::new(store.clone(), llm.clone())));
        registry.register(Arc::new(RejectionReasons::new(store, llm)));
        registry.register(Arc::new(OnlineSearch::new(serpapi_api_key)));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// All registered tools, in registration order.
    pub fn list(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Required fields of `tool_name` absent from `args`, in declaration
    /// order. Unknown tools have no enforced fields.
    pub fn missing_fields(&self, tool_name: &str, args: &Value) -> Vec<String> {
        let Some(tool) = self.get(tool_name) else {
            return Vec::new();
        };
        tool.required_fields()
            .iter()
            .filter(|field| args.get(**field).is_none())
            .map(|field| field.to_string())
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
