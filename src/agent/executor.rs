//! The agent control loop.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::llm::LlmClient;
use crate::tools::{ToolRegistry, FINAL_ANSWER};

use super::extract::ArgumentExtractor;
use super::parser::ResponseParser;
use super::prompt;
use super::state::ConversationState;

/// Why a turn ended without a final answer. Every variant is reported
/// synchronously to the caller; none is fatal to the process, and the
/// session's state stays consistent and resumable.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// The model output contained no extractable tool invocation.
    #[error("Could not extract a valid tool invocation from the model response.")]
    ParseFailure,

    /// Required arguments were absent from an otherwise well-formed
    /// invocation. The caller is responsible for collecting the listed
    /// fields and starting a new turn; the loop does not re-prompt.
    #[error("Please provide the following missing fields: {}", .0.join(", "))]
    MissingArguments(Vec<String>),

    /// The dispatched tool failed.
    #[error("Tool '{tool}' failed: {source}")]
    ToolExecution {
        tool: String,
        #[source]
        source: anyhow::Error,
    },

    /// The primary model call failed.
    #[error("Model call failed: {0}")]
    Completion(#[source] anyhow::Error),
}

/// The per-turn payload handed to the presentation layer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TurnReply {
    pub final_answer: String,
    pub summary: Vec<String>,
}

/// The orchestrator: builds prompts, calls the model, parses and validates
/// invocations, dispatches tools, and folds results into conversation state.
///
/// One executor owns one conversation session. Sharing an executor across
/// sessions is a correctness bug, not a supported mode.
pub struct AgentExecutor {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    parser: ResponseParser,
    extractor: ArgumentExtractor,
    system_prompt: String,
    max_iterations: usize,
    state: ConversationState,
}

impl AgentExecutor {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>, max_iterations: usize) -> Self {
        let parser = ResponseParser::new(&tools.names());
        let system_prompt = prompt::build_system_prompt(&tools);
        Self {
            llm,
            tools,
            parser,
            extractor: ArgumentExtractor::new(),
            system_prompt,
            max_iterations,
            state: ConversationState::new(),
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Run one complete turn for `query`: from user text to a final answer
    /// or an early termination.
    pub async fn invoke(&mut self, query: &str) -> Result<TurnReply, TurnError> {
        let mut final_answer = String::new();
        let mut scratchpad: Vec<(String, String)> = Vec::new();

        let user_params = self.extractor.extract(query);
        debug!(params = ?user_params, "extracted user parameters");

        let mut count = 0;
        #[allow(clippy::never_loop)]
        while count < self.max_iterations {
            let rendered = prompt::render_turn_prompt(
                &self.system_prompt,
                self.state.summary(),
                query,
                &scratchpad,
            );
            let response = self
                .llm
                .complete(&rendered)
                .await
                .map_err(TurnError::Completion)?;
            debug!(response = %response, "model response");

            let Some(invocation) = self.parser.parse_last_invocation(&response) else {
                return Err(TurnError::ParseFailure);
            };
            debug!(tool = %invocation.tool_name, args = %invocation.args, "parsed invocation");

            let missing = self
                .tools
                .missing_fields(&invocation.tool_name, &invocation.args);
            if !missing.is_empty() {
                return Err(TurnError::MissingArguments(missing));
            }

            if invocation.tool_name == FINAL_ANSWER {
                final_answer = invocation
                    .args
                    .get("answer")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                break;
            }

            let mut result = self.dispatch(&invocation.tool_name, &invocation.args).await?;

            if invocation.tool_name == "policies_filter" {
                self.state.set_selection(selection_from_filter(&result));

                // Hard-coded multi-hop shortcut: "first policy" phrasing
                // promotes the first filtered id straight into a detail
                // lookup, whose result becomes this iteration's result.
                if query.to_lowercase().contains("first policy")
                    && !self.state.selection().is_empty()
                {
                    let policy_id = self.state.selection()[0].clone();
                    debug!(policy_id = %policy_id, "auto-selecting first filtered policy");
                    let chained_args = serde_json::json!({ "policy_id": policy_id });
                    result = self.dispatch("get_policy_info", &chained_args).await?;
                }
            }

            let result_text = result.to_string();

            // Context compaction is best-effort; a failed summary never
            // costs the turn its primary answer.
            if let Err(error) = self.summarize_interaction(&result_text).await {
                warn!(error = %error, "summarization failed; keeping prior summary");
            }

            let invocation_json = serde_json::json!({
                "tool_name": invocation.tool_name,
                "args": invocation.args,
            })
            .to_string();
            scratchpad.push((invocation_json, result_text.clone()));
            self.state.record_exchange(query, &result_text);

            final_answer = derive_answer(&result);

            count += 1;
            // One productive dispatch completes the turn; multi-step
            // sequences only happen through the first-policy shortcut above.
            break;
        }

        Ok(TurnReply {
            final_answer,
            summary: self.state.summary().to_vec(),
        })
    }

    async fn dispatch(&self, tool_name: &str, args: &Value) -> Result<Value, TurnError> {
        let tool = self.tools.get(tool_name).ok_or_else(|| TurnError::ToolExecution {
            tool: tool_name.to_string(),
            source: anyhow::anyhow!("Unknown tool"),
        })?;

        tool.invoke(args).await.map_err(|source| TurnError::ToolExecution {
            tool: tool_name.to_string(),
            source,
        })
    }

    async fn summarize_interaction(&mut self, new_text: &str) -> anyhow::Result<()> {
        let rendered = prompt::render_summarize_prompt(self.state.summary(), new_text);
        let summary = self.llm.complete(&rendered).await?;
        self.state.replace_summary(summary);
        Ok(())
    }
}

/// Pick the selection ids from a filter result: the family list wins, the
/// solo list fills in when the family list is empty.
fn selection_from_filter(result: &Value) -> Vec<String> {
    let ids = |key: &str| -> Vec<String> {
        result
            .get(key)
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };

    let family = ids("family_filtered_policies");
    if family.is_empty() {
        ids("solo_filtered_policies")
    } else {
        family
    }
}

/// Derive the user-visible answer for the turn from a tool result: a
/// bulleted title/link list prefixed by the summary when the result carries
/// `policies`, otherwise `summary`, then `raw_data`, then the stringified
/// whole result.
fn derive_answer(result: &Value) -> String {
    if let Some(policies) = result.get("policies").and_then(Value::as_array) {
        let formatted = policies
            .iter()
            .map(|p| {
                format!(
                    "- {} ({})",
                    p.get("title").and_then(Value::as_str).unwrap_or("untitled"),
                    p.get("link").and_then(Value::as_str).unwrap_or(""),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let summary = result.get("summary").and_then(Value::as_str).unwrap_or_default();
        return format!("{}\n\n{}", summary, formatted);
    }

    if let Some(summary) = result.get("summary").and_then(Value::as_str) {
        return summary.to_string();
    }
    if let Some(raw_data) = result.get("raw_data").and_then(Value::as_str) {
        return raw_data.to_string();
    }
    result.to_string()
}
