//! Prompt templates for the agent loop.

use crate::tools::ToolRegistry;

/// Build the fixed system instruction block enumerating the tools, their
/// required fields, and the decision rules.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list()
        .iter()
        .map(|t| {
            let required = t.required_fields();
            if required.is_empty() {
                format!("- {}: {}", t.name(), t.description())
            } else {
                format!(
                    "- {}: {} Needs {}.",
                    t.name(),
                    t.description(),
                    required.join(", ")
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a smart insurance agent assistant. You have access to these tools:
{tool_descriptions}

Your job is to decide which tool to use based on the user query and the available information.

Rules:
1. Respond with exactly one valid JSON object per turn in this format: {{"tool_name": "...", "args": {{...}}}}.
2. Use only one tool at a time and wait for its output before deciding the next tool.
3. If required arguments are missing, ask the user clearly for those missing fields.
4. If the user refuses or skips a required field, proceed using only the given information and do not force.
5. Never include explanations, extra text, or multiple JSON objects in a single response.
6. If you have enough data to answer immediately, respond with the final_answer tool and its args.
7. If no policy_id is given, do not guess. Run policies_filter first to get the list, then use the first policy if asked.
8. You can handle general non-insurance questions politely if the user asks.
9. If the user explicitly mentions "search online", "search web", "trending", or "latest", always choose search_policies_online and do not use policies_filter or get_policy_info first.

Strictly follow these instructions."#
    )
}

/// Render the complete prompt for one model call: the system block, the
/// running summary, the current user query, and the turn's scratchpad of
/// (invocation, observation) pairs.
pub fn render_turn_prompt(
    system: &str,
    summary: &[String],
    query: &str,
    scratchpad: &[(String, String)],
) -> String {
    let mut sections = vec![system.to_string()];

    if !summary.is_empty() {
        sections.push(format!("Conversation summary:\n{}", summary.join("\n")));
    }

    sections.push(format!("User: {}", query));

    for (invocation, observation) in scratchpad {
        sections.push(format!("Assistant: {}\nObservation: {}", invocation, observation));
    }

    sections.join("\n\n")
}

/// Render the summarization prompt over the prior summary and new result
/// text.
pub fn render_summarize_prompt(prior: &[String], new_text: &str) -> String {
    let mut combined = prior.join("\n");
    combined.push('\n');
    combined.push_str(new_text);

    format!(
        "You are a helpful assistant who summarizes insurance agent conversations shortly.\n\n{}",
        combined
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dataset::{sample_records, PolicyStore};
    use crate::llm::testing::ScriptedLlm;
    use crate::llm::LlmClient;

    fn registry() -> ToolRegistry {
        let store = Arc::new(PolicyStore::from_records(sample_records()));
        let llm: Arc<dyn LlmClient> = Arc::new(ScriptedLlm::new(Vec::<String>::new()));
        ToolRegistry::with_default_tools(store, llm, None)
    }

    #[test]
    fn system_prompt_lists_every_tool_with_its_required_fields() {
        let prompt = build_system_prompt(&registry());
        assert!(prompt.contains("- policies_filter:"));
        assert!(prompt.contains("Needs income, age, family_size."));
        assert!(prompt.contains("- load_rejection_reasons:"));
        assert!(prompt.contains("Needs policy_id, claim_desc."));
        assert!(prompt.contains("- search_policies_online:"));
    }

    #[test]
    fn turn_prompt_omits_empty_summary_and_keeps_section_order() {
        let rendered = render_turn_prompt("SYSTEM", &[], "hello", &[]);
        assert_eq!(rendered, "SYSTEM\n\nUser: hello");

        let summary = vec!["previously discussed floaters".to_string()];
        let scratchpad = vec![("{\"tool_name\":\"x\"}".to_string(), "result".to_string())];
        let rendered = render_turn_prompt("SYSTEM", &summary, "hello", &scratchpad);

        let summary_at = rendered.find("Conversation summary").expect("summary section");
        let query_at = rendered.find("User: hello").expect("query section");
        let scratchpad_at = rendered.find("Observation: result").expect("scratchpad section");
        assert!(summary_at < query_at && query_at < scratchpad_at);
    }
}
