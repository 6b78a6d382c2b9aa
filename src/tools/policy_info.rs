//! Policy detail lookup with a model-generated summary.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::dataset::{PolicyRecord, PolicyStore};
use crate::llm::LlmClient;

use super::Tool;

/// Look up one policy by id and return a short model-written summary of it
/// alongside the rendered record.
pub struct PolicyInfo {
    store: Arc<PolicyStore>,
    llm: Arc<dyn LlmClient>,
}

impl PolicyInfo {
    pub fn new(store: Arc<PolicyStore>, llm: Arc<dyn LlmClient>) -> Self {
        Self { store, llm }
    }
}

fn render_policy_text(policy: &PolicyRecord) -> String {
    format!(
        "Policy Name: {}\n\
         Type: {}\n\
         Premium: ₹{}\n\
         Sum Insured: ₹{}\n\
         Detailed Terms: {}\n\
         Benefits: {}\n\
         Company: {}\n",
        policy.name,
        policy.policy_type,
        policy.premium,
        policy.sum_insured,
        policy.detailed_terms.as_deref().unwrap_or("N/A"),
        if policy.benefits.is_empty() {
            "N/A".to_string()
        } else {
            policy.benefits.join(", ")
        },
        policy.company.as_deref().unwrap_or("N/A"),
    )
}

#[async_trait]
impl Tool for PolicyInfo {
    fn name(&self) -> &str {
        "get_policy_info"
    }

    fn description(&self) -> &str {
        "Return a short summary of a specific policy by policy_id."
    }

    async fn invoke(&self, args: &Value) -> anyhow::Result<Value> {
        let policy_id = args
            .get("policy_id")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("Missing 'policy_id' argument"))?;

        let Some(policy) = self.store.find(policy_id) else {
            // Unknown id is a normal result payload, not a tool failure.
            return Ok(json!({ "error": "Policy not found." }));
        };

        let policy_text = render_policy_text(policy);
        let prompt = format!(
            "You are an expert insurance assistant who summarizes policies clearly and concisely for users.\n\n{}",
            policy_text
        );
        let summary = self.llm.complete(&prompt).await?;

        Ok(json!({ "summary": summary, "raw_data": policy_text }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_records;
    use crate::llm::testing::ScriptedLlm;

    fn tool(responses: Vec<&str>) -> PolicyInfo {
        PolicyInfo::new(
            Arc::new(PolicyStore::from_records(sample_records())),
            Arc::new(ScriptedLlm::new(responses)),
        )
    }

    #[tokio::test]
    async fn returns_summary_and_raw_data_for_known_policy() {
        let tool = tool(vec!["A concise summary."]);
        let result = tool
            .invoke(&serde_json::json!({"policy_id": "P1"}))
            .await
            .expect("lookup runs");

        assert_eq!(result["summary"], "A concise summary.");
        let raw = result["raw_data"].as_str().expect("raw data present");
        assert!(raw.contains("Family Shield Floater"));
        assert!(raw.contains("family_floater"));
    }

    #[tokio::test]
    async fn unknown_policy_is_a_normal_error_payload() {
        let tool = tool(vec![]);
        let result = tool
            .invoke(&serde_json::json!({"policy_id": "P99"}))
            .await
            .expect("lookup runs");
        assert_eq!(result["error"], "Policy not found.");
    }

    #[tokio::test]
    async fn missing_policy_id_is_a_tool_error() {
        let tool = tool(vec![]);
        let error = tool
            .invoke(&serde_json::json!({}))
            .await
            .expect_err("missing id fails");
        assert!(error.to_string().contains("policy_id"));
    }
}
