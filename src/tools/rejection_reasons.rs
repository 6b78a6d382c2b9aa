//! Claim-rejection analysis for a specific policy.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::dataset::{PolicyRecord, PolicyStore};
use crate::llm::LlmClient;

use super::Tool;

/// Explain why a claim against a given policy might be rejected, using the
/// policy's exclusions and rejection clauses plus the user's claim
/// description when one is given.
pub struct RejectionReasons {
    store: Arc<PolicyStore>,
    llm: Arc<dyn LlmClient>,
}

impl RejectionReasons {
    pub fn new(store: Arc<PolicyStore>, llm: Arc<dyn LlmClient>) -> Self {
        Self { store, llm }
    }
}

fn render_policy_context(policy: &PolicyRecord) -> String {
    let mut context = format!(
        "Policy Details:\n\
         - Name: {}\n\
         - Type: {}\n\
         - Exclusions: {}\n\
         - Claim Rejection Clauses: {}\n\
         - Decline Conditions: {}\n",
        policy.name,
        policy.policy_type,
        policy.exclusions.join("; "),
        policy.claim_rejection_clauses.join("; "),
        policy.decline_conditions.join("; "),
    );

    // Underwriting extras are free-form; include them only when the record
    // carries them.
    if let Some(profile) = &policy.underwriting_profile {
        context.push_str(&format!("- Underwriting Profile: {}\n", profile));
    }
    if let Some(modifiers) = &policy.risk_modifiers {
        context.push_str(&format!("- Risk Modifiers: {}\n", modifiers));
    }
    if let Some(pricing) = &policy.age_band_pricing {
        context.push_str(&format!("- Age Band Pricing: {}\n", pricing));
    }
    if let Some(multipliers) = &policy.premium_multipliers {
        context.push_str(&format!("- Premium Multipliers: {}\n", multipliers));
    }

    context
}

#[async_trait]
impl Tool for RejectionReasons {
    fn name(&self) -> &str {
        "load_rejection_reasons"
    }

    fn description(&self) -> &str {
        "Explain possible claim rejection reasons for a policy given the user's claim description."
    }

    fn required_fields(&self) -> &[&str] {
        &["policy_id", "claim_desc"]
    }

    async fn invoke(&self, args: &Value) -> anyhow::Result<Value> {
        let policy_id = args
            .get("policy_id")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("Missing 'policy_id' argument"))?;
        // The loop enforces claim_desc before dispatch; a direct caller may
        // still omit it, in which case the analysis falls back to general
        // rejection reasons.
        let claim_desc = args.get("claim_desc").and_then(Value::as_str);

        let Some(policy) = self.store.find(policy_id) else {
            return Ok(json!({
                "error": format!("No policy found with ID {}.", policy_id)
            }));
        };

        let policy_context = render_policy_context(policy);
        let prompt = match claim_desc {
            Some(claim) => format!(
                "You are an expert insurance policy analyst. Your task is to analyze the provided \
                 policy and user claim information to determine possible reasons for claim rejection.\n\n\
                 User Claim Description: {}\n\n{}\n\
                 If you can't find any reason, return \"No reason found in the policy for claim rejection.\"\n\n\
                 Please provide a clear explanation of the rejection reasons.",
                claim, policy_context
            ),
            None => format!(
                "You are an expert insurance policy analyst. Analyze the provided policy to list \
                 general reasons why claims might be rejected, even though the specific claim \
                 description is not provided.\n\n{}\n\
                 Please provide possible general claim rejection reasons based on this policy.",
                policy_context
            ),
        };

        let explanation = self.llm.complete(&prompt).await?;
        Ok(json!({ "summary": explanation }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_records;
    use crate::llm::testing::ScriptedLlm;

    fn tool(responses: Vec<&str>) -> RejectionReasons {
        RejectionReasons::new(
            Arc::new(PolicyStore::from_records(sample_records())),
            Arc::new(ScriptedLlm::new(responses)),
        )
    }

    #[tokio::test]
    async fn explains_rejection_for_known_policy_with_claim() {
        let tool = tool(vec!["Likely rejected under the waiting-period clause."]);
        let args = serde_json::json!({
            "policy_id": "P1",
            "claim_desc": "hospitalized two weeks after buying the policy"
        });
        let result = tool.invoke(&args).await.expect("analysis runs");
        assert_eq!(
            result["summary"],
            "Likely rejected under the waiting-period clause."
        );
    }

    #[tokio::test]
    async fn unknown_policy_is_a_normal_error_payload() {
        let tool = tool(vec![]);
        let args = serde_json::json!({"policy_id": "P99", "claim_desc": "anything"});
        let result = tool.invoke(&args).await.expect("analysis runs");
        assert_eq!(result["error"], "No policy found with ID P99.");
    }

    #[tokio::test]
    async fn missing_claim_desc_falls_back_to_general_analysis() {
        let tool = tool(vec!["General reasons: waiting period, non-disclosure."]);
        let args = serde_json::json!({"policy_id": "P3"});
        let result = tool.invoke(&args).await.expect("analysis runs");
        assert_eq!(
            result["summary"],
            "General reasons: waiting period, non-disclosure."
        );
    }
}
