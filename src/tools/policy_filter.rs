//! Affordability filter over the policy dataset.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::dataset::PolicyStore;

use super::Tool;

/// Policy types an individual (or each member of a family) can hold on their
/// own; `family_floater` policies cover the whole family under one premium.
const SOLO_TYPES: &[&str] = &["health", "term_life", "senior_citizen"];

/// Filter policies by what the user can afford to pay in premiums.
pub struct PoliciesFilter {
    store: Arc<PolicyStore>,
}

impl PoliciesFilter {
    pub fn new(store: Arc<PolicyStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for PoliciesFilter {
    fn name(&self) -> &str {
        "policies_filter"
    }

    fn description(&self) -> &str {
        "Filter dataset policies by affordability from income, age and family size. Accepts optional percentage_to_give (default 5) and policy_type."
    }

    fn required_fields(&self) -> &[&str] {
        &["income", "age", "family_size"]
    }

    async fn invoke(&self, args: &Value) -> anyhow::Result<Value> {
        let income = args.get("income").and_then(Value::as_f64).unwrap_or(300_000.0);
        let family_size = args.get("family_size").and_then(Value::as_u64).unwrap_or(3);
        let percentage_to_give = args
            .get("percentage_to_give")
            .and_then(Value::as_f64)
            .unwrap_or(5.0);
        let policy_type = args.get("policy_type").and_then(Value::as_str);
        // age is validated as required, but the affordability rule itself
        // only depends on income, family size and the budget percentage.

        let full_budget = income * percentage_to_give / 100.0;
        let per_member_budget = full_budget / family_size as f64;

        let mut solo_filtered_policies: Vec<String> = Vec::new();
        let mut family_filtered_policies: Vec<String> = Vec::new();

        for policy in self.store.iter() {
            match policy_type {
                None => {
                    if family_size == 1 {
                        if SOLO_TYPES.contains(&policy.policy_type.as_str())
                            && policy.premium <= full_budget
                        {
                            solo_filtered_policies.push(policy.id.clone());
                        }
                    } else {
                        if SOLO_TYPES.contains(&policy.policy_type.as_str())
                            && policy.premium <= per_member_budget
                        {
                            solo_filtered_policies.push(policy.id.clone());
                        }
                        if policy.policy_type == "family_floater"
                            && policy.premium <= per_member_budget
                        {
                            family_filtered_policies.push(policy.id.clone());
                        }
                    }
                }
                Some(wanted) => {
                    if policy.policy_type == wanted {
                        if family_size == 1 {
                            if policy.premium <= full_budget {
                                solo_filtered_policies.push(policy.id.clone());
                            }
                        } else if policy.premium <= per_member_budget {
                            family_filtered_policies.push(policy.id.clone());
                        }
                    }
                }
            }
        }

        Ok(json!({
            "solo_filtered_policies": solo_filtered_policies,
            "family_filtered_policies": family_filtered_policies,
        }))
    }
}
