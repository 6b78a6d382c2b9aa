//! Online policy search backed by SerpApi.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;

/// Search the web for trending policies within the user's premium budget.
///
/// The budget ceiling is derived as `income * percentage_to_give / 100`;
/// one search query is issued per invocation. Network and API failures
/// surface as tool-execution errors rather than empty results.
pub struct OnlineSearch {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl OnlineSearch {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Tool for OnlineSearch {
    fn name(&self) -> &str {
        "search_policies_online"
    }

    fn description(&self) -> &str {
        "Search online for trending insurance policies. Does not require a policy_id; accepts optional age, income, family_size and percentage_to_give."
    }

    async fn invoke(&self, args: &Value) -> anyhow::Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("SERPAPI_API_KEY is not configured"))?;

        let age = args.get("age").and_then(Value::as_u64).unwrap_or(20);
        let income = args.get("income").and_then(Value::as_f64).unwrap_or(300_000.0);
        let family_size = args.get("family_size").and_then(Value::as_u64).unwrap_or(3);
        let percentage_to_give = args
            .get("percentage_to_give")
            .and_then(Value::as_f64)
            .unwrap_or(5.0);

        let max_premium = income * percentage_to_give / 100.0;
        let query = format!(
            "best health insurance policies in India for age {}, family size {}, premium under ₹{}",
            age, family_size, max_premium as i64
        );

        let url = format!(
            "https://serpapi.com/search.json?q={}&location=India&hl=en&gl=in&api_key={}",
            urlencoding::encode(&query),
            api_key
        );

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("SerpApi error: HTTP {}", status));
        }

        let payload: Value = response.json().await?;

        let mut policies = Vec::new();
        if let Some(results) = payload.get("organic_results").and_then(Value::as_array) {
            for result in results {
                policies.push(json!({
                    "title": result.get("title").cloned().unwrap_or(Value::Null),
                    "link": result.get("link").cloned().unwrap_or(Value::Null),
                    "snippet": result.get("snippet").cloned().unwrap_or(Value::Null),
                }));
            }
        }

        let summary = format!(
            "Found {} trending policies online for age {}, family size {}, and premium under ₹{}.",
            policies.len(),
            age,
            family_size,
            max_premium as i64
        );

        Ok(json!({ "policies": policies, "summary": summary }))
    }
}
