//! Static policy dataset, loaded once at startup.
//!
//! The dataset is read-only for the core's purposes: tools hold an `Arc`
//! to the store and never mutate it.

use std::path::Path;

use serde::Deserialize;

/// A single insurance policy record.
///
/// The underwriting extras (`underwriting_profile`, `risk_modifiers`,
/// `age_band_pricing`, `premium_multipliers`) vary in shape across insurers,
/// so they are carried as loose JSON values.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub policy_type: String,
    pub premium: f64,
    pub sum_insured: f64,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub claim_rejection_clauses: Vec<String>,
    #[serde(default)]
    pub decline_conditions: Vec<String>,
    #[serde(default)]
    pub detailed_terms: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub underwriting_profile: Option<serde_json::Value>,
    #[serde(default)]
    pub risk_modifiers: Option<serde_json::Value>,
    #[serde(default)]
    pub age_band_pricing: Option<serde_json::Value>,
    #[serde(default)]
    pub premium_multipliers: Option<serde_json::Value>,
}

/// In-memory collection of policy records, preserving file order.
#[derive(Debug)]
pub struct PolicyStore {
    policies: Vec<PolicyRecord>,
}

impl PolicyStore {
    /// Load the dataset from a JSON file (an array of policy records).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read dataset {}: {}", path.display(), e))?;
        let policies: Vec<PolicyRecord> = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Failed to parse dataset {}: {}", path.display(), e))?;
        Ok(Self { policies })
    }

    /// Build a store from already-deserialized records.
    pub fn from_records(policies: Vec<PolicyRecord>) -> Self {
        Self { policies }
    }

    /// Look up a policy by id.
    pub fn find(&self, id: &str) -> Option<&PolicyRecord> {
        self.policies.iter().find(|p| p.id == id)
    }

    /// Iterate policies in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &PolicyRecord> {
        self.policies.iter()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

/// Fixture records shared by unit tests across modules.
#[cfg(test)]
pub(crate) fn sample_records() -> Vec<PolicyRecord> {
    let raw = serde_json::json!([
        {
            "id": "P1",
            "name": "Family Shield Floater",
            "type": "family_floater",
            "premium": 500.0,
            "sum_insured": 500000.0,
            "exclusions": ["cosmetic surgery", "pre-existing conditions in year one"],
            "claim_rejection_clauses": ["claims within 30-day waiting period"],
            "decline_conditions": ["undisclosed chronic illness"],
            "detailed_terms": "Covers spouse and up to three children.",
            "benefits": ["cashless hospitalization", "free annual checkup"],
            "company": "Shield Mutual"
        },
        {
            "id": "P2",
            "name": "Family Plus Floater",
            "type": "family_floater",
            "premium": 550.0,
            "sum_insured": 400000.0,
            "exclusions": ["adventure sports injuries"],
            "claim_rejection_clauses": ["late intimation beyond 48 hours"],
            "decline_conditions": [],
            "company": "Plus Assurance"
        },
        {
            "id": "P3",
            "name": "Solo Health Basic",
            "type": "health",
            "premium": 400.0,
            "sum_insured": 300000.0,
            "exclusions": ["dental treatment"],
            "claim_rejection_clauses": ["treatment at non-network hospital without pre-approval"],
            "decline_conditions": ["age above 70"]
        },
        {
            "id": "P4",
            "name": "Term Life Secure",
            "type": "term_life",
            "premium": 9000.0,
            "sum_insured": 2000000.0,
            "exclusions": ["death by self-harm within first year"],
            "claim_rejection_clauses": ["non-disclosure of smoking"],
            "decline_conditions": ["hazardous occupation"]
        },
        {
            "id": "P5",
            "name": "Senior Care Gold",
            "type": "senior_citizen",
            "premium": 600.0,
            "sum_insured": 600000.0,
            "exclusions": ["joint replacement in first two years"],
            "claim_rejection_clauses": ["claims for pre-existing cardiac conditions"],
            "decline_conditions": []
        }
    ]);
    serde_json::from_value(raw).expect("sample records deserialize")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_parses_records_and_renames_type() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        let records = serde_json::json!([
            { "id": "X1", "name": "Test", "type": "health", "premium": 100.0, "sum_insured": 1000.0 }
        ]);
        write!(file, "{}", records).expect("write dataset");

        let store = PolicyStore::load(file.path()).expect("load dataset");
        assert_eq!(store.len(), 1);
        let policy = store.find("X1").expect("policy present");
        assert_eq!(policy.policy_type, "health");
        assert!(policy.exclusions.is_empty());
    }

    #[test]
    fn find_returns_none_for_unknown_id() {
        let store = PolicyStore::from_records(sample_records());
        assert!(store.find("P99").is_none());
    }

    #[test]
    fn iter_preserves_dataset_order() {
        let store = PolicyStore::from_records(sample_records());
        let ids: Vec<&str> = store.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2", "P3", "P4", "P5"]);
    }
}
