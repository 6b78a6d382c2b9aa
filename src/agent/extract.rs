//! Heuristic extraction of structured fields from raw user text.

use regex::Regex;
use serde_json::{Map, Value};

/// Best-effort parser for income, age, family size and claim description.
///
/// Each field is matched independently; absent fields are omitted rather
/// than defaulted, and overlapping matches are not deduplicated — the claim
/// description clause may swallow text already matched by an earlier rule.
/// Extraction never fails.
pub struct ArgumentExtractor {
    income: Regex,
    age: Regex,
    family_size: Regex,
    claim_desc: Regex,
}

impl ArgumentExtractor {
    pub fn new() -> Self {
        Self {
            income: Regex::new(r"(?i)income\s*₹?\s*(\d+)").expect("income pattern compiles"),
            age: Regex::new(r"(?i)age\s*(\d+)").expect("age pattern compiles"),
            family_size: Regex::new(r"(?i)family\s*(?:of\s*)?(\d+)")
                .expect("family size pattern compiles"),
            claim_desc: Regex::new(r"(?i)(?:claim\s*(?:desc|description)\s*:|claim\s+about)\s*(.+)")
                .expect("claim description pattern compiles"),
        }
    }

    /// Pull whatever structured fields the text carries. Keys are drawn from
    /// `income`, `age`, `family_size`, `claim_desc`.
    pub fn extract(&self, text: &str) -> Map<String, Value> {
        let mut params = Map::new();

        if let Some(captures) = self.income.captures(text) {
            if let Ok(income) = captures[1].parse::<i64>() {
                params.insert("income".to_string(), Value::from(income));
            }
        }
        if let Some(captures) = self.age.captures(text) {
            if let Ok(age) = captures[1].parse::<u64>() {
                params.insert("age".to_string(), Value::from(age));
            }
        }
        if let Some(captures) = self.family_size.captures(text) {
            if let Ok(family_size) = captures[1].parse::<u64>() {
                params.insert("family_size".to_string(), Value::from(family_size));
            }
        }
        if let Some(captures) = self.claim_desc.captures(text) {
            params.insert(
                "claim_desc".to_string(),
                Value::from(captures[1].trim()),
            );
        }

        params
    }
}

impl Default for ArgumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_four_fields() {
        let extractor = ArgumentExtractor::new();
        let params = extractor.extract(
            "I have income ₹50000, age 30, family of 4, claim about a knee surgery bill",
        );

        assert_eq!(params["income"], 50000);
        assert_eq!(params["age"], 30);
        assert_eq!(params["family_size"], 4);
        assert_eq!(params["claim_desc"], "a knee surgery bill");
    }

    #[test]
    fn absent_fields_are_omitted_not_defaulted() {
        let extractor = ArgumentExtractor::new();
        let params = extractor.extract("what is a floater policy?");
        assert!(params.is_empty());
    }

    #[test]
    fn income_matches_without_currency_symbol() {
        let extractor = ArgumentExtractor::new();
        let params = extractor.extract("my income 120000 per year");
        assert_eq!(params["income"], 120000);
        assert!(!params.contains_key("age"));
    }

    #[test]
    fn family_matches_with_or_without_of() {
        let extractor = ArgumentExtractor::new();
        assert_eq!(extractor.extract("family of 3")["family_size"], 3);
        assert_eq!(extractor.extract("family 5")["family_size"], 5);
    }

    #[test]
    fn claim_description_takes_the_trailing_clause() {
        let extractor = ArgumentExtractor::new();
        let params = extractor.extract("claim description: rejected cataract surgery for age 70");
        // The trailing clause swallows the age mention too; overlap is not
        // deduplicated.
        assert_eq!(params["claim_desc"], "rejected cataract surgery for age 70");
        assert_eq!(params["age"], 70);
    }

    #[test]
    fn never_fails_on_arbitrary_text() {
        let extractor = ArgumentExtractor::new();
        for text in ["", "{}{}{}", "income ₹ age family claim about   ", "💥 ₹₹₹"] {
            let params = extractor.extract(text);
            for key in params.keys() {
                assert!(matches!(
                    key.as_str(),
                    "income" | "age" | "family_size" | "claim_desc"
                ));
            }
        }
    }

    #[test]
    fn oversized_numbers_are_dropped_rather_than_panicking() {
        let extractor = ArgumentExtractor::new();
        let params = extractor.extract("income 99999999999999999999999999999");
        assert!(!params.contains_key("income"));
    }
}
