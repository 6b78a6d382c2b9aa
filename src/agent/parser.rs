//! Extraction of the trailing tool-invocation JSON from raw model output.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::tools::FINAL_ANSWER;

/// A parsed `{tool_name, args}` decision emitted by the model for one loop
/// iteration.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    #[serde(default = "empty_args")]
    pub args: Value,
}

fn empty_args() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Finds the last well-formed tool invocation in model output.
///
/// The allow-list is the registry's tool names plus the terminal
/// `final_answer` marker. Taking the *last* match is deliberate: a model
/// that thinks out loud may emit earlier malformed or exploratory JSON
/// before its real decision.
pub struct ResponseParser {
    pattern: Regex,
}

impl ResponseParser {
    pub fn new(tool_names: &[&str]) -> Self {
        let mut names: Vec<String> = tool_names.iter().map(|n| regex::escape(n)).collect();
        names.push(regex::escape(FINAL_ANSWER));
        let alternation = names.join("|");

        // One level of args nesting, matched across lines.
        let pattern = format!(
            r#"(?s)\{{[^{{}}]*"tool_name"\s*:\s*"(?:{})"[^{{}}]*\{{[^{{}}]*\}}[^{{}}]*\}}"#,
            alternation
        );
        Self {
            pattern: Regex::new(&pattern).expect("invocation pattern compiles"),
        }
    }

    /// Return the last well-formed invocation in `text`. Zero candidates and
    /// a trailing candidate that fails structural parsing both yield `None`;
    /// the caller treats them identically.
    pub fn parse_last_invocation(&self, text: &str) -> Option<ToolInvocation> {
        let last = self.pattern.find_iter(text).last()?;
        serde_json::from_str(last.as_str()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ResponseParser {
        ResponseParser::new(&[
            "policies_filter",
            "get_policy_info",
            "load_rejection_reasons",
            "search_policies_online",
        ])
    }

    #[test]
    fn parses_a_single_invocation() {
        let invocation = parser()
            .parse_last_invocation(r#"{"tool_name": "get_policy_info", "args": {"policy_id": "P1"}}"#)
            .expect("invocation parses");
        assert_eq!(invocation.tool_name, "get_policy_info");
        assert_eq!(invocation.args["policy_id"], "P1");
    }

    #[test]
    fn selects_the_candidate_with_the_greatest_offset() {
        let text = r#"
            First I considered {"tool_name": "get_policy_info", "args": {"policy_id": "P1"}}
            but actually {"tool_name": "policies_filter", "args": {"income": 50000}}
        "#;
        let invocation = parser().parse_last_invocation(text).expect("last parses");
        assert_eq!(invocation.tool_name, "policies_filter");
    }

    #[test]
    fn tolerates_surrounding_prose_and_multi_line_objects() {
        let text = "Let me think about this.\n{\"tool_name\": \"policies_filter\",\n \"args\": {\n  \"income\": 50000,\n  \"age\": 30,\n  \"family_size\": 4\n }\n}\nDone.";
        let invocation = parser().parse_last_invocation(text).expect("parses");
        assert_eq!(invocation.tool_name, "policies_filter");
        assert_eq!(invocation.args["family_size"], 4);
    }

    #[test]
    fn zero_candidates_is_no_match() {
        assert!(parser().parse_last_invocation("I cannot decide.").is_none());
    }

    #[test]
    fn tool_names_outside_the_allow_list_are_not_candidates() {
        let text = r#"
            {"tool_name": "get_policy_info", "args": {"policy_id": "P1"}}
            {"tool_name": "drop_tables", "args": {"all": true}}
        "#;
        // The disallowed trailing block is invisible; the earlier valid one wins.
        let invocation = parser().parse_last_invocation(text).expect("parses");
        assert_eq!(invocation.tool_name, "get_policy_info");
    }

    #[test]
    fn structurally_invalid_last_match_is_no_match() {
        // Matches the shape scan but fails JSON parsing (trailing comma).
        let text = r#"{"tool_name": "get_policy_info", "args": {"policy_id": "P1",}}"#;
        assert!(parser().parse_last_invocation(text).is_none());
    }

    #[test]
    fn final_answer_marker_is_always_allow_listed() {
        let invocation = parser()
            .parse_last_invocation(r#"{"tool_name": "final_answer", "args": {"answer": "Thanks!"}}"#)
            .expect("terminal marker parses");
        assert_eq!(invocation.tool_name, "final_answer");
        assert_eq!(invocation.args["answer"], "Thanks!");
    }

    #[test]
    fn missing_args_defaults_to_an_empty_object() {
        // Shape requires a nested object somewhere; args itself may be absent.
        let text = r#"{"tool_name": "search_policies_online", "extra": {"hint": 1}}"#;
        let invocation = parser().parse_last_invocation(text).expect("parses");
        assert!(invocation.args.as_object().expect("object").is_empty());
    }
}
