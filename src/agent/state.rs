//! Per-session conversation state.

use serde::Serialize;

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    Human,
    Agent,
}

/// One role-tagged message in the session transcript.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Conversation state owned by a single session.
///
/// `history` is append-only for the session's lifetime; `summary` replaces
/// itself on every update rather than accumulating; `selection` is
/// overwritten, never merged, by each filter-type tool call. All three are
/// derived from tool-execution results, never from raw model chatter, which
/// keeps prompt growth bounded.
#[derive(Debug, Default)]
pub struct ConversationState {
    history: Vec<ChatTurn>,
    summary: Vec<String>,
    selection: Vec<String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one (query, result) exchange in the transcript.
    pub fn record_exchange(&mut self, query: &str, result_text: &str) {
        self.history.push(ChatTurn {
            role: ChatRole::Human,
            content: query.to_string(),
        });
        self.history.push(ChatTurn {
            role: ChatRole::Agent,
            content: result_text.to_string(),
        });
    }

    /// Replace the running summary with a freshly condensed one.
    pub fn replace_summary(&mut self, summary: String) {
        self.summary = vec![summary];
    }

    /// Overwrite the last filter-produced selection.
    pub fn set_selection(&mut self, ids: Vec<String>) {
        self.selection = ids;
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn summary(&self) -> &[String] {
        &self.summary
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_replaces_instead_of_accumulating() {
        let mut state = ConversationState::new();
        state.replace_summary("first".to_string());
        state.replace_summary("second".to_string());
        assert_eq!(state.summary(), ["second"]);
    }

    #[test]
    fn selection_is_overwritten_not_merged() {
        let mut state = ConversationState::new();
        state.set_selection(vec!["P1".to_string(), "P2".to_string()]);
        state.set_selection(vec!["P3".to_string()]);
        assert_eq!(state.selection(), ["P3"]);
    }

    #[test]
    fn history_appends_role_tagged_pairs() {
        let mut state = ConversationState::new();
        state.record_exchange("query one", "result one");
        state.record_exchange("query two", "result two");

        let history = state.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].role, ChatRole::Human);
        assert_eq!(history[1].role, ChatRole::Agent);
        assert_eq!(history[2].content, "query two");
    }
}
