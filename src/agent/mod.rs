//! Agent module - the core control loop and its helpers.
//!
//! One turn flows:
//! 1. Compose a prompt from the system instructions, the running summary,
//!    the user query, and the turn's scratchpad
//! 2. Call the model once and extract the trailing tool-invocation JSON
//! 3. Validate required arguments against the registry
//! 4. Dispatch the tool, fold the result into conversation state, derive
//!    the user-visible answer

mod executor;
mod extract;
mod parser;
mod prompt;
mod state;

pub use executor::{AgentExecutor, TurnError, TurnReply};
pub use extract::ArgumentExtractor;
pub use parser::{ResponseParser, ToolInvocation};
pub use state::{ChatRole, ChatTurn, ConversationState};
