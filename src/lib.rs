//! # Insurance Agent
//!
//! A conversational insurance assistant driven by a tool-calling agent loop.
//!
//! This library provides:
//! - An HTTP API for conversation sessions
//! - An agent loop that turns free-text questions into tool invocations
//! - Dataset-backed tools for policy lookup, affordability filtering, and
//!   claim-rejection analysis
//! - An online policy search backed by SerpApi
//!
//! ## Architecture
//!
//! Each user turn flows through the loop:
//! 1. Compose a prompt from the system instructions, the running summary,
//!    the user query, and the turn's scratchpad
//! 2. Call the model once and extract the trailing tool-invocation JSON
//! 3. Validate required arguments, then dispatch the named tool
//! 4. Fold the result into conversation state and derive the reply
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use insurance_agent::{agent::AgentExecutor, config::Config};
//!
//! let config = Config::from_env()?;
//! let mut executor = AgentExecutor::new(llm, tools, config.max_iterations);
//! let reply = executor.invoke("which policies can I afford?").await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod dataset;
pub mod llm;
pub mod tools;

pub use config::Config;
