//! The Warden review pipeline: clients, agent, history, and orchestration.
//!
//! Provides the building blocks the server and CLI compose: the repository
//! link parser and GitHub client, the Slack client, the LLM-backed review
//! agent, the capped in-memory history store, and the pipeline that
//! sequences one review run end to end.

pub mod agent;
pub mod github;
pub mod history;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod slack;
