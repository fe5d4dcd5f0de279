//! Core types, configuration, and error handling for the Warden service.
//!
//! This crate provides the shared foundation used by the other Warden crates:
//! - [`WardenError`] — unified error type using `thiserror`
//! - [`WardenConfig`] — configuration loaded from `warden.toml` with an
//!   environment-variable overlay
//! - Shared types: [`RepoReference`], [`ReviewRequest`], [`ReviewRecord`],
//!   [`DeliveryStatus`]

mod config;
mod error;
mod types;

pub use config::{GithubConfig, LlmConfig, ServerConfig, SlackConfig, WardenConfig};
pub use error::WardenError;
pub use types::{summarize, DeliveryStatus, RepoReference, ReviewRecord, ReviewRequest};

/// A convenience `Result` type for Warden operations.
pub type Result<T> = std::result::Result<T, WardenError>;
