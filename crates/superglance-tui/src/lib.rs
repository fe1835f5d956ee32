//! superglance TUI - terminal output and prompts
//!
//! This crate provides:
//! - Colored status tags for user-facing messages
//! - Hidden secret entry and typed confirmation prompts
//! - Environment listings for `--list` and invalid-environment errors

pub mod listing;
pub mod prompt;
pub mod style;

pub use listing::{environment_listing, valid_environments};
pub use prompt::{confirm, read_secret, Prompt, Terminal};
pub use style::{failure, success};
