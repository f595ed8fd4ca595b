//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `advice` - Ask a question or request AI advice
//! - `core` - Shared utilities (config, knowledge base and AI client loading)
//! - `knowledge` - Knowledge base lookup and listing
//! - `prompts` - Prompt library management commands
//! - `status` - Configuration and backend status

pub mod advice;
pub mod core;
pub mod knowledge;
pub mod prompts;
pub mod status;

// Re-export command functions for main.rs
pub use advice::*;
pub use self::core::*;
pub use knowledge::*;
pub use prompts::*;
pub use status::*;
