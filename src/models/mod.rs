//! Data models for generated pages and chat sessions.
//!
//! This module defines the data structures used throughout the application:
//!
//! - [`HistoryEntry`] - One recorded generation cycle with metadata
//! - [`Version`] - An explicitly user-saved snapshot, independent of history
//! - [`ChatMessage`] / [`Role`] - Conversation turns re-sent to the gateway
//! - [`ModelCatalog`] - The static list of selectable model identifiers
//!
//! History entries and versions are two independent logs: saving a version
//! never touches the history array, and nothing ties their counts together.

pub mod catalog;
pub mod entry;
pub mod message;

pub use catalog::ModelCatalog;
pub use entry::{HistoryEntry, Version};
pub use message::{ChatMessage, ConversationLog, Role};
