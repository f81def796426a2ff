//! AI Page Studio - Generate and iteratively edit HTML pages from prompts
//!
//! This library implements a prompt-to-page workflow around an external AI
//! chat gateway:
//!
//! - Normalizing loosely-typed gateway responses into plain text
//! - Extracting standalone HTML documents from model output
//! - Selection-based editing (manual replacement or a scoped AI request)
//! - A local history/version store with undo/redo
//! - File-backed previews and self-contained share URLs
//!
//! # Example
//!
//! ```no_run
//! use ai_page_studio::extractor::extract_html;
//!
//! let reply = "Here you go:\n```html\n<h1>Hi</h1>\n```";
//! let html = extract_html(reply).expect("reply contains a page");
//! assert!(html.contains("<h1>Hi</h1>"));
//! ```

pub mod cli;
pub mod clipboard;
pub mod editor;
pub mod extractor;
pub mod gateway;
pub mod models;
pub mod normalizer;
pub mod preview;
pub mod store;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use editor::{EditError, EditMode, EditSession, EditState};
pub use extractor::{extract_fragment, extract_html};
pub use gateway::{AiGateway, ChatRequest, GatewayConfig, HttpGateway};
pub use models::{ChatMessage, ConversationLog, HistoryEntry, ModelCatalog, Role, Version};
pub use normalizer::{find_refusal, normalize};
pub use store::HistoryStore;
