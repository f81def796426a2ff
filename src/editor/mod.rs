//! Selection-based editing of a generated page.
//!
//! One edit session walks Idle → Selecting → Editing (manual or AI) → Idle.
//! A manual edit substitutes literal replacement text for the first
//! occurrence of the selection; an AI edit asks the gateway for a scoped
//! replacement fragment and substitutes that. A selection that no longer
//! occurs verbatim in the current page is reported as
//! [`EditError::SelectionNotFound`] rather than silently ignored.

use std::fmt;

use anyhow::{Result, bail};

use crate::extractor::extract_fragment;
use crate::gateway::{AiGateway, ChatRequest, ToolDispatch};
use crate::models::ChatMessage;
use crate::normalizer::{find_refusal, normalize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Manual,
    Ai,
}

/// Session state over a single preview
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Selecting { selection: String },
    Editing { selection: String, mode: EditMode },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The selected text no longer exists verbatim in the current page,
    /// usually because an earlier edit changed it
    SelectionNotFound,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::SelectionNotFound => {
                write!(f, "Selected text was not found in the current page")
            }
        }
    }
}

impl std::error::Error for EditError {}

/// Tracks where one selection-edit interaction stands
#[derive(Debug, Default)]
pub struct EditSession {
    state: EditState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == EditState::Idle
    }

    /// Record a selection; any prior in-flight edit is discarded
    pub fn begin(&mut self, selection: impl Into<String>) {
        self.state = EditState::Selecting { selection: selection.into() };
    }

    /// Move from Selecting into an editing mode. Returns false (and stays
    /// put) when no selection has been made yet.
    pub fn choose(&mut self, mode: EditMode) -> bool {
        match std::mem::take(&mut self.state) {
            EditState::Selecting { selection } | EditState::Editing { selection, .. } => {
                self.state = EditState::Editing { selection, mode };
                true
            }
            EditState::Idle => false,
        }
    }

    pub fn selection(&self) -> Option<&str> {
        match &self.state {
            EditState::Selecting { selection } | EditState::Editing { selection, .. } => {
                Some(selection)
            }
            EditState::Idle => None,
        }
    }

    /// Terminal transition on apply or cancel
    pub fn finish(&mut self) {
        self.state = EditState::Idle;
    }
}

/// Replace the first occurrence of `selection` in `html` with `replacement`
pub fn apply_manual_edit(
    html: &str,
    selection: &str,
    replacement: &str,
) -> Result<String, EditError> {
    if selection.is_empty() || !html.contains(selection) {
        return Err(EditError::SelectionNotFound);
    }
    Ok(html.replacen(selection, replacement, 1))
}

/// Ask the gateway for a replacement fragment scoped to the selection, then
/// substitute it like a manual edit
pub fn apply_ai_edit(
    gateway: &dyn AiGateway,
    tools: &dyn ToolDispatch,
    model: &str,
    html: &str,
    selection: &str,
    instruction: &str,
) -> Result<String> {
    // Fail on stale selections before spending a gateway call
    if selection.is_empty() || !html.contains(selection) {
        bail!(EditError::SelectionNotFound);
    }

    let prompt = build_edit_prompt(selection, instruction);
    let request = ChatRequest::new(model, vec![ChatMessage::user(prompt)]);
    let response = gateway.chat(&request)?;

    if let Some(refusal) = find_refusal(&response) {
        bail!("{}", refusal);
    }

    let replacement = extract_fragment(&normalize(&response, tools));
    apply_manual_edit(html, selection, &replacement).map_err(Into::into)
}

fn build_edit_prompt(selection: &str, instruction: &str) -> String {
    format!(
        "The following snippet is part of an HTML page:\n\n\
         {}\n\n\
         Modify it according to this instruction: {}\n\n\
         Reply with ONLY the replacement snippet. No explanation, no code fences, \
         no surrounding document.",
        selection, instruction
    )
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    struct CannedGateway {
        reply: Value,
    }

    impl AiGateway for CannedGateway {
        fn chat(&self, _request: &ChatRequest) -> Result<Value> {
            Ok(self.reply.clone())
        }
    }

    struct NoTools;

    impl ToolDispatch for NoTools {
        fn dispatch(&self, _name: &str, _arguments: &str) -> Option<String> {
            None
        }
    }

    const HTML: &str = "<html><body><p>Hello world</p><p>Hello again</p></body></html>";

    #[test]
    fn test_manual_edit_replaces_first_occurrence_only() {
        let edited = apply_manual_edit(HTML, "Hello", "Goodbye").unwrap();
        assert!(edited.contains("<p>Goodbye world</p>"));
        assert!(edited.contains("<p>Hello again</p>"));
    }

    #[test]
    fn test_manual_edit_stale_selection_is_surfaced() {
        let err = apply_manual_edit(HTML, "no such text", "x").unwrap_err();
        assert_eq!(err, EditError::SelectionNotFound);
    }

    #[test]
    fn test_manual_edit_empty_selection_is_not_found() {
        assert_eq!(apply_manual_edit(HTML, "", "x").unwrap_err(), EditError::SelectionNotFound);
    }

    #[test]
    fn test_session_walks_idle_selecting_editing_idle() {
        let mut session = EditSession::new();
        assert!(session.is_idle());

        session.begin("Hello world");
        assert_eq!(
            session.state(),
            &EditState::Selecting { selection: "Hello world".to_string() }
        );

        assert!(session.choose(EditMode::Manual));
        assert_eq!(
            session.state(),
            &EditState::Editing { selection: "Hello world".to_string(), mode: EditMode::Manual }
        );

        session.finish();
        assert!(session.is_idle());
    }

    #[test]
    fn test_session_choose_without_selection_is_rejected() {
        let mut session = EditSession::new();
        assert!(!session.choose(EditMode::Ai));
        assert!(session.is_idle());
    }

    #[test]
    fn test_session_mode_can_be_toggled() {
        let mut session = EditSession::new();
        session.begin("x");
        session.choose(EditMode::Manual);
        assert!(session.choose(EditMode::Ai));
        assert_eq!(
            session.state(),
            &EditState::Editing { selection: "x".to_string(), mode: EditMode::Ai }
        );
    }

    #[test]
    fn test_ai_edit_substitutes_normalized_fragment() {
        let gateway = CannedGateway { reply: json!({"message": {"content": "<strong>Hi</strong>"}}) };
        let edited =
            apply_ai_edit(&gateway, &NoTools, "gpt-4o-mini", HTML, "Hello world", "make it bold")
                .unwrap();
        assert!(edited.contains("<p><strong>Hi</strong></p>"));
        assert!(edited.contains("Hello again"));
    }

    #[test]
    fn test_ai_edit_unwraps_fenced_reply() {
        let gateway = CannedGateway { reply: json!("```html\n<em>soft</em>\n```") };
        let edited =
            apply_ai_edit(&gateway, &NoTools, "gpt-4o-mini", HTML, "Hello world", "italics")
                .unwrap();
        assert!(edited.contains("<p><em>soft</em></p>"));
    }

    #[test]
    fn test_ai_edit_surfaces_refusal() {
        let gateway = CannedGateway { reply: json!({"refusal": "Cannot comply"}) };
        let err =
            apply_ai_edit(&gateway, &NoTools, "gpt-4o-mini", HTML, "Hello world", "do bad things")
                .unwrap_err();
        assert!(err.to_string().contains("Cannot comply"));
    }

    #[test]
    fn test_ai_edit_stale_selection_skips_gateway() {
        struct PanicGateway;
        impl AiGateway for PanicGateway {
            fn chat(&self, _request: &ChatRequest) -> Result<Value> {
                panic!("gateway must not be called for a stale selection");
            }
        }

        let err = apply_ai_edit(&PanicGateway, &NoTools, "m", HTML, "gone", "x").unwrap_err();
        assert!(err.downcast_ref::<EditError>().is_some());
    }
}
