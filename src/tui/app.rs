//! TUI application state and event handling.
//!
//! This module implements the interactive studio loop. It manages:
//!
//! - **Prompt submission**: gateway calls run on a worker thread so the
//!   event loop never blocks on the network
//! - **Preview state**: the current raw response, extracted page, and the
//!   text rendering shown in the preview pane
//! - **Selection editing**: overlays driving the Idle → Selecting → Editing
//!   state machine
//! - **History**: sidebar navigation, load, rename, describe, undo/redo
//! - **Status messages**: transient feedback with automatic expiry
//! - **Dirty state tracking**: redraw only when state changes
//!
//! There is no cancellation for an in-flight call: a hung gateway call hangs
//! that one generation while the UI stays responsive. The elapsed-seconds
//! readout in the status bar is display only.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use serde_json::Value;

use super::events::{Action, InputContext, poll_event};
use super::rendering::{RenderState, render_ui};
use crate::clipboard::copy_to_clipboard;
use crate::editor::{EditMode, EditSession, EditState, apply_ai_edit, apply_manual_edit};
use crate::extractor::extract_html;
use crate::gateway::{AiGateway, ChatRequest, ToolRegistry};
use crate::models::{ChatMessage, ConversationLog, ModelCatalog};
use crate::normalizer::{find_refusal, normalize};
use crate::preview::{PreviewManager, render_text, share_url};
use crate::store::HistoryStore;

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Prompt length cap; keeps a runaway paste from flooding the gateway
const MAX_INPUT_CHARS: usize = 4000;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Prompt,
    Preview,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    SelectTarget,
    ManualReplace,
    AiInstruction,
    Rename,
    Describe,
    VersionNote,
}

/// A text-input popup capturing keyboard input
#[derive(Debug, Clone)]
pub struct Overlay {
    pub kind: OverlayKind,
    pub input: String,
}

impl Overlay {
    fn new(kind: OverlayKind) -> Self {
        Self { kind, input: String::new() }
    }

    fn with_input(kind: OverlayKind, input: impl Into<String>) -> Self {
        Self { kind, input: input.into() }
    }
}

/// Result of a worker-thread gateway call
enum CallOutcome {
    /// Raw gateway response for a generation turn, or a user-facing error
    Generation(Result<Value, String>),
    /// Edited page for an AI selection edit, or a user-facing error
    Edit(Result<String, String>),
}

struct PendingCall {
    rx: Receiver<CallOutcome>,
    started_at: Instant,
}

pub struct App {
    gateway: Option<Arc<dyn AiGateway>>,
    gateway_error: Option<String>,
    tools: Arc<ToolRegistry>,
    catalog: ModelCatalog,
    model_idx: usize,
    focus: Focus,
    prompt_input: String,
    overlay: Option<Overlay>,
    edit_session: EditSession,
    store: HistoryStore,
    conversation: ConversationLog,
    previews: PreviewManager,
    current_raw: Option<String>,
    current_html: Option<String>,
    preview_text: Option<String>,
    pending: Option<PendingCall>,
    status_message: Option<StatusMessage>,
    history_visible: bool,
    history_selected: usize,
    preview_scroll: u16,
    should_quit: bool,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(
        gateway: Option<Arc<dyn AiGateway>>,
        gateway_error: Option<String>,
        store: HistoryStore,
        previews: PreviewManager,
    ) -> Self {
        let mut app = Self {
            gateway,
            gateway_error,
            tools: Arc::new(ToolRegistry::new()),
            catalog: ModelCatalog::new(),
            model_idx: 0,
            focus: Focus::Prompt,
            prompt_input: String::new(),
            overlay: None,
            edit_session: EditSession::new(),
            store,
            conversation: ConversationLog::new(),
            previews,
            current_raw: None,
            current_html: None,
            preview_text: None,
            pending: None,
            status_message: None,
            history_visible: false,
            history_selected: 0,
            preview_scroll: 0,
            should_quit: false,
            needs_redraw: true, // Initial draw needed
            last_draw_time: Instant::now(),
        };

        if let Some(idx) = app.catalog.position(app.catalog.default_model()) {
            app.model_idx = idx;
        }

        // Restore the last session's page, if any
        if let Some(entry) = app.store.current() {
            let content = entry.content.clone();
            let id = entry.id.clone();
            app.load_content(&id, &content);
        }

        app
    }

    pub fn selected_model(&self) -> &str {
        &self.catalog.models()[self.model_idx]
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            // Clear expired status messages (marks dirty if cleared)
            let had_status = self.status_message.is_some();
            self.check_and_clear_expired_status();
            if had_status && self.status_message.is_none() {
                self.needs_redraw = true;
            }

            // Collect finished gateway calls
            self.poll_pending();

            // Draw if dirty or if it's been >100ms (resize + elapsed readout)
            let now = Instant::now();
            let elapsed = now.duration_since(self.last_draw_time);
            if self.needs_redraw || elapsed >= Duration::from_millis(100) {
                terminal.draw(|f| {
                    let state = self.render_state();
                    render_ui(f, &state);
                })?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            // Handle events
            let action = poll_event(Duration::from_millis(100), self.input_context())?;
            self.handle_action(action);
        }

        Ok(())
    }

    fn render_state(&self) -> RenderState<'_> {
        RenderState {
            model: self.selected_model(),
            gateway_banner: self.gateway_error.as_deref(),
            prompt_input: &self.prompt_input,
            preview_text: self.preview_text.as_deref(),
            preview_url: self.previews.current_url(),
            raw_fallback: self.current_html.is_none() && self.current_raw.is_some(),
            entries: self.store.entries(),
            history_visible: self.history_visible,
            history_selected: self.history_selected,
            current_history_index: self.store.current_index(),
            focus: self.focus,
            status_message: self.status_message.as_ref(),
            generating_secs: self.pending.as_ref().map(|p| p.started_at.elapsed().as_secs()),
            overlay: self.overlay.as_ref(),
            selection_pending: matches!(self.edit_session.state(), EditState::Selecting { .. })
                && self.overlay.is_none(),
            can_undo: self.store.can_undo(),
            can_redo: self.store.can_redo(),
            preview_scroll: self.preview_scroll,
        }
    }

    /// Where keyboard input is routed right now
    fn input_context(&self) -> InputContext {
        if self.overlay.is_some() {
            InputContext::Overlay
        } else if matches!(self.edit_session.state(), EditState::Selecting { .. }) {
            InputContext::Selection
        } else {
            match self.focus {
                Focus::Prompt => InputContext::Prompt,
                Focus::Preview => InputContext::Preview,
                Focus::History => InputContext::History,
            }
        }
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn success(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Success, STATUS_SUCCESS_DURATION_MS);
    }

    fn error(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Error, STATUS_ERROR_DURATION_MS);
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self) {
        let should_clear = self
            .status_message
            .as_ref()
            .map(|msg| Instant::now() >= msg.expires_at)
            .unwrap_or(false);
        if should_clear {
            self.status_message = None;
        }
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Cancel => self.cancel(),
            Action::CycleFocus => self.cycle_focus(),
            Action::Confirm => self.confirm(),
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::PageUp => self.move_selection(-10),
            Action::PageDown => self.move_selection(10),
            Action::PrevModel => self.cycle_model(-1),
            Action::NextModel => self.cycle_model(1),
            Action::ToggleHistory => self.toggle_history(),
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
            Action::StartSelection => self.start_selection(),
            Action::ManualEditMode => self.enter_edit_mode(EditMode::Manual),
            Action::AiEditMode => self.enter_edit_mode(EditMode::Ai),
            Action::CopyContent => self.copy_content(),
            Action::CopyShareUrl => self.copy_share_url(),
            Action::SaveVersion => self.open_version_overlay(),
            Action::Rename => self.open_history_overlay(OverlayKind::Rename),
            Action::Describe => self.open_history_overlay(OverlayKind::Describe),
            Action::InputChar(c) => self.input_char(c),
            Action::DeleteChar => self.delete_char(),
            Action::None => {}
        }
    }

    fn cancel(&mut self) {
        if self.overlay.take().is_some() {
            self.edit_session.finish();
            self.needs_redraw = true;
        } else if !self.edit_session.is_idle() {
            self.edit_session.finish();
            self.needs_redraw = true;
        } else if self.history_visible {
            self.toggle_history();
        } else if !self.prompt_input.is_empty() {
            self.prompt_input.clear();
            self.needs_redraw = true;
        } else {
            self.should_quit = true;
        }
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Prompt => Focus::Preview,
            Focus::Preview if self.history_visible => Focus::History,
            Focus::Preview => Focus::Prompt,
            Focus::History => Focus::Prompt,
        };
        self.needs_redraw = true;
    }

    fn toggle_history(&mut self) {
        self.history_visible = !self.history_visible;
        if self.history_visible {
            self.focus = Focus::History;
            self.history_selected =
                self.store.current_index().unwrap_or(0).min(self.store.entries().len().saturating_sub(1));
        } else if self.focus == Focus::History {
            self.focus = Focus::Prompt;
        }
        self.needs_redraw = true;
    }

    fn confirm(&mut self) {
        if self.overlay.is_some() {
            self.submit_overlay();
        } else if self.focus == Focus::History && self.history_visible {
            self.load_selected_entry();
        } else {
            self.submit_prompt();
        }
    }

    fn move_selection(&mut self, delta: isize) {
        match self.focus {
            Focus::History => {
                let total = self.store.entries().len();
                if total == 0 {
                    self.history_selected = 0;
                    return;
                }
                let old = self.history_selected;
                let new = (self.history_selected as isize + delta).max(0) as usize;
                self.history_selected = new.min(total - 1);
                if old != self.history_selected {
                    self.needs_redraw = true;
                }
            }
            Focus::Preview => {
                let old = self.preview_scroll;
                self.preview_scroll =
                    (self.preview_scroll as isize + delta).max(0).min(u16::MAX as isize) as u16;
                if old != self.preview_scroll {
                    self.needs_redraw = true;
                }
            }
            Focus::Prompt => self.cycle_model(delta.signum()),
        }
    }

    fn cycle_model(&mut self, delta: isize) {
        let count = self.catalog.models().len() as isize;
        self.model_idx = ((self.model_idx as isize + delta).rem_euclid(count)) as usize;
        self.needs_redraw = true;
    }

    fn input_char(&mut self, c: char) {
        let target = match &mut self.overlay {
            Some(overlay) => &mut overlay.input,
            None => &mut self.prompt_input,
        };
        if target.chars().count() < MAX_INPUT_CHARS {
            target.push(c);
            self.needs_redraw = true;
        }
    }

    fn delete_char(&mut self) {
        let target = match &mut self.overlay {
            Some(overlay) => &mut overlay.input,
            None => &mut self.prompt_input,
        };
        if target.pop().is_some() {
            self.needs_redraw = true;
        }
    }

    /// Send the typed prompt to the gateway on a worker thread
    fn submit_prompt(&mut self) {
        if self.pending.is_some() {
            self.error("✗ A generation is already running");
            return;
        }
        let prompt = self.prompt_input.trim().to_string();
        if prompt.is_empty() {
            return;
        }
        let Some(gateway) = self.gateway.clone() else {
            let reason = self
                .gateway_error
                .clone()
                .unwrap_or_else(|| "AI gateway is not configured".to_string());
            self.error(format!("✗ {}", reason));
            return;
        };

        self.conversation.push(ChatMessage::user(prompt));
        let request =
            ChatRequest::new(self.selected_model(), self.conversation.messages().to_vec());

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let outcome = match gateway.chat(&request) {
                Ok(value) => CallOutcome::Generation(Ok(value)),
                Err(e) => CallOutcome::Generation(Err(format!("{:#}", e))),
            };
            let _ = tx.send(outcome);
        });

        self.pending = Some(PendingCall { rx, started_at: Instant::now() });
        self.prompt_input.clear();
        self.needs_redraw = true;
    }

    /// Collect a finished worker-thread call, if any
    fn poll_pending(&mut self) {
        let Some(pending) = &self.pending else {
            return;
        };

        match pending.rx.try_recv() {
            Ok(outcome) => {
                let elapsed = pending.started_at.elapsed().as_secs();
                self.pending = None;
                match outcome {
                    CallOutcome::Generation(Ok(value)) => self.process_generation(value, elapsed),
                    CallOutcome::Generation(Err(msg)) => self.error(format!("✗ {}", msg)),
                    CallOutcome::Edit(Ok(html)) => self.apply_edited_page(html),
                    CallOutcome::Edit(Err(msg)) => {
                        self.edit_session.finish();
                        self.error(format!("✗ {}", msg));
                    }
                }
                self.needs_redraw = true;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.error("✗ Generation worker vanished without a response");
            }
        }
    }

    /// Normalize, extract, record, and preview one gateway reply
    fn process_generation(&mut self, value: Value, elapsed_secs: u64) {
        if let Some(refusal) = find_refusal(&value) {
            self.error(format!("✗ {}", refusal));
            return;
        }
        if value.is_null() {
            self.error(format!("✗ Empty response from model: {}", self.selected_model()));
            return;
        }

        let raw = normalize(&value, self.tools.as_ref());
        self.conversation.push(ChatMessage::assistant(raw.clone()));

        // Every successful cycle is recorded, with or without a preview
        let entry = self.store.append(&raw);
        let id = entry.id.clone();
        self.load_content(&id, &raw);

        match self.current_html {
            Some(_) => self.success(format!("✓ Page generated in {}s", elapsed_secs)),
            None => self.error("No HTML detected in the response — showing raw text"),
        }
    }

    /// Make `content` the current page: extract, render preview, cache text
    fn load_content(&mut self, entry_id: &str, content: &str) {
        self.current_raw = Some(content.to_string());
        self.current_html = extract_html(content);
        self.preview_scroll = 0;

        match &self.current_html {
            Some(html) => {
                self.preview_text = Some(render_text(html));
                match self.previews.render(entry_id, html) {
                    Ok(path) => self.store.set_preview_path(entry_id, &path),
                    Err(e) => eprintln!("Warning: failed to write preview: {:#}", e),
                }
            }
            None => {
                self.preview_text =
                    Some(crate::utils::strip_ansi_codes(content));
            }
        }
        self.needs_redraw = true;
    }

    fn load_selected_entry(&mut self) {
        let Some(entry) = self.store.entries().get(self.history_selected) else {
            return;
        };
        let id = entry.id.clone();
        let content = entry.content.clone();
        let name = entry.project_name.clone().unwrap_or_else(|| "Untitled Page".to_string());

        if self.store.select(self.history_selected).is_none() {
            return;
        }
        self.load_content(&id, &content);
        self.success(format!("✓ Loaded {}", name));
    }

    fn undo(&mut self) {
        let Some(entry) = self.store.undo() else {
            self.error("✗ Nothing to undo");
            return;
        };
        let id = entry.id.clone();
        let content = entry.content.clone();
        self.load_content(&id, &content);
        self.success("✓ Undo");
    }

    fn redo(&mut self) {
        let Some(entry) = self.store.redo() else {
            self.error("✗ Nothing to redo");
            return;
        };
        let id = entry.id.clone();
        let content = entry.content.clone();
        self.load_content(&id, &content);
        self.success("✓ Redo");
    }

    fn start_selection(&mut self) {
        if self.current_html.is_none() {
            self.error("✗ No page to edit yet");
            return;
        }
        self.overlay = Some(Overlay::new(OverlayKind::SelectTarget));
        self.needs_redraw = true;
    }

    /// Selecting → Editing transition, opening the matching input overlay
    fn enter_edit_mode(&mut self, mode: EditMode) {
        let Some(selection) = self.edit_session.selection().map(|s| s.to_string()) else {
            return;
        };
        if !self.edit_session.choose(mode) {
            return;
        }
        self.overlay = Some(match mode {
            // Manual replacement starts from the selected text, like an
            // in-place editor would
            EditMode::Manual => Overlay::with_input(OverlayKind::ManualReplace, selection),
            EditMode::Ai => Overlay::new(OverlayKind::AiInstruction),
        });
        self.needs_redraw = true;
    }

    fn submit_overlay(&mut self) {
        let Some(overlay) = self.overlay.take() else {
            return;
        };
        let input = overlay.input.trim().to_string();
        self.needs_redraw = true;

        match overlay.kind {
            OverlayKind::SelectTarget => self.confirm_selection(input),
            OverlayKind::ManualReplace => self.apply_manual_replacement(&input),
            OverlayKind::AiInstruction => self.request_ai_edit(input),
            OverlayKind::Rename => {
                if input.is_empty() {
                    return;
                }
                let Some(id) = self.selected_entry_id() else {
                    self.error("✗ No history entry selected");
                    return;
                };
                if self.store.rename(&id, &input) {
                    self.success("✓ Project renamed");
                }
            }
            OverlayKind::Describe => {
                let Some(id) = self.selected_entry_id() else {
                    self.error("✗ No history entry selected");
                    return;
                };
                if self.store.set_description(&id, &input) {
                    self.success("✓ Description saved");
                }
            }
            OverlayKind::VersionNote => {
                let Some(content) = self.current_content() else {
                    self.error("✗ No page to save");
                    return;
                };
                let model = self.selected_model().to_string();
                self.store.save_version(&content, &input, Some(model));
                self.success("✓ Version saved");
            }
        }
    }

    fn confirm_selection(&mut self, target: String) {
        if target.is_empty() {
            self.edit_session.finish();
            return;
        }
        let Some(html) = &self.current_html else {
            self.edit_session.finish();
            self.error("✗ No page to edit yet");
            return;
        };
        // Surface a no-match instead of letting a stale selection no-op later
        if !html.contains(&target) {
            self.edit_session.finish();
            self.error("✗ Selected text was not found in the current page");
            return;
        }
        self.edit_session.begin(target);
    }

    fn apply_manual_replacement(&mut self, replacement: &str) {
        let Some(selection) = self.edit_session.selection().map(|s| s.to_string()) else {
            return;
        };
        let Some(html) = self.current_html.clone() else {
            self.edit_session.finish();
            return;
        };

        match apply_manual_edit(&html, &selection, replacement) {
            Ok(edited) => self.apply_edited_page(edited),
            Err(e) => {
                self.edit_session.finish();
                self.error(format!("✗ {}", e));
            }
        }
    }

    /// Scoped follow-up AI call for the selected fragment, on a worker thread
    fn request_ai_edit(&mut self, instruction: String) {
        if instruction.is_empty() {
            self.edit_session.finish();
            return;
        }
        if self.pending.is_some() {
            self.edit_session.finish();
            self.error("✗ A generation is already running");
            return;
        }
        let (Some(selection), Some(html)) =
            (self.edit_session.selection().map(|s| s.to_string()), self.current_html.clone())
        else {
            self.edit_session.finish();
            return;
        };
        let Some(gateway) = self.gateway.clone() else {
            self.edit_session.finish();
            let reason = self
                .gateway_error
                .clone()
                .unwrap_or_else(|| "AI gateway is not configured".to_string());
            self.error(format!("✗ {}", reason));
            return;
        };

        let tools = Arc::clone(&self.tools);
        let model = self.selected_model().to_string();

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let outcome = apply_ai_edit(
                gateway.as_ref(),
                tools.as_ref(),
                &model,
                &html,
                &selection,
                &instruction,
            );
            let outcome = CallOutcome::Edit(outcome.map_err(|e| format!("{:#}", e)));
            let _ = tx.send(outcome);
        });

        self.pending = Some(PendingCall { rx, started_at: Instant::now() });
    }

    /// Record an edited page as a new history entry and show it
    fn apply_edited_page(&mut self, edited: String) {
        self.edit_session.finish();
        let entry = self.store.append(&edited);
        let id = entry.id.clone();
        self.load_content(&id, &edited);
        self.success("✓ Edit applied");
    }

    fn copy_content(&mut self) {
        let Some(content) = self.current_content() else {
            self.error("✗ Nothing to copy");
            return;
        };
        match copy_to_clipboard(&content) {
            Ok(()) => self.success("✓ Copied to clipboard"),
            Err(e) => self.error(format!("✗ Clipboard error: {}", e)),
        }
    }

    fn copy_share_url(&mut self) {
        let Some(html) = &self.current_html else {
            self.error("✗ No page to share");
            return;
        };
        match share_url(html).and_then(|url| {
            copy_to_clipboard(&url)?;
            Ok(())
        }) {
            Ok(()) => self.success("✓ Share URL copied to clipboard"),
            Err(e) => self.error(format!("✗ {}", e)),
        }
    }

    fn open_version_overlay(&mut self) {
        if self.current_content().is_none() {
            self.error("✗ No page to save");
            return;
        }
        self.overlay = Some(Overlay::new(OverlayKind::VersionNote));
        self.needs_redraw = true;
    }

    fn open_history_overlay(&mut self, kind: OverlayKind) {
        if self.selected_entry_id().is_none() {
            self.error("✗ No history entry selected");
            return;
        }
        self.overlay = Some(Overlay::new(kind));
        self.needs_redraw = true;
    }

    fn selected_entry_id(&self) -> Option<String> {
        self.store.entries().get(self.history_selected).map(|e| e.id.clone())
    }

    /// The page the user is looking at: extracted HTML, else the raw text
    fn current_content(&self) -> Option<String> {
        self.current_html.clone().or_else(|| self.current_raw.clone())
    }
}
