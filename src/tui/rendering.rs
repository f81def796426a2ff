use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::app::{Focus, MessageType, Overlay, OverlayKind, StatusMessage};
use super::layout::AppLayout;
use super::timestamps::format_timestamp;
use crate::models::HistoryEntry;

// Palette
const TEXT_BRIGHT: Color = Color::Rgb(250, 250, 250);
const TEXT_MUTED: Color = Color::Rgb(113, 113, 122);
const ACCENT: Color = Color::Rgb(129, 140, 248);
const ACCENT_BG: Color = Color::Rgb(79, 70, 229);
const ERROR: Color = Color::Rgb(239, 68, 68);
const BAR_BG: Color = Color::Rgb(24, 24, 27);

/// Everything the renderer needs for one frame
pub struct RenderState<'a> {
    pub model: &'a str,
    pub gateway_banner: Option<&'a str>,
    pub prompt_input: &'a str,
    pub preview_text: Option<&'a str>,
    pub preview_url: Option<String>,
    pub raw_fallback: bool,
    pub entries: &'a [HistoryEntry],
    pub history_visible: bool,
    pub history_selected: usize,
    pub current_history_index: Option<usize>,
    pub focus: Focus,
    pub status_message: Option<&'a StatusMessage>,
    pub generating_secs: Option<u64>,
    pub overlay: Option<&'a Overlay>,
    pub selection_pending: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub preview_scroll: u16,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area(), state.history_visible);

    render_model_bar(frame, layout.model_area, state);
    render_preview(frame, layout.preview_area, state);
    if let Some(history_area) = layout.history_area {
        render_history(frame, history_area, state);
    }
    render_input(frame, layout.input_area, state);
    render_status_bar(frame, layout.status_area, state);

    if let Some(overlay) = state.overlay {
        render_overlay(frame, overlay);
    }
}

fn render_model_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let line = if let Some(banner) = state.gateway_banner {
        Line::from(Span::styled(format!(" ⚠ {} ", banner), Style::default().fg(ERROR)))
    } else {
        Line::from(vec![
            Span::styled(" Model: ", Style::default().fg(TEXT_MUTED)),
            Span::styled("◂ ", Style::default().fg(TEXT_MUTED)),
            Span::styled(state.model, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled(" ▸", Style::default().fg(TEXT_MUTED)),
            Span::styled("   (←/→ to change)", Style::default().fg(TEXT_MUTED)),
        ])
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_preview(frame: &mut Frame, area: Rect, state: &RenderState) {
    let title = if state.raw_fallback { " Raw response " } else { " Preview " };
    let border = if state.focus == Focus::Preview { ACCENT } else { TEXT_MUTED };

    let content = match state.preview_text {
        Some(text) => {
            let mut lines = Vec::new();
            // Point at the on-disk preview so the page can be opened in a
            // real browser
            if !state.raw_fallback
                && let Some(url) = &state.preview_url
            {
                lines.push(Line::from(Span::styled(
                    format!("↗ {}", url),
                    Style::default().fg(TEXT_MUTED),
                )));
                lines.push(Line::from(""));
            }
            for line in text.lines() {
                lines.push(Line::from(line.to_string()));
            }
            Text::from(lines)
        }
        None => Text::from(Span::styled(
            "Type a prompt below and press Enter to generate a page.",
            Style::default().fg(TEXT_MUTED),
        )),
    };

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(title),
        )
        .wrap(Wrap { trim: false })
        .scroll((state.preview_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_history(frame: &mut Frame, area: Rect, state: &RenderState) {
    let items: Vec<ListItem> = state
        .entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let marker = if Some(idx) == state.current_history_index { "●" } else { " " };
            let name = entry.project_name.as_deref().unwrap_or("Untitled Page");
            let timestamp = format_timestamp(&entry.timestamp);

            let content = format!("{} {} | {}", marker, name, timestamp);

            let style = if idx == state.history_selected {
                Style::default().fg(TEXT_BRIGHT).bg(ACCENT_BG).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(TEXT_MUTED)
            };

            ListItem::new(content).style(style)
        })
        .collect();

    let border = if state.focus == Focus::History { ACCENT } else { TEXT_MUTED };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" History (Enter: load, r: rename, d: describe) "),
    );

    frame.render_widget(list, area);
}

fn render_input(frame: &mut Frame, area: Rect, state: &RenderState) {
    let border = if state.focus == Focus::Prompt { ACCENT } else { TEXT_MUTED };

    // Trailing block cursor when the prompt has focus
    let mut spans = vec![Span::raw(state.prompt_input.to_string())];
    if state.focus == Focus::Prompt && state.overlay.is_none() {
        spans.push(Span::styled("█", Style::default().fg(ACCENT)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Prompt "),
    );

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let (text, style) = if let Some(msg) = state.status_message {
        let color = match msg.message_type {
            MessageType::Success => TEXT_BRIGHT,
            MessageType::Error => ERROR,
        };
        (format!(" {} ", msg.text), Style::default().fg(color).bg(BAR_BG))
    } else if let Some(secs) = state.generating_secs {
        (format!(" Generating… {}s ", secs), Style::default().fg(ACCENT).bg(BAR_BG))
    } else if state.selection_pending {
        (
            " Selection ready | e: edit text  a: AI edit  Esc: cancel ".to_string(),
            Style::default().fg(TEXT_BRIGHT).bg(BAR_BG),
        )
    } else {
        let mut parts = vec!["Enter: generate".to_string()];
        if state.can_undo {
            parts.push("^Z: undo".to_string());
        }
        if state.can_redo {
            parts.push("^R: redo".to_string());
        }
        parts.push("^S: select".to_string());
        parts.push("^O: history".to_string());
        parts.push("^V: save version".to_string());
        parts.push("^C: quit".to_string());
        (format!(" {} ", parts.join(" | ")), Style::default().fg(TEXT_MUTED).bg(BAR_BG))
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_overlay(frame: &mut Frame, overlay: &Overlay) {
    let title = match overlay.kind {
        OverlayKind::SelectTarget => " Select text to edit ",
        OverlayKind::ManualReplace => " Replacement text ",
        OverlayKind::AiInstruction => " Describe the change ",
        OverlayKind::Rename => " Project name ",
        OverlayKind::Describe => " Project description ",
        OverlayKind::VersionNote => " Version note ",
    };

    let area = AppLayout::overlay_area(frame.area());
    frame.render_widget(Clear, area);

    let content = Text::from(vec![
        Line::from(vec![
            Span::raw(overlay.input.clone()),
            Span::styled("█", Style::default().fg(ACCENT)),
        ]),
        Line::from(""),
        Line::from(Span::styled("Enter: apply   Esc: cancel", Style::default().fg(TEXT_MUTED))),
    ]);

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(title),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
