use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Studio layout configuration
pub struct AppLayout {
    pub model_area: Rect,
    pub preview_area: Rect,
    pub history_area: Option<Rect>,
    pub input_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Create the studio layout:
    /// - Model bar: top row
    /// - Preview pane (with optional history sidebar on the right)
    /// - Prompt input: 3 rows
    /// - Status bar: bottom row
    pub fn new(area: Rect, history_visible: bool) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Model bar
                Constraint::Min(5),    // Preview / history
                Constraint::Length(3), // Prompt input
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let (preview_area, history_area) = if history_visible {
            let horizontal_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(60), // Preview
                    Constraint::Percentage(40), // History sidebar
                ])
                .split(vertical_chunks[1]);
            (horizontal_chunks[0], Some(horizontal_chunks[1]))
        } else {
            (vertical_chunks[1], None)
        };

        Self {
            model_area: vertical_chunks[0],
            preview_area,
            history_area,
            input_area: vertical_chunks[2],
            status_area: vertical_chunks[3],
        }
    }

    /// Centered popup rect for input overlays
    pub fn overlay_area(area: Rect) -> Rect {
        let width = (area.width * 3 / 5).clamp(20, 80).min(area.width);
        let height = 6.min(area.height);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect::new(x, y, width, height)
    }
}
