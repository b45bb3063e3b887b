//! Reusable UI components

pub mod help_overlay;
pub mod keybindings;

use crate::theme::Styles;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

/// A rectangle of `width_percent` of `parent`'s width and `height` rows,
/// centered in `parent`
pub fn centered_rect(parent: Rect, width_percent: u16, height: u16) -> Rect {
    let width = (parent.width as u32 * width_percent.min(100) as u32 / 100) as u16;
    let height = height.min(parent.height);
    Rect::new(
        parent.x + (parent.width.saturating_sub(width)) / 2,
        parent.y + (parent.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

/// Single-line bar of `key description` hints
pub struct NavBar<'a> {
    items: Vec<(&'a str, &'a str)>,
}

impl<'a> NavBar<'a> {
    pub fn new(items: Vec<(&'a str, &'a str)>) -> Self {
        Self { items }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::with_capacity(self.items.len() * 3);
        for (i, (key, description)) in self.items.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  │  ", Styles::nav_hint()));
            }
            spans.push(Span::styled(*key, Styles::title()));
            spans.push(Span::styled(format!(" {description}"), Styles::text_secondary()));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
