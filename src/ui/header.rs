//! Title bar, step tabs, status line and nav bar

use crate::app::{AppMode, AppState};
use crate::components::NavBar;
use crate::components::keybindings::KeybindingContext;
use crate::theme::Styles;
use crate::types::PartCategory;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

/// Render the title line and the step carousel
pub fn render_header(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3)])
        .split(area);

    let brand = state
        .session
        .brand()
        .map(|b| format!("  ·  {b}"))
        .unwrap_or_default();
    let title = Line::from(vec![
        Span::styled(" GigaHz ", Styles::title()),
        Span::styled(format!("Build My PC{brand}"), Styles::text_secondary()),
    ]);
    f.render_widget(Paragraph::new(title).alignment(Alignment::Left), chunks[0]);

    let active = state.session.active_step();
    let titles: Vec<Line> = PartCategory::all()
        .map(|category| {
            let chosen = state.session.selection().is_selected(category);
            let mark = if chosen { "✓ " } else { "" };
            Line::from(Span::styled(
                format!("{} {mark}{}", category.index() + 1, category.label()),
                Styles::step(category == active, chosen),
            ))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_active()),
        )
        .select(active.index())
        .divider(Span::styled("│", Styles::nav_hint()));
    f.render_widget(tabs, chunks[1]);
}

/// Render the status line
pub fn render_status(f: &mut Frame, state: &AppState, area: Rect) {
    let status = Paragraph::new(Span::styled(
        format!(" {}", state.status_message),
        Styles::warning(),
    ));
    f.render_widget(status, area);
}

/// Render the navigation bar
pub fn render_nav_bar(f: &mut Frame, mode: AppMode, keybinding_ctx: &KeybindingContext, area: Rect) {
    NavBar::new(keybinding_ctx.nav_items(mode)).render(f, area);
}
