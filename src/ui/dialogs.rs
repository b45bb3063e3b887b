//! Popup dialogs drawn over the builder

use crate::advisor;
use crate::app::AppState;
use crate::components::centered_rect;
use crate::theme::Styles;
use crate::types::CpuBrand;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use strum::IntoEnumIterator;

fn popup(f: &mut Frame, width_percent: u16, height: u16, title: &str) -> (Rect, Block<'static>) {
    let area = centered_rect(f.area(), width_percent, height);
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .border_style(Styles::border_active())
        .style(Styles::panel_bg());
    (area, block)
}

/// AMD / Intel choice
pub fn render_brand_gate(f: &mut Frame, state: &AppState) {
    let (area, block) = popup(f, 50, 9, "Choose your CPU brand");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    f.render_widget(
        Paragraph::new("Processors are listed after you pick a platform")
            .style(Styles::text_secondary())
            .alignment(Alignment::Center),
        rows[0],
    );

    let options = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    for (brand, slot) in CpuBrand::iter().zip(options.iter()) {
        let style = if brand == state.brand_cursor {
            Styles::selected()
        } else {
            Styles::text()
        };
        let button = Paragraph::new(brand.to_string())
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(button, *slot);
    }
}

/// Details of the highlighted part
pub fn render_details(f: &mut Frame, state: &AppState) {
    let Some(ref item) = state.details else {
        return;
    };
    let (area, block) = popup(f, 60, 14, &item.name);

    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<12}"), Styles::text_secondary()),
            Span::styled(value, Styles::text()),
        ])
    };

    let mut lines = vec![
        field("Category", item.category.label().to_string()),
        field("Brand", item.brand.clone()),
        Line::from(vec![
            Span::styled(format!("{:<12}", "Price"), Styles::text_secondary()),
            Span::styled(item.price.to_string(), Styles::price()),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<12}", "Stock"), Styles::text_secondary()),
            Span::styled(item.stock.badge(), Styles::stock(item.stock)),
        ]),
    ];
    if let Some(ref socket) = item.socket {
        lines.push(field("Socket", socket.clone()));
    }
    if let Some(ref mem) = item.memory_type {
        lines.push(field("Memory", mem.clone()));
    }
    if let Some(watts) = item.wattage {
        lines.push(field("Wattage", format!("{watts} W")));
    }
    if let Some(ref image) = item.image {
        lines.push(field("Image", image.clone()));
    }
    lines.push(field("ID", item.id.clone()));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Build summary with a question box
pub fn render_advisor(f: &mut Frame, state: &AppState) {
    let (area, block) = popup(f, 70, 20, "Build Advisor");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(inner);

    let selection = state.session.selection();
    let mut text: Vec<Line> = advisor::build_summary(selection)
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Styles::text())))
        .collect();
    if let Some(ref answer) = state.advisor_answer {
        text.push(Line::from(""));
        text.extend(
            answer
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Styles::info()))),
        );
    }
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), rows[0]);

    let input = Paragraph::new(format!("{}▏", state.question))
        .style(Styles::success())
        .block(Block::default().borders(Borders::ALL).title(" Ask "));
    f.render_widget(input, rows[1]);
}

/// Promo code entry on the checkout screen
pub fn render_promo_input(f: &mut Frame, state: &AppState) {
    let (area, block) = popup(f, 40, 3, "Promo code");
    let input = Paragraph::new(format!("{}▏", state.promo_input))
        .style(Styles::success())
        .block(block);
    f.render_widget(input, area);
}
