//! Builder screen: part list for the active step and the cart panel

use crate::app::AppState;
use crate::catalog::CatalogState;
use crate::pricing::PriceSummary;
use crate::theme::Styles;
use crate::types::PartCategory;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

pub fn render_builder(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_parts(f, state, chunks[0]);
    render_cart(f, state, chunks[1]);
}

fn list_title(state: &AppState) -> String {
    let step = state.session.active_step();
    let mut title = format!(" {} ", step.label());
    if step.is_cascade_root() {
        if let Some(brand) = state.session.brand() {
            title.push_str(&format!("· {brand} "));
        }
    }
    if let Some(query) = state.catalog.current_query(step) {
        if let Some(ref socket) = query.socket {
            title.push_str(&format!("· socket {socket} "));
        }
        if let Some(mem) = query.memory_type {
            title.push_str(&format!("· {mem} "));
        }
    }
    title.push_str(&format!("· {} ", state.session.stock_filter().label()));
    if !state.session.search().is_empty() {
        title.push_str(&format!("· \"{}\" ", state.session.search()));
    }
    title
}

fn render_parts(f: &mut Frame, state: &AppState, area: Rect) {
    let step = state.session.active_step();
    let border = if state.session.needs_selection(step) {
        Styles::border_urgent()
    } else {
        Styles::border_active()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(list_title(state))
        .border_style(border);

    let placeholder = |text: String, style| {
        Paragraph::new(Span::styled(text, style))
            .block(block.clone())
            .wrap(Wrap { trim: true })
    };

    if step == PartCategory::Cpu && state.session.brand_gate_open() {
        let p = placeholder("Choose AMD or Intel to see processors (press b)".into(), Styles::info());
        f.render_widget(p, area);
        return;
    }

    match state.catalog.state(step) {
        None | Some(CatalogState::Loading) => {
            f.render_widget(placeholder("Loading…".into(), Styles::text_muted()), area);
            return;
        }
        Some(CatalogState::Failed(err)) => {
            let p = placeholder(format!("Could not load {}: {err}", step.label()), Styles::error());
            f.render_widget(p, area);
            return;
        }
        Some(CatalogState::Ready(_)) => {}
    }

    let visible = state.visible_items();
    if visible.is_empty() {
        let p = placeholder("No parts match the current filters".into(), Styles::text_muted());
        f.render_widget(p, area);
        return;
    }

    let chosen_id = state.session.selection().get(step).map(|i| i.id.as_str());
    let items: Vec<ListItem> = visible
        .iter()
        .map(|item| {
            let marker = if Some(item.id.as_str()) == chosen_id { "✓ " } else { "  " };
            let name_style = if item.is_selectable() {
                Styles::text()
            } else {
                Styles::text_muted()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Styles::success()),
                Span::styled(item.name.clone(), name_style),
                Span::styled(format!("  {}", item.brand), Styles::text_secondary()),
                Span::styled(format!("  {}", item.price), Styles::price()),
                Span::styled(format!("  [{}]", item.stock.badge()), Styles::stock(item.stock)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Styles::selected())
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_cart(f: &mut Frame, state: &AppState, area: Rect) {
    let summary = PriceSummary::compute(state.session.selection(), state.session.quantities());
    let quantities = state.session.quantities();

    let mut lines: Vec<Line> = PartCategory::all()
        .map(|category| match summary.line(category) {
            Some(line) => Line::from(vec![
                Span::styled(format!("{:<15}", category.label()), Styles::text_secondary()),
                Span::styled(line.item.name.clone(), Styles::text()),
                Span::styled(format!(" ×{}", line.quantity), Styles::info()),
                Span::styled(format!("  {}", line.line_total), Styles::price()),
            ]),
            None => Line::from(vec![
                Span::styled(format!("{:<15}", category.label()), Styles::text_muted()),
                Span::styled(
                    format!("not selected (qty {})", quantities.get(category)),
                    Styles::text_muted(),
                ),
            ]),
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Subtotal   ", Styles::text_secondary()),
        Span::styled(summary.subtotal.to_string(), Styles::text()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(
            format!("Discount {}% ", summary.tier.percent()),
            Styles::text_secondary(),
        ),
        Span::styled(format!("-{}", summary.discount), Styles::success()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Payable    ", Styles::title()),
        Span::styled(summary.payable.to_string(), Styles::price()),
    ]));
    if summary.lines.len() < 3 {
        lines.push(Line::from(Span::styled(
            "Pick 3 parts for 1% off, 5 for 2% off",
            Styles::nav_hint(),
        )));
    }

    let cart = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Your Build ({}/8) ", summary.lines.len()))
                .border_style(Styles::border_active()),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(cart, area);
}
