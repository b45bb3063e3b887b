//! Checkout review screen

use crate::app::AppState;
use crate::checkout::PayloadOrigin;
use crate::theme::Styles;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

fn origin_text(origin: PayloadOrigin) -> &'static str {
    match origin {
        PayloadOrigin::Navigation => "from the builder",
        PayloadOrigin::Stored => "restored from your session",
        PayloadOrigin::Legacy => "restored from an older saved build",
        PayloadOrigin::Empty => "no saved build found",
    }
}

pub fn render_checkout(f: &mut Frame, state: &AppState, area: Rect) {
    let Some(ref checkout) = state.checkout else {
        f.render_widget(
            Paragraph::new("Nothing in the cart yet. Press Esc and build your PC first.")
                .style(Styles::text_muted())
                .block(Block::default().borders(Borders::ALL).title(" Checkout ")),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut items: Vec<Line> = checkout
        .lines()
        .iter()
        .map(|line| {
            Line::from(vec![
                Span::styled(format!("{:<15}", line.category.label()), Styles::text_secondary()),
                Span::styled(line.item.name.clone(), Styles::text()),
                Span::styled(format!(" ×{}", line.quantity), Styles::info()),
                Span::styled(format!("  {}", line.line_total), Styles::price()),
            ])
        })
        .collect();
    if items.is_empty() {
        items.push(Line::from(Span::styled("Your cart is empty.", Styles::text_muted())));
    }
    f.render_widget(
        Paragraph::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Order Items ({}) ", origin_text(checkout.origin())))
                    .border_style(Styles::border_active()),
            )
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    let totals = checkout.totals();
    let row = |label: &str, value: String, style| {
        Line::from(vec![
            Span::styled(format!("{label:<16}"), Styles::text_secondary()),
            Span::styled(value, style),
        ])
    };
    let delivery = if totals.delivery_fee.is_zero() {
        "Free".to_string()
    } else {
        totals.delivery_fee.to_string()
    };
    let promo_label = checkout
        .promo()
        .map(|p| format!("Promo {}", p.code))
        .unwrap_or_else(|| "Promo".to_string());

    let mut summary = vec![
        row("Subtotal", totals.subtotal.to_string(), Styles::text()),
        row("Build discount", format!("-{}", totals.build_discount), Styles::success()),
        row(&promo_label, format!("-{}", totals.promo_discount), Styles::success()),
        row("Delivery", delivery, Styles::text()),
        row("Payable", totals.payable.to_string(), Styles::price()),
        Line::from(""),
        row("Payment", checkout.payment.label().to_string(), Styles::info()),
        Line::from(""),
    ];
    if let Some(ref notice) = state.notice {
        summary.push(Line::from(Span::styled(notice.clone(), Styles::warning())));
        summary.push(Line::from(""));
    }
    summary.push(Line::from(Span::styled(
        "Place the order with: gigahz checkout --name .. --phone .. --address .. --city ..",
        Styles::nav_hint(),
    )));

    f.render_widget(
        Paragraph::new(summary)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Summary ")
                    .border_style(Styles::border_active()),
            )
            .wrap(Wrap { trim: true }),
        chunks[1],
    );
}
