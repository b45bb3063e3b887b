//! Centralized colors and styles for the builder TUI
//!
//! All colors live here rather than being hardcoded in the render functions.

use ratatui::style::{Color, Modifier, Style};

use crate::types::StockStatus;

/// Core color palette
pub struct Colors;

impl Colors {
    /// Dark background for dialogs
    pub const BG_PRIMARY: Color = Color::Rgb(20, 20, 30);

    /// Default foreground text color
    pub const FG_PRIMARY: Color = Color::White;

    /// Secondary/muted text color
    pub const FG_SECONDARY: Color = Color::Gray;

    /// Disabled/inactive text color
    pub const FG_MUTED: Color = Color::DarkGray;

    /// Brand accent, used for borders and titles
    pub const PRIMARY: Color = Color::Cyan;

    /// Emphasis for the cursor row and prices
    pub const SECONDARY: Color = Color::Yellow;

    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
    pub const INFO: Color = Color::Blue;

    pub const SELECTED_BG: Color = Color::Yellow;
    pub const SELECTED_FG: Color = Color::Black;

    /// Step that still needs a pick
    pub const STEP_PENDING: Color = Color::Gray;
    /// Step with a chosen part
    pub const STEP_COMPLETE: Color = Color::Green;
    /// Highlight for the active step when it still needs a pick
    pub const STEP_URGENT: Color = Color::LightRed;

    pub const NAV_HINT: Color = Color::DarkGray;
}

/// Pre-built styles
pub struct Styles;

impl Styles {
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn price() -> Style {
        Style::default().fg(Colors::SECONDARY)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Colors::PRIMARY)
    }

    pub fn border_urgent() -> Style {
        Style::default()
            .fg(Colors::STEP_URGENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn panel_bg() -> Style {
        Style::default().bg(Colors::BG_PRIMARY)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Colors::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Colors::ERROR)
    }

    pub fn info() -> Style {
        Style::default().fg(Colors::INFO)
    }

    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::NAV_HINT)
    }

    /// Badge style for a stock status
    pub fn stock(status: StockStatus) -> Style {
        match status {
            StockStatus::InStock => Self::success(),
            StockStatus::OutOfStock => Self::error(),
            StockStatus::PreOrder => Self::info(),
        }
    }

    /// Step tab style
    pub fn step(active: bool, chosen: bool) -> Style {
        match (active, chosen) {
            (true, false) => Self::border_urgent(),
            (true, true) => Self::selected(),
            (false, true) => Style::default().fg(Colors::STEP_COMPLETE),
            (false, false) => Style::default().fg(Colors::STEP_PENDING),
        }
    }
}
