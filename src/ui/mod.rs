//! User interface rendering module
//!
//! Submodules:
//! - `header` - title bar, step tabs, status and nav bar
//! - `builder` - part list and cart panel
//! - `dialogs` - brand gate, part details and advisor popups
//! - `checkout` - checkout review screen

mod builder;
mod checkout;
mod dialogs;
mod header;

use crate::app::{AppMode, AppState};
use crate::components::help_overlay::HelpOverlay;
use crate::components::keybindings::KeybindingContext;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

/// Main UI renderer
pub struct UiRenderer {
    keybindings: KeybindingContext,
}

impl Default for UiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl UiRenderer {
    pub fn new() -> Self {
        Self {
            keybindings: KeybindingContext::new(),
        }
    }

    /// Render the complete UI for the current state
    pub fn render(&self, f: &mut Frame, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Title + step tabs
                Constraint::Min(8),    // Main content
                Constraint::Length(1), // Status line
                Constraint::Length(1), // Navigation bar
            ])
            .split(f.area());

        header::render_header(f, state, chunks[0]);

        match state.mode {
            AppMode::Checkout | AppMode::PromoInput => {
                checkout::render_checkout(f, state, chunks[1]);
            }
            _ => builder::render_builder(f, state, chunks[1]),
        }

        match state.mode {
            AppMode::BrandGate => dialogs::render_brand_gate(f, state),
            AppMode::Details => dialogs::render_details(f, state),
            AppMode::Advisor => dialogs::render_advisor(f, state),
            AppMode::PromoInput => dialogs::render_promo_input(f, state),
            _ => {}
        }

        header::render_status(f, state, chunks[2]);
        header::render_nav_bar(f, state.mode, &self.keybindings, chunks[3]);

        if state.help_visible {
            HelpOverlay::new(state.mode, &self.keybindings).render(f, f.area());
        }
    }
}
