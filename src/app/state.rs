//! Application state definitions
//!
//! Everything the renderer reads lives in [`AppState`]. It is owned by the
//! event loop and only mutated there.

use crate::builder::BuilderSession;
use crate::catalog::{CatalogItem, CatalogLoader};
use crate::checkout::Checkout;
use crate::types::CpuBrand;

/// Screen the builder is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppMode {
    /// AMD / Intel choice before CPUs are listed
    BrandGate,
    /// Step carousel, part list and cart
    Builder,
    /// Typing into the part search box
    Search,
    /// Details popup for the highlighted part
    Details,
    /// Build summary and question box
    Advisor,
    /// Checkout review of the snapshot
    Checkout,
    /// Typing a promo code on the checkout screen
    PromoInput,
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: AppMode,
    /// Wizard state: steps, selections, quantities, brand gate, filters
    pub session: BuilderSession,
    /// Part lists per category
    pub catalog: CatalogLoader,
    /// Highlighted row in the visible part list
    pub cursor: usize,
    /// Brand highlighted in the brand gate dialog
    pub brand_cursor: CpuBrand,
    /// Status line shown under the builder
    pub status_message: String,
    pub help_visible: bool,
    /// Part shown in the details popup
    pub details: Option<CatalogItem>,
    /// Question being typed in the advisor
    pub question: String,
    /// Latest advisor reply
    pub advisor_answer: Option<String>,
    /// Checkout opened from the last "add to cart"
    pub checkout: Option<Checkout>,
    /// Promo code being typed
    pub promo_input: String,
    /// Inline checkout notice
    pub notice: Option<String>,
}

impl AppState {
    pub fn new(session: BuilderSession, catalog: CatalogLoader) -> Self {
        Self {
            mode: AppMode::BrandGate,
            session,
            catalog,
            cursor: 0,
            brand_cursor: CpuBrand::Amd,
            status_message: "Choose a CPU brand to start your build".to_string(),
            help_visible: false,
            details: None,
            question: String::new(),
            advisor_answer: None,
            checkout: None,
            promo_input: String::new(),
            notice: None,
        }
    }

    /// Parts listed for the active step after brand, stock and search filters
    pub fn visible_items(&self) -> Vec<&CatalogItem> {
        self.session.visible_items(&self.catalog)
    }

    /// The part under the cursor, if any
    pub fn highlighted(&self) -> Option<&CatalogItem> {
        self.visible_items().get(self.cursor).copied()
    }

    /// Keep the cursor inside the visible list
    pub fn clamp_cursor(&mut self) {
        let len = self.visible_items().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}
