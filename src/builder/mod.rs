//! PC builder wizard
//!
//! The session owns the active step, the current [`Selection`] and
//! [`QuantityMap`], the CPU brand gate and the list filters. It is the single
//! source of truth for the builder screen; the catalog cache is owned
//! alongside it and only consulted to produce the visible item list.
//!
//! # Step Flow
//!
//! ```text
//! CPU -> Motherboard -> RAM -> Storage -> Casing -> Cooling -> PSU -> GPU
//! ```
//!
//! Selecting an item advances one step (stopping at GPU). Any step can also be
//! opened directly.

mod selection;

pub use selection::{QuantityMap, Selection};

use crate::catalog::{CatalogItem, CatalogLoader, CatalogQuery};
use crate::types::{CpuBrand, PartCategory, StockFilter};
use std::fmt;
use tracing::{debug, info};

/// Default cap on a single line's quantity
pub const DEFAULT_MAX_QUANTITY: u32 = 99;

/// Why a selection attempt was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectRejection {
    /// The item is out of stock
    OutOfStock,
    /// A CPU was picked before choosing a brand
    BrandNotChosen,
    /// The CPU does not belong to the chosen brand
    BrandMismatch,
    /// The item belongs to another category
    WrongCategory,
}

impl fmt::Display for SelectRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::OutOfStock => "Item is out of stock",
            Self::BrandNotChosen => "Choose AMD or Intel first",
            Self::BrandMismatch => "CPU does not match the chosen brand",
            Self::WrongCategory => "Item belongs to a different category",
        };
        f.write_str(msg)
    }
}

/// Result of [`BuilderSession::select`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The item was stored and the wizard moved to `next_step`.
    /// `invalidated` lists categories whose selections were cleared and whose
    /// catalogs must be refetched.
    Selected {
        next_step: PartCategory,
        invalidated: Vec<PartCategory>,
    },
    /// Nothing changed
    Rejected(SelectRejection),
}

/// The builder wizard's state
#[derive(Debug, Clone)]
pub struct BuilderSession {
    active: PartCategory,
    selection: Selection,
    quantities: QuantityMap,
    brand: Option<CpuBrand>,
    stock_filter: StockFilter,
    search: String,
    max_quantity: u32,
}

impl Default for BuilderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BuilderSession {
    /// A fresh session on the CPU step with the brand gate closed
    pub fn new() -> Self {
        Self {
            active: PartCategory::first(),
            selection: Selection::new(),
            quantities: QuantityMap::new(),
            brand: None,
            stock_filter: StockFilter::All,
            search: String::new(),
            max_quantity: DEFAULT_MAX_QUANTITY,
        }
    }

    /// Set the per-line quantity cap
    pub fn with_max_quantity(mut self, max: u32) -> Self {
        self.max_quantity = max.max(1);
        self
    }

    #[inline]
    pub fn active_step(&self) -> PartCategory {
        self.active
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[inline]
    pub fn quantities(&self) -> &QuantityMap {
        &self.quantities
    }

    #[inline]
    pub fn brand(&self) -> Option<CpuBrand> {
        self.brand
    }

    #[inline]
    pub fn stock_filter(&self) -> StockFilter {
        self.stock_filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Open a step directly
    pub fn go_to(&mut self, category: PartCategory) {
        if self.active != category {
            debug!(from = %self.active, to = %category, "step change");
        }
        self.active = category;
    }

    /// Move one step forward, stopping at the last category
    pub fn next_step(&mut self) {
        if let Some(next) = self.active.next() {
            self.go_to(next);
        }
    }

    /// Move one step back, stopping at the first category
    pub fn previous_step(&mut self) {
        if let Some(prev) = self.active.previous() {
            self.go_to(prev);
        }
    }

    /// Whether `category` still needs a pick
    pub fn needs_selection(&self, category: PartCategory) -> bool {
        !self.selection.is_selected(category)
    }

    /// Choose a CPU brand. Existing CPU selections are kept; the wizard
    /// returns to the CPU step.
    pub fn choose_brand(&mut self, brand: CpuBrand) {
        info!(%brand, "CPU brand chosen");
        self.brand = Some(brand);
        self.go_to(PartCategory::Cpu);
    }

    /// Whether the brand gate is still closed
    pub fn brand_gate_open(&self) -> bool {
        self.brand.is_none()
    }

    /// Store `item` for `category` and advance.
    ///
    /// Out-of-stock items and CPUs blocked by the brand gate are rejected
    /// without touching any state.
    pub fn select(&mut self, category: PartCategory, item: CatalogItem) -> SelectOutcome {
        if let Err(reason) = self.check_selectable(category, &item) {
            debug!(%category, id = %item.id, %reason, "selection rejected");
            return SelectOutcome::Rejected(reason);
        }

        let invalidated = if category.is_cascade_root() {
            PartCategory::cpu_dependents().to_vec()
        } else {
            Vec::new()
        };

        info!(%category, id = %item.id, name = %item.name, "part selected");
        self.selection = self.selection.with_choice(category, item);

        let next_step = category.next().unwrap_or(category);
        self.go_to(next_step);

        SelectOutcome::Selected {
            next_step,
            invalidated,
        }
    }

    fn check_selectable(
        &self,
        category: PartCategory,
        item: &CatalogItem,
    ) -> Result<(), SelectRejection> {
        if item.category != category {
            return Err(SelectRejection::WrongCategory);
        }
        if !item.is_selectable() {
            return Err(SelectRejection::OutOfStock);
        }
        if category == PartCategory::Cpu {
            let brand = self.brand.ok_or(SelectRejection::BrandNotChosen)?;
            if !brand.matches(&item.brand) {
                return Err(SelectRejection::BrandMismatch);
            }
        }
        Ok(())
    }

    /// Remove the pick for `category` (clearing the CPU clears its dependents)
    pub fn clear(&mut self, category: PartCategory) {
        self.selection = self.selection.without(category);
    }

    pub fn increment_qty(&mut self, category: PartCategory) -> u32 {
        self.quantities.increment(category, self.max_quantity)
    }

    pub fn decrement_qty(&mut self, category: PartCategory) -> u32 {
        self.quantities.decrement(category)
    }

    pub fn set_stock_filter(&mut self, filter: StockFilter) {
        self.stock_filter = filter;
    }

    pub fn cycle_stock_filter(&mut self) -> StockFilter {
        self.stock_filter = self.stock_filter.cycle();
        self.stock_filter
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Clear selections, quantities, brand gate and filters; back to CPU
    pub fn reset(&mut self) {
        info!("build reset");
        let max_quantity = self.max_quantity;
        *self = Self::new().with_max_quantity(max_quantity);
    }

    /// Catalog query for `category` under the current CPU selection
    pub fn query_for(&self, category: PartCategory) -> CatalogQuery {
        CatalogQuery::for_category(category, self.selection.cpu_socket())
    }

    /// Catalog query for the active step
    pub fn active_query(&self) -> CatalogQuery {
        self.query_for(self.active)
    }

    /// Items shown for the active step.
    ///
    /// CPUs are hidden until a brand is chosen and then limited to that
    /// brand; the stock selector and name search apply to every step.
    pub fn visible_items<'a>(&self, catalog: &'a CatalogLoader) -> Vec<&'a CatalogItem> {
        let list = catalog.items(self.active);
        if self.active == PartCategory::Cpu && self.brand.is_none() {
            return Vec::new();
        }
        list.iter()
            .filter(|item| match (self.active, self.brand) {
                (PartCategory::Cpu, Some(brand)) => brand.matches(&item.brand),
                _ => true,
            })
            .filter(|item| item.name_matches(&self.search))
            .filter(|item| self.stock_filter.admits(item.stock))
            .collect()
    }
}
