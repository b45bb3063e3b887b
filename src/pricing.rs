//! Cart lines, volume discount and payable total
//!
//! Everything here is a pure function of (Selection, QuantityMap). Nothing is
//! cached; callers recompute on every read.

use crate::builder::{QuantityMap, Selection};
use crate::catalog::CatalogItem;
use crate::money::Lkr;
use crate::types::PartCategory;
use serde::{Deserialize, Serialize};

/// One priced row of the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub category: PartCategory,
    pub item: CatalogItem,
    pub quantity: u32,
    pub line_total: Lkr,
}

/// Volume discount tier, by number of selected categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountTier {
    /// Fewer than 3 categories
    None,
    /// 3 or 4 categories
    OnePercent,
    /// 5 or more categories
    TwoPercent,
}

impl DiscountTier {
    pub const fn for_count(selected: usize) -> Self {
        match selected {
            0..=2 => Self::None,
            3..=4 => Self::OnePercent,
            _ => Self::TwoPercent,
        }
    }

    pub const fn percent(self) -> u64 {
        match self {
            Self::None => 0,
            Self::OnePercent => 1,
            Self::TwoPercent => 2,
        }
    }
}

/// Price lines for every selected category, in step order.
///
/// Quantities below 1 are treated as 1.
pub fn cart_lines(selection: &Selection, quantities: &QuantityMap) -> Vec<CartLine> {
    selection
        .iter()
        .map(|(category, item)| {
            let quantity = quantities.get(category).max(1);
            CartLine {
                category,
                item: item.clone(),
                quantity,
                line_total: item.price.times(quantity),
            }
        })
        .collect()
}

pub fn subtotal(lines: &[CartLine]) -> Lkr {
    lines.iter().map(|l| l.line_total).sum()
}

/// Build discount for `line_count` selected categories, rounded half up to a
/// whole rupee
pub fn build_discount(subtotal: Lkr, line_count: usize) -> Lkr {
    subtotal.percent_rounded(DiscountTier::for_count(line_count).percent())
}

/// Derived totals of a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub lines: Vec<CartLine>,
    pub subtotal: Lkr,
    pub tier: DiscountTier,
    pub discount: Lkr,
    pub payable: Lkr,
}

impl PriceSummary {
    pub fn compute(selection: &Selection, quantities: &QuantityMap) -> Self {
        let lines = cart_lines(selection, quantities);
        let subtotal = subtotal(&lines);
        let tier = DiscountTier::for_count(lines.len());
        let discount = subtotal.percent_rounded(tier.percent());
        Self {
            payable: subtotal.saturating_sub(discount),
            lines,
            subtotal,
            tier,
            discount,
        }
    }

    pub fn line(&self, category: PartCategory) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.category == category)
    }
}
