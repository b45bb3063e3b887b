//! Type-safe domain enums for the PC builder
//!
//! Categories, stock states, brands and filters are proper Rust enums so the
//! wizard can match on them exhaustively instead of passing strings around.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Part category. The declaration order is the wizard step order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PartCategory {
    Cpu,
    Motherboard,
    Ram,
    Storage,
    Casing,
    Cooling,
    Psu,
    Gpu,
}

impl PartCategory {
    /// Number of wizard steps.
    pub const COUNT: usize = 8;

    /// All categories in step order
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Zero-based step index
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Category at a step index, if in range
    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    /// First wizard step
    pub const fn first() -> Self {
        Self::Cpu
    }

    /// Next step, or `None` at the last category (no wraparound)
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Previous step, or `None` at the first category
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Category name expected by the product API's `category` parameter.
    ///
    /// The store keeps cases under the `case` slug.
    pub const fn api_slug(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Motherboard => "motherboard",
            Self::Ram => "ram",
            Self::Storage => "storage",
            Self::Casing => "case",
            Self::Cooling => "cooling",
            Self::Psu => "psu",
            Self::Gpu => "gpu",
        }
    }

    /// Human readable step label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Motherboard => "Motherboard",
            Self::Ram => "RAM",
            Self::Storage => "SSD & HDD",
            Self::Casing => "Casing",
            Self::Cooling => "Cooling & Fans",
            Self::Psu => "Power Unit",
            Self::Gpu => "GPU",
        }
    }

    /// Whether selecting in this category invalidates other selections
    pub const fn is_cascade_root(self) -> bool {
        matches!(self, Self::Cpu)
    }

    /// Categories whose compatibility constraints derive from the CPU
    pub const fn cpu_dependents() -> [Self; 2] {
        [Self::Motherboard, Self::Ram]
    }
}

/// Availability of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum StockStatus {
    #[serde(rename = "in")]
    #[strum(serialize = "in")]
    InStock,
    #[serde(rename = "out")]
    #[strum(serialize = "out")]
    OutOfStock,
    #[serde(rename = "pre")]
    #[strum(serialize = "pre")]
    PreOrder,
}

impl StockStatus {
    /// Map the API's stock quantity onto a status
    pub fn from_quantity(qty: i64) -> Self {
        if qty > 0 { Self::InStock } else { Self::OutOfStock }
    }

    /// Badge text shown next to an item
    pub const fn badge(self) -> &'static str {
        match self {
            Self::InStock => "In stock",
            Self::OutOfStock => "Out of stock",
            Self::PreOrder => "Pre-order",
        }
    }

    /// Whether an item with this status may be added to a build
    pub const fn is_selectable(self) -> bool {
        !matches!(self, Self::OutOfStock)
    }
}

/// Memory generation used for RAM compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemoryType {
    Ddr4,
    Ddr5,
}

impl MemoryType {
    /// Memory type implied by a CPU socket.
    ///
    /// Only AM5 and AM4 pin down a generation; every other socket is left
    /// unconstrained.
    pub fn for_socket(socket: &str) -> Option<Self> {
        match socket {
            "AM5" => Some(Self::Ddr5),
            "AM4" => Some(Self::Ddr4),
            _ => None,
        }
    }
}

/// CPU brand gate variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum CpuBrand {
    #[default]
    #[strum(serialize = "AMD")]
    Amd,
    #[strum(serialize = "Intel")]
    Intel,
}

impl CpuBrand {
    /// Whether a catalog brand string belongs to this brand
    pub fn matches(self, brand: &str) -> bool {
        brand.trim().eq_ignore_ascii_case(&self.to_string())
    }

    /// The other gate variant
    pub const fn toggled(self) -> Self {
        match self {
            Self::Amd => Self::Intel,
            Self::Intel => Self::Amd,
        }
    }
}

/// Stock selector applied to the visible item list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum StockFilter {
    #[default]
    All,
    #[strum(serialize = "in")]
    InStock,
    #[strum(serialize = "out")]
    OutOfStock,
    #[strum(serialize = "pre")]
    PreOrder,
}

impl StockFilter {
    /// Whether an item with `status` passes this filter
    pub fn admits(self, status: StockStatus) -> bool {
        match self {
            Self::All => true,
            Self::InStock => status == StockStatus::InStock,
            Self::OutOfStock => status == StockStatus::OutOfStock,
            Self::PreOrder => status == StockStatus::PreOrder,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::InStock => "In stock",
            Self::OutOfStock => "Out of stock",
            Self::PreOrder => "Pre-order",
        }
    }

    /// Next selector in All → In → Out → Pre → All order
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::InStock,
            Self::InStock => Self::OutOfStock,
            Self::OutOfStock => Self::PreOrder,
            Self::PreOrder => Self::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_is_step_order() {
        let order: Vec<_> = PartCategory::all().collect();
        assert_eq!(order.len(), PartCategory::COUNT);
        assert_eq!(order[0], PartCategory::Cpu);
        assert_eq!(order[7], PartCategory::Gpu);
        for (i, c) in order.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn test_next_is_bounded() {
        assert_eq!(PartCategory::Cpu.next(), Some(PartCategory::Motherboard));
        assert_eq!(PartCategory::Gpu.next(), None);
        assert_eq!(PartCategory::Cpu.previous(), None);
    }

    #[test]
    fn test_casing_uses_case_slug() {
        assert_eq!(PartCategory::Casing.api_slug(), "case");
        assert_eq!(PartCategory::Casing.to_string(), "casing");
    }

    #[test]
    fn test_memory_type_for_socket() {
        assert_eq!(MemoryType::for_socket("AM5"), Some(MemoryType::Ddr5));
        assert_eq!(MemoryType::for_socket("AM4"), Some(MemoryType::Ddr4));
        assert_eq!(MemoryType::for_socket("LGA1700"), None);
        assert_eq!(MemoryType::Ddr5.to_string(), "DDR5");
    }

    #[test]
    fn test_cpu_brand_matches_case_insensitively() {
        assert!(CpuBrand::Amd.matches("amd"));
        assert!(CpuBrand::Intel.matches("Intel "));
        assert!(!CpuBrand::Intel.matches("AMD"));
    }

    #[test]
    fn test_stock_filter_cycle() {
        let mut f = StockFilter::All;
        for _ in 0..4 {
            f = f.cycle();
        }
        assert_eq!(f, StockFilter::All);
        assert!(StockFilter::PreOrder.admits(StockStatus::PreOrder));
        assert!(!StockFilter::InStock.admits(StockStatus::OutOfStock));
    }

    #[test]
    fn test_stock_from_quantity() {
        assert_eq!(StockStatus::from_quantity(3), StockStatus::InStock);
        assert_eq!(StockStatus::from_quantity(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_quantity(-1), StockStatus::OutOfStock);
    }
}
