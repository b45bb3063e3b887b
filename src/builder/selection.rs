//! Selection and quantity records
//!
//! Pure data plus the transition functions over it. The CPU cascade lives in
//! [`Selection::with_choice`] so it can be exercised without a session.

use crate::catalog::CatalogItem;
use crate::types::PartCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// At most one chosen item per category.
///
/// Serializes as a map from category name to item (or `null`), the same shape
/// the checkout surface reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<PartCategory, Option<CatalogItem>>",
    into = "BTreeMap<PartCategory, Option<CatalogItem>>"
)]
pub struct Selection {
    slots: [Option<CatalogItem>; PartCategory::COUNT],
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: PartCategory) -> Option<&CatalogItem> {
        self.slots[category.index()].as_ref()
    }

    pub fn is_selected(&self, category: PartCategory) -> bool {
        self.slots[category.index()].is_some()
    }

    /// Number of categories with a chosen item
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Chosen items in step order
    pub fn iter(&self) -> impl Iterator<Item = (PartCategory, &CatalogItem)> {
        PartCategory::all().filter_map(|c| self.get(c).map(|item| (c, item)))
    }

    /// Socket of the chosen CPU, if any
    pub fn cpu_socket(&self) -> Option<&str> {
        self.get(PartCategory::Cpu)?.socket.as_deref()
    }

    /// Transition: store `item` under `category`.
    ///
    /// Choosing a CPU clears motherboard and RAM, whose constraints were
    /// derived from the previous CPU.
    pub fn with_choice(&self, category: PartCategory, item: CatalogItem) -> Self {
        let mut next = self.clone();
        next.slots[category.index()] = Some(item);
        if category.is_cascade_root() {
            for dependent in PartCategory::cpu_dependents() {
                next.slots[dependent.index()] = None;
            }
        }
        next
    }

    /// Transition: remove the choice for `category`.
    ///
    /// Clearing the CPU clears its dependents too.
    pub fn without(&self, category: PartCategory) -> Self {
        let mut next = self.clone();
        next.slots[category.index()] = None;
        if category.is_cascade_root() {
            for dependent in PartCategory::cpu_dependents() {
                next.slots[dependent.index()] = None;
            }
        }
        next
    }

    /// Whether motherboard and RAM agree with the chosen CPU.
    ///
    /// Vacuously true with no CPU, or when the dependents are unset.
    pub fn is_compatible(&self) -> bool {
        let Some(socket) = self.cpu_socket() else {
            return true;
        };
        let board_ok = self
            .get(PartCategory::Motherboard)
            .is_none_or(|mb| mb.socket.as_deref() == Some(socket));
        let ram_ok = match crate::types::MemoryType::for_socket(socket) {
            Some(required) => self
                .get(PartCategory::Ram)
                .is_none_or(|ram| ram.memory_generation() == Some(required)),
            None => true,
        };
        board_ok && ram_ok
    }
}

impl From<BTreeMap<PartCategory, Option<CatalogItem>>> for Selection {
    fn from(map: BTreeMap<PartCategory, Option<CatalogItem>>) -> Self {
        let mut selection = Self::default();
        for (category, item) in map {
            selection.slots[category.index()] = item;
        }
        selection
    }
}

impl From<Selection> for BTreeMap<PartCategory, Option<CatalogItem>> {
    fn from(selection: Selection) -> Self {
        PartCategory::all()
            .zip(selection.slots)
            .collect()
    }
}

/// Per-category quantities, each at least 1.
///
/// Independent of [`Selection`]: a quantity survives its category's
/// selection being cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<PartCategory, u32>",
    into = "BTreeMap<PartCategory, u32>"
)]
pub struct QuantityMap {
    qty: [u32; PartCategory::COUNT],
}

impl Default for QuantityMap {
    fn default() -> Self {
        Self {
            qty: [1; PartCategory::COUNT],
        }
    }
}

impl QuantityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: PartCategory) -> u32 {
        self.qty[category.index()]
    }

    /// Set a quantity, clamped to at least 1
    pub fn set(&mut self, category: PartCategory, qty: u32) {
        self.qty[category.index()] = qty.max(1);
    }

    /// Increase by one, not exceeding `max`
    pub fn increment(&mut self, category: PartCategory, max: u32) -> u32 {
        let slot = &mut self.qty[category.index()];
        *slot = slot.saturating_add(1).min(max.max(1));
        *slot
    }

    /// Decrease by one, never below 1
    pub fn decrement(&mut self, category: PartCategory) -> u32 {
        let slot = &mut self.qty[category.index()];
        *slot = slot.saturating_sub(1).max(1);
        *slot
    }
}

impl From<BTreeMap<PartCategory, u32>> for QuantityMap {
    fn from(map: BTreeMap<PartCategory, u32>) -> Self {
        let mut quantities = Self::default();
        for (category, qty) in map {
            quantities.set(category, qty);
        }
        quantities
    }
}

impl From<QuantityMap> for BTreeMap<PartCategory, u32> {
    fn from(quantities: QuantityMap) -> Self {
        PartCategory::all().zip(quantities.qty).collect()
    }
}
