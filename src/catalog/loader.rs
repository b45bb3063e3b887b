//! Per-category catalog cache
//!
//! Each category holds the query it was last requested with and the outcome
//! of that request. Fetches are tagged with a [`FetchTicket`]; only the most
//! recently issued ticket for a category may commit, so a slow response for
//! an outdated socket can never overwrite a newer list.

use super::{CatalogItem, ProductRow, ProductSource, normalize};
use crate::error::CatalogError;
use crate::types::{MemoryType, PartCategory};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Constraint key for one category fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogQuery {
    pub category: PartCategory,
    /// Required socket (motherboards only)
    pub socket: Option<String>,
    /// Required memory generation (RAM only)
    pub memory_type: Option<MemoryType>,
    /// Ask the API for active listings only
    pub active_only: bool,
}

impl CatalogQuery {
    /// Unconstrained query for a category
    pub fn new(category: PartCategory) -> Self {
        Self {
            category,
            socket: None,
            memory_type: None,
            active_only: true,
        }
    }

    /// Query for `category` given the currently selected CPU socket.
    ///
    /// Motherboards must share the CPU socket; RAM is pinned to the memory
    /// generation that socket implies.
    pub fn for_category(category: PartCategory, cpu_socket: Option<&str>) -> Self {
        let mut query = Self::new(category);
        match category {
            PartCategory::Motherboard => {
                query.socket = cpu_socket.map(str::to_string);
            }
            PartCategory::Ram => {
                query.memory_type = cpu_socket.and_then(MemoryType::for_socket);
            }
            _ => {}
        }
        query
    }

    /// Toggle the active-only flag
    pub fn active_only(mut self, active_only: bool) -> Self {
        self.active_only = active_only;
        self
    }

    /// Whether a normalized item satisfies this query's constraints.
    ///
    /// Filters are strict: an item lacking the attribute does not match a
    /// query that sets it.
    pub fn admits(&self, item: &CatalogItem) -> bool {
        if let Some(ref socket) = self.socket {
            if item.socket.as_deref() != Some(socket.as_str()) {
                return false;
            }
        }
        if let Some(mem) = self.memory_type {
            if item.memory_generation() != Some(mem) {
                return false;
            }
        }
        true
    }
}

/// A handle for one in-flight fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub query: CatalogQuery,
    generation: u64,
}

impl FetchTicket {
    pub fn category(&self) -> PartCategory {
        self.query.category
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of the latest request for a category
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogState {
    Loading,
    Ready(Vec<CatalogItem>),
    Failed(String),
}

#[derive(Debug, Clone)]
struct CategoryEntry {
    query: CatalogQuery,
    generation: u64,
    state: CatalogState,
}

/// Catalog cache keyed by category
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    api_base: String,
    entries: HashMap<PartCategory, CategoryEntry>,
    next_generation: u64,
}

impl CatalogLoader {
    /// Create an empty cache. `api_base` is used to absolutize image paths.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            entries: HashMap::new(),
            next_generation: 1,
        }
    }

    /// Whether `query` has to be (re)fetched.
    ///
    /// True when the category has never been loaded, was loaded under a
    /// different constraint key, or its last fetch failed.
    pub fn needs_fetch(&self, query: &CatalogQuery) -> bool {
        match self.entries.get(&query.category) {
            None => true,
            Some(entry) if entry.query != *query => true,
            Some(entry) => matches!(entry.state, CatalogState::Failed(_)),
        }
    }

    /// Whether the latest fetch for exactly `query` failed
    pub fn failed_for(&self, query: &CatalogQuery) -> bool {
        self.entries.get(&query.category).is_some_and(|entry| {
            entry.query == *query && matches!(entry.state, CatalogState::Failed(_))
        })
    }

    /// Register a new fetch for `query`, superseding any in flight for the
    /// same category.
    pub fn begin(&mut self, query: CatalogQuery) -> FetchTicket {
        let generation = self.next_generation;
        self.next_generation += 1;
        debug!(category = %query.category, generation, ?query, "catalog fetch issued");

        self.entries.insert(
            query.category,
            CategoryEntry {
                query: query.clone(),
                generation,
                state: CatalogState::Loading,
            },
        );
        FetchTicket { query, generation }
    }

    /// Commit the result of a fetch.
    ///
    /// Returns `false` (and changes nothing) when the ticket has been
    /// superseded by a newer request for the same category.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<ProductRow>, CatalogError>,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.query.category) else {
            debug!(category = %ticket.category(), "dropping response for reset category");
            return false;
        };
        if entry.generation != ticket.generation || entry.query != ticket.query {
            debug!(
                category = %ticket.category(),
                stale = ticket.generation,
                current = entry.generation,
                "discarding stale catalog response"
            );
            return false;
        }

        entry.state = match result {
            Ok(rows) => {
                let items: Vec<CatalogItem> = rows
                    .iter()
                    .map(|row| normalize(row, ticket.query.category, &self.api_base))
                    .filter(|item| ticket.query.admits(item))
                    .collect();
                info!(category = %ticket.category(), count = items.len(), "catalog loaded");
                CatalogState::Ready(items)
            }
            Err(e) => {
                warn!(category = %ticket.category(), error = %e, "catalog fetch failed");
                CatalogState::Failed(e.to_string())
            }
        };
        true
    }

    /// Fetch `query` synchronously through `source` and commit the result.
    ///
    /// Returns the normalized list, or an empty list on failure (the error is
    /// kept for [`CatalogLoader::error`]).
    pub fn load(&mut self, source: &dyn ProductSource, query: CatalogQuery) -> &[CatalogItem] {
        let category = query.category;
        if self.needs_fetch(&query) {
            let ticket = self.begin(query);
            let result = source.fetch(&ticket.query);
            self.complete(&ticket, result);
        } else {
            debug!(%category, "catalog cache hit");
        }
        self.items(category)
    }

    /// Items currently held for a category (empty while loading or failed)
    pub fn items(&self, category: PartCategory) -> &[CatalogItem] {
        match self.entries.get(&category).map(|e| &e.state) {
            Some(CatalogState::Ready(items)) => items,
            _ => &[],
        }
    }

    /// State of the latest request for a category
    pub fn state(&self, category: PartCategory) -> Option<&CatalogState> {
        self.entries.get(&category).map(|e| &e.state)
    }

    /// Error message from the latest failed fetch for a category
    pub fn error(&self, category: PartCategory) -> Option<&str> {
        match self.state(category) {
            Some(CatalogState::Failed(msg)) => Some(msg),
            _ => None,
        }
    }

    pub fn is_loading(&self, category: PartCategory) -> bool {
        matches!(self.state(category), Some(CatalogState::Loading))
    }

    /// Query the category was last requested with
    pub fn current_query(&self, category: PartCategory) -> Option<&CatalogQuery> {
        self.entries.get(&category).map(|e| &e.query)
    }

    /// Drop cached entries for the given categories
    pub fn invalidate(&mut self, categories: &[PartCategory]) {
        for category in categories {
            self.entries.remove(category);
        }
    }

    /// Drop every cached entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(v: serde_json::Value) -> Vec<ProductRow> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_query_for_motherboard_uses_cpu_socket() {
        let q = CatalogQuery::for_category(PartCategory::Motherboard, Some("AM5"));
        assert_eq!(q.socket.as_deref(), Some("AM5"));
        assert_eq!(q.memory_type, None);
    }

    #[test]
    fn test_query_for_ram_derives_memory_type() {
        let am5 = CatalogQuery::for_category(PartCategory::Ram, Some("AM5"));
        let am4 = CatalogQuery::for_category(PartCategory::Ram, Some("AM4"));
        let intel = CatalogQuery::for_category(PartCategory::Ram, Some("LGA1700"));
        assert_eq!(am5.memory_type, Some(MemoryType::Ddr5));
        assert_eq!(am4.memory_type, Some(MemoryType::Ddr4));
        assert_eq!(intel.memory_type, None);
        assert_eq!(am5.socket, None);
    }

    #[test]
    fn test_other_categories_are_unconstrained() {
        let q = CatalogQuery::for_category(PartCategory::Gpu, Some("AM5"));
        assert_eq!(q, CatalogQuery::new(PartCategory::Gpu));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut loader = CatalogLoader::new("http://h");
        let c1 = CatalogQuery::for_category(PartCategory::Motherboard, Some("AM4"));
        let c2 = CatalogQuery::for_category(PartCategory::Motherboard, Some("AM5"));

        let t1 = loader.begin(c1);
        let t2 = loader.begin(c2);

        let am5 = rows(json!([{ "id": 2, "name": "B650", "socket": "AM5", "stock_qty": 1 }]));
        let am4 = rows(json!([{ "id": 1, "name": "B550", "socket": "AM4", "stock_qty": 1 }]));

        assert!(loader.complete(&t2, Ok(am5)));
        assert!(!loader.complete(&t1, Ok(am4)));

        let items = loader.items(PartCategory::Motherboard);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "B650");
    }

    #[test]
    fn test_failure_yields_empty_list_and_error() {
        let mut loader = CatalogLoader::new("http://h");
        let t = loader.begin(CatalogQuery::new(PartCategory::Psu));
        loader.complete(&t, Err(CatalogError::Status { status: 500 }));

        assert!(loader.items(PartCategory::Psu).is_empty());
        assert_eq!(loader.error(PartCategory::Psu), Some("API error 500"));
        assert!(loader.needs_fetch(&CatalogQuery::new(PartCategory::Psu)));
        assert!(loader.failed_for(&CatalogQuery::new(PartCategory::Psu)));
        assert!(!loader.failed_for(&CatalogQuery::new(PartCategory::Psu).active_only(false)));
    }

    #[test]
    fn test_cached_query_does_not_refetch() {
        let mut loader = CatalogLoader::new("http://h");
        let q = CatalogQuery::new(PartCategory::Storage);
        let t = loader.begin(q.clone());
        loader.complete(&t, Ok(Vec::new()));
        assert!(!loader.needs_fetch(&q));
        assert!(loader.needs_fetch(&q.clone().active_only(false)));
    }

    #[test]
    fn test_admits_drops_mismatched_socket() {
        let mut loader = CatalogLoader::new("http://h");
        let t = loader.begin(CatalogQuery::for_category(PartCategory::Motherboard, Some("AM5")));
        let mixed = rows(json!([
            { "id": 1, "socket": "AM5", "stock_qty": 1 },
            { "id": 2, "socket": "AM4", "stock_qty": 1 },
            { "id": 3, "stock_qty": 1 }
        ]));
        loader.complete(&t, Ok(mixed));
        let ids: Vec<_> = loader
            .items(PartCategory::Motherboard)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1"]);
    }
}
