//! Product catalog
//!
//! Wire rows from the product API, their normalization into [`CatalogItem`],
//! the per-category cache with stale-response protection, and the sources
//! that actually produce rows.
//!
//! # Module Structure
//! - `loader` - Query keys, fetch tickets and the per-category cache
//! - `source` - The `ProductSource` trait plus HTTP and JSON-file sources

mod loader;
mod source;

pub use loader::{CatalogLoader, CatalogQuery, CatalogState, FetchTicket};
pub use source::{HttpProductSource, JsonFileSource, ProductSource};

use crate::money::Lkr;
use crate::types::{MemoryType, PartCategory, StockStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A product row exactly as the store's JSON API returns it.
///
/// Postgres `numeric` columns arrive as strings, so the numeric fields are
/// kept as raw JSON values and coerced during normalization.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProductRow {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price_lkr: Option<Value>,
    #[serde(default)]
    pub stock_qty: Option<Value>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub socket: Option<String>,
    #[serde(default)]
    pub ram_type: Option<String>,
    #[serde(default)]
    pub wattage: Option<Value>,
}

/// A normalized, immutable catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub category: PartCategory,
    pub brand: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Unit price
    pub price: Lkr,
    pub stock: StockStatus,
    /// CPU and motherboard socket
    #[serde(default)]
    pub socket: Option<String>,
    /// RAM generation as reported by the store (e.g. "DDR5")
    #[serde(default)]
    pub memory_type: Option<String>,
    /// PSU rated output in watts
    #[serde(default)]
    pub wattage: Option<u32>,
}

impl CatalogItem {
    /// Parsed memory generation, if the store reported a known one
    pub fn memory_generation(&self) -> Option<MemoryType> {
        self.memory_type.as_deref()?.parse().ok()
    }

    /// Whether this item can be added to a build
    pub fn is_selectable(&self) -> bool {
        self.stock.is_selectable()
    }

    /// Case-insensitive substring match against the item name
    pub fn name_matches(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Coerce the API's price field into an amount.
///
/// Accepts JSON numbers and numeric strings; anything else is zero.
pub fn coerce_price(value: Option<&Value>) -> Lkr {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(Lkr::from_decimal).unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(Lkr::from_decimal).unwrap_or_default(),
        _ => Lkr::ZERO,
    }
}

/// Read a JSON number or numeric string as a float
fn numeric(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Coerce the API's stock count. Unreadable counts are zero (out of stock).
pub fn coerce_quantity(value: Option<&Value>) -> i64 {
    numeric(value)
        .filter(|q| q.is_finite())
        .map(|q| q.trunc() as i64)
        .unwrap_or(0)
}

/// Coerce a PSU rating in watts. Negative or unreadable ratings are dropped.
pub fn coerce_wattage(value: Option<&Value>) -> Option<u32> {
    numeric(value)
        .filter(|w| w.is_finite() && *w >= 0.0 && *w <= u32::MAX as f64)
        .map(|w| w.round() as u32)
}

/// Make an image path absolute against the API base URL.
///
/// Absolute http(s) URLs pass through; empty paths become `None`.
pub fn absolutize_image(api_base: &str, image_url: Option<&str>) -> Option<String> {
    let img = image_url.map(str::trim).filter(|s| !s.is_empty())?;
    if img.starts_with("http://") || img.starts_with("https://") {
        return Some(img.to_string());
    }
    Some(format!(
        "{}/{}",
        api_base.trim_end_matches('/'),
        img.trim_start_matches('/')
    ))
}

/// Normalize one wire row into a catalog item for `category`
pub fn normalize(row: &ProductRow, category: PartCategory, api_base: &str) -> CatalogItem {
    let id = match &row.id {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    CatalogItem {
        id,
        category,
        brand: row.brand.clone().unwrap_or_default(),
        name: row.name.clone().unwrap_or_default(),
        image: absolutize_image(api_base, row.image_url.as_deref()),
        price: coerce_price(row.price_lkr.as_ref()),
        stock: StockStatus::from_quantity(coerce_quantity(row.stock_qty.as_ref())),
        socket: row.socket.clone().filter(|s| !s.is_empty()),
        memory_type: row.ram_type.clone().filter(|s| !s.is_empty()),
        wattage: coerce_wattage(row.wattage.as_ref()),
    }
}

/// Decode an API response body into rows.
///
/// A JSON value that is not an array yields no rows; malformed JSON is an
/// error. Array elements that are not product objects are skipped one by one.
pub fn parse_rows(body: &str) -> Result<Vec<ProductRow>, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(elements) = value else {
        return Ok(Vec::new());
    };

    let rows = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match serde_json::from_value(element) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable product row");
                None
            }
        })
        .collect();
    Ok(rows)
}
