//! Shared fixtures for integration tests

#![allow(dead_code)]

use gigahz::catalog::{CatalogItem, CatalogQuery, ProductRow, ProductSource};
use gigahz::error::CatalogError;
use gigahz::money::Lkr;
use gigahz::types::{PartCategory, StockStatus};
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

pub const API_BASE: &str = "http://localhost:3000";

/// A small store: two AMD sockets, one Intel socket and one part of every
/// other category
pub const CATALOG_JSON: &str = r#"{
    "cpu": [
        { "id": 1, "brand": "AMD", "name": "Ryzen 5 7600", "price_lkr": 70000, "stock_qty": 5, "socket": "AM5", "image_url": "/img/7600.png" },
        { "id": 2, "brand": "AMD", "name": "Ryzen 5 5600", "price_lkr": "42000", "stock_qty": 3, "socket": "AM4" },
        { "id": 3, "brand": "Intel", "name": "Core i5-13400F", "price_lkr": 65000, "stock_qty": 2, "socket": "LGA1700" },
        { "id": 4, "brand": "AMD", "name": "Ryzen 9 7950X", "price_lkr": 210000, "stock_qty": 0, "socket": "AM5" },
        { "id": 5, "brand": "AMD", "name": "Ryzen 7 5800X (retired)", "price_lkr": 80000, "stock_qty": 1, "socket": "AM4", "is_active": false }
    ],
    "motherboard": [
        { "id": 10, "brand": "MSI", "name": "B650 Tomahawk", "price_lkr": 80000, "stock_qty": 4, "socket": "AM5" },
        { "id": 11, "brand": "ASUS", "name": "B550 Prime", "price_lkr": 45000, "stock_qty": 4, "socket": "AM4" },
        { "id": 12, "brand": "Gigabyte", "name": "B760 Gaming X", "price_lkr": 55000, "stock_qty": 4, "socket": "LGA1700" }
    ],
    "ram": [
        { "id": 20, "brand": "Corsair", "name": "Vengeance 32GB DDR5", "price_lkr": 40000, "stock_qty": 6, "ram_type": "DDR5" },
        { "id": 21, "brand": "Kingston", "name": "Fury 16GB DDR4", "price_lkr": 18000, "stock_qty": 6, "ram_type": "DDR4" }
    ],
    "storage": [
        { "id": 30, "brand": "Samsung", "name": "990 Pro 1TB", "price_lkr": 35000, "stock_qty": 9 }
    ],
    "case": [
        { "id": 40, "brand": "NZXT", "name": "H5 Flow", "price_lkr": 30000, "stock_qty": 2 }
    ],
    "cooling": [
        { "id": 50, "brand": "DeepCool", "name": "AK400", "price_lkr": 12000, "stock_qty": 8 }
    ],
    "psu": [
        { "id": 60, "brand": "Corsair", "name": "RM750e", "price_lkr": 33000, "stock_qty": 3, "wattage": 750 }
    ],
    "gpu": [
        { "id": 70, "brand": "NVIDIA", "name": "RTX 4060", "price_lkr": "125000.50", "stock_qty": 1 }
    ]
}"#;

/// Write [`CATALOG_JSON`] to a temp file that lives as long as the handle
pub fn catalog_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(CATALOG_JSON.as_bytes()).expect("write catalog");
    file
}

pub fn item(category: PartCategory, id: &str, rupees: u64) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        category,
        brand: "Generic".to_string(),
        name: format!("{} {id}", category.label()),
        image: None,
        price: Lkr::from_rupees(rupees),
        stock: StockStatus::InStock,
        socket: None,
        memory_type: None,
        wattage: None,
    }
}

pub fn cpu(id: &str, brand: &str, socket: &str) -> CatalogItem {
    CatalogItem {
        brand: brand.to_string(),
        socket: Some(socket.to_string()),
        ..item(PartCategory::Cpu, id, 60_000)
    }
}

/// Source answering from a fixed list and recording every query it sees
#[derive(Default)]
pub struct RecordingSource {
    pub rows: Vec<ProductRow>,
    pub fail_with: Option<u16>,
    pub seen: Mutex<Vec<CatalogQuery>>,
}

impl RecordingSource {
    pub fn with_rows(json: serde_json::Value) -> Self {
        Self {
            rows: serde_json::from_value(json).expect("rows"),
            ..Default::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Default::default()
        }
    }

    pub fn queries(&self) -> Vec<CatalogQuery> {
        self.seen.lock().expect("lock").clone()
    }
}

impl ProductSource for RecordingSource {
    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<ProductRow>, CatalogError> {
        self.seen.lock().expect("lock").push(query.clone());
        match self.fail_with {
            Some(status) => Err(CatalogError::Status { status }),
            None => Ok(self.rows.clone()),
        }
    }
}
