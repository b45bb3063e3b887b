//! GigaHz PC Builder Library
//!
//! Catalog loading, the builder state machine, pricing and the checkout
//! handoff for the GigaHz parts store, plus the terminal front end.

pub mod advisor;
pub mod app;
pub mod builder;
pub mod catalog;
pub mod checkout;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod money;
pub mod pricing;
pub mod theme;
pub mod types;
pub mod ui;

// Re-export main types for convenience
pub use builder::{BuilderSession, QuantityMap, SelectOutcome, SelectRejection, Selection};
pub use catalog::{
    CatalogItem, CatalogLoader, CatalogQuery, FetchTicket, HttpProductSource, JsonFileSource,
    ProductRow, ProductSource,
};
pub use checkout::{
    Checkout, CheckoutNotice, CheckoutPayload, FileSessionStore, MemorySessionStore,
    SessionStore, prepare_checkout,
};
pub use config::AppConfig;
pub use error::{CatalogError, GigahzError, Result, StoreError};
pub use money::Lkr;
pub use pricing::{CartLine, DiscountTier, PriceSummary};
pub use types::{CpuBrand, MemoryType, PartCategory, StockFilter, StockStatus};
