//! Product sources
//!
//! The product API is an external collaborator; the builder only sees the
//! [`ProductSource`] trait. `HttpProductSource` talks to the live store,
//! `JsonFileSource` serves the same rows from a local file.

use super::{CatalogQuery, ProductRow, parse_rows};
use crate::error::CatalogError;
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Something that can answer a catalog query with raw product rows.
///
/// Implementations are called from worker threads, hence `Send + Sync`.
pub trait ProductSource: Send + Sync {
    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<ProductRow>, CatalogError>;
}

/// Product source backed by the store's REST API
#[derive(Debug, Clone)]
pub struct HttpProductSource {
    client: Client,
    api_base: String,
}

impl HttpProductSource {
    /// Build a client for `api_base` with the given request timeout
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    /// Query string parameters for a catalog query
    pub fn query_params(query: &CatalogQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![("category", query.category.api_slug().to_string())];
        if query.active_only {
            params.push(("active", "true".to_string()));
        }
        if let Some(ref socket) = query.socket {
            params.push(("socket", socket.clone()));
        }
        if let Some(mem) = query.memory_type {
            params.push(("ramType", mem.to_string()));
        }
        params
    }

    fn products_url(&self) -> String {
        format!("{}/api/products", self.api_base.trim_end_matches('/'))
    }
}

impl ProductSource for HttpProductSource {
    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<ProductRow>, CatalogError> {
        let url = self.products_url();
        debug!(%url, category = %query.category, "GET products");

        let response = self
            .client
            .get(&url)
            .query(&Self::query_params(query))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        Ok(parse_rows(&body)?)
    }
}

/// Offline product source reading a JSON file.
///
/// The file is either an array of rows, each carrying a `category` slug, or
/// an object mapping category slugs to row arrays. Query constraints are
/// applied here the way the API applies them.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

#[derive(serde::Deserialize)]
struct TaggedRow {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
    #[serde(flatten)]
    row: ProductRow,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Flat(Vec<TaggedRow>),
    ByCategory(std::collections::BTreeMap<String, Vec<TaggedRow>>),
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn matches(query: &CatalogQuery, slug: Option<&str>, tagged: &TaggedRow) -> bool {
        let slug_ok = slug.is_some_and(|s| {
            s.eq_ignore_ascii_case(query.category.api_slug())
                || s.eq_ignore_ascii_case(&query.category.to_string())
        });
        let active_ok = !query.active_only || tagged.is_active.unwrap_or(true);
        let socket_ok = query
            .socket
            .as_ref()
            .is_none_or(|s| tagged.row.socket.as_deref() == Some(s.as_str()));
        let mem_ok = query.memory_type.is_none_or(|m| {
            tagged
                .row
                .ram_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(&m.to_string()))
        });
        slug_ok && active_ok && socket_ok && mem_ok
    }
}

impl ProductSource for JsonFileSource {
    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<ProductRow>, CatalogError> {
        let content = fs::read_to_string(&self.path).map_err(|source| CatalogError::File {
            path: self.path.clone(),
            source,
        })?;
        let file: CatalogFile = serde_json::from_str(&content)?;

        let rows = match file {
            CatalogFile::Flat(rows) => rows
                .into_iter()
                .filter(|t| Self::matches(query, t.category.as_deref(), t))
                .map(|t| t.row)
                .collect(),
            CatalogFile::ByCategory(map) => map
                .into_iter()
                .flat_map(|(slug, rows)| {
                    rows.into_iter()
                        .filter(|t| Self::matches(query, Some(&slug), t))
                        .map(|t| t.row)
                        .collect::<Vec<_>>()
                })
                .collect(),
        };
        debug!(path = ?self.path, category = %query.category, "offline catalog read");
        Ok(rows)
    }
}
