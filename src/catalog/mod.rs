//! Airtable-backed asset catalog.
//!
//! The catalog is optional: without credentials the tools answer with a
//! structured "not configured" payload and generation skips notification.

pub mod client;
pub mod error;
pub mod types;

pub use client::{API_URL, AirtableClient, CONTENT_URL};
pub use error::CatalogError;
pub use types::{CatalogRecord, ListQuery, NewAsset};
