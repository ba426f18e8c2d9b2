//! Vendor-neutral document model and query AST shared by docstore connectors.
//!
//! This crate provides the store-independent side of a connector: the
//! [`Value`] document model, the [`Document`] resource shape, the filter/sort
//! AST produced by the query DSL, the [`ConnectorError`] taxonomy, and public
//! connector-address encoding. Store-specific wire formats live in the
//! per-connector model crates.

mod document;
mod error;
mod query;
mod uri;
mod value;

pub use document::Document;
pub use error::{ConnectorError, ConnectorResult};
pub use query::{Filter, FilterCondition, FilterOperator, Sort, SortCondition, SortOrder};
pub use uri::encode_public;
pub use value::Value;
