//! DynamoDB-backed document-store connector.
//!
//! The connector exposes the vendor-neutral document interface of
//! `docstore-core` over one table of a DynamoDB-style store: full-document
//! CRUD keyed by a reserved `_id` partition key, expression-based partial
//! updates, and secondary-index queries compiled from the filter/sort AST.
//! The store itself is reached through the async [`DynamoApi`] trait; an
//! in-memory implementation, [`MemoryDynamo`], ships for tests and local
//! development.

pub mod client;
pub mod codec;
pub mod config;
pub mod connector;
pub mod expression;
pub mod mem;
pub mod placeholder;
pub mod query;
pub mod update;

pub use client::DynamoApi;
pub use codec::ID_FIELD;
pub use config::{CapacityMode, ConnectorConfig, IndexDefinition, IndexKeyField};
pub use connector::{DynamoConnector, store_error};
pub use mem::MemoryDynamo;
pub use query::{QueryRequest, QueryResult};
