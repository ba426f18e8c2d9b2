//! Wire model for the DynamoDB-style store behind the docstore connector.
//!
//! These are the store's own request/response shapes, hand-written since the
//! JSON protocol makes serde derives trivial. The vendor-neutral document
//! model lives in `docstore-core`; this crate only knows about tagged
//! attribute values and PascalCase operation payloads.
#![allow(clippy::struct_excessive_bools)]

pub mod attribute_value;
pub mod error;
pub mod input;
pub mod output;
pub mod types;

pub use attribute_value::AttributeValue;
pub use error::{StoreError, StoreErrorCode};
