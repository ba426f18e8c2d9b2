//! The document resource shape exchanged with a connector.

use std::collections::BTreeMap;

use crate::value::Value;

/// A document: a primary id plus an attribute map.
///
/// The id is carried separately and is never duplicated inside `attributes`;
/// connectors merge it into their own reserved key attribute on write and
/// split it back out on read.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Primary identifier.
    pub id: String,
    /// Named attribute values, id excluded.
    pub attributes: BTreeMap<String, Value>,
}

impl Document {
    /// Create a document from an id and attribute pairs.
    pub fn new<K: Into<String>>(
        id: impl Into<String>,
        attributes: impl IntoIterator<Item = (K, Value)>,
    ) -> Self {
        Self {
            id: id.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        }
    }

    /// Returns an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}
