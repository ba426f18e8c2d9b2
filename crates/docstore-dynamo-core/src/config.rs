//! Connector configuration: table addressing, capacity, and index layout.

use docstore_core::encode_public;
use docstore_dynamo_model::types::ScalarAttributeType;
use serde::Deserialize;

/// Default provisioned read capacity units.
pub const DEFAULT_READ_CAPACITY: i64 = 5;
/// Default provisioned write capacity units.
pub const DEFAULT_WRITE_CAPACITY: i64 = 5;

/// Capacity mode for the connector's table and its indexes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityMode {
    /// Pay-per-request billing; no throughput settings are sent.
    #[default]
    OnDemand,
    /// Provisioned billing with explicit read/write capacity units.
    Provisioned {
        /// Read capacity units for the table and each index.
        #[serde(default = "default_rcu")]
        read_capacity_units: i64,
        /// Write capacity units for the table and each index.
        #[serde(default = "default_wcu")]
        write_capacity_units: i64,
    },
}

fn default_rcu() -> i64 {
    DEFAULT_READ_CAPACITY
}

fn default_wcu() -> i64 {
    DEFAULT_WRITE_CAPACITY
}

/// One key field of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexKeyField {
    /// Attribute name.
    pub field: String,
    /// Declared scalar type of the attribute (`S`, `N`, or `B`).
    #[serde(default = "default_field_type", rename = "type")]
    pub field_type: ScalarAttributeType,
}

fn default_field_type() -> ScalarAttributeType {
    ScalarAttributeType::S
}

impl IndexKeyField {
    /// A string-typed key field.
    #[must_use]
    pub fn string(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            field_type: ScalarAttributeType::S,
        }
    }

    /// A number-typed key field.
    #[must_use]
    pub fn number(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            field_type: ScalarAttributeType::N,
        }
    }
}

/// A secondary index over exactly two fields, hash key first.
///
/// The two-field arity is part of the type: query planning pairs an equality
/// condition on the hash field with a range condition on the sort field, and
/// the composite index name is derived from the pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexDefinition {
    /// Hash key field followed by range key field.
    pub key: [IndexKeyField; 2],
}

impl IndexDefinition {
    /// Defines an index from its hash and range key fields.
    #[must_use]
    pub fn new(hash: IndexKeyField, range: IndexKeyField) -> Self {
        Self { key: [hash, range] }
    }

    /// The composite index name, `{hash}-{range}-index`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}-{}-index", self.key[0].field, self.key[1].field)
    }

    /// The hash (partition) key field.
    #[must_use]
    pub fn hash_field(&self) -> &IndexKeyField {
        &self.key[0]
    }

    /// The range (sort) key field.
    #[must_use]
    pub fn range_field(&self) -> &IndexKeyField {
        &self.key[1]
    }
}

/// Immutable connector configuration, captured at construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectorConfig {
    /// Deployment environment, the first table-name segment.
    pub env: String,
    /// Collection prefix, the second table-name segment.
    pub prefix: String,
    /// Capacity mode applied to the table and every index.
    #[serde(default)]
    pub capacity: CapacityMode,
    /// Secondary indexes available to the query planner.
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

impl ConnectorConfig {
    /// Configuration with on-demand capacity and no indexes.
    #[must_use]
    pub fn new(env: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            prefix: prefix.into(),
            capacity: CapacityMode::default(),
            indexes: Vec::new(),
        }
    }

    /// Adds a secondary index.
    #[must_use]
    pub fn with_index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    /// Sets the capacity mode.
    #[must_use]
    pub fn with_capacity(mut self, capacity: CapacityMode) -> Self {
        self.capacity = capacity;
        self
    }

    /// The physical table name, `{env}.{prefix}`.
    #[must_use]
    pub fn table_name(&self) -> String {
        format!("{}.{}", self.env, self.prefix)
    }

    /// The public connector address, `dynamo://{env}/{prefix}`.
    #[must_use]
    pub fn uri(&self) -> String {
        encode_public("dynamo", &[&self.env, &self.prefix])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_derive_table_name_and_uri() {
        let config = ConnectorConfig::new("dev", "task");
        assert_eq!(config.table_name(), "dev.task");
        assert_eq!(config.uri(), "dynamo://dev/task");
    }

    #[test]
    fn test_should_percent_encode_uri_segments() {
        let config = ConnectorConfig::new("dev env", "task");
        assert_eq!(config.uri(), "dynamo://dev%20env/task");
    }

    #[test]
    fn test_should_name_index_from_key_fields() {
        let index =
            IndexDefinition::new(IndexKeyField::string("owner"), IndexKeyField::number("created"));
        assert_eq!(index.name(), "owner-created-index");
        assert_eq!(index.hash_field().field, "owner");
        assert_eq!(index.range_field().field, "created");
    }

    #[test]
    fn test_should_deserialize_config_with_defaults() {
        let config: ConnectorConfig = serde_json::from_value(serde_json::json!({
            "env": "dev",
            "prefix": "task",
        }))
        .unwrap();
        assert_eq!(config.capacity, CapacityMode::OnDemand);
        assert!(config.indexes.is_empty());
    }

    #[test]
    fn test_should_deserialize_provisioned_capacity_with_default_units() {
        let config: ConnectorConfig = serde_json::from_value(serde_json::json!({
            "env": "dev",
            "prefix": "task",
            "capacity": { "provisioned": {} },
            "indexes": [{ "key": [{ "field": "owner" }, { "field": "created", "type": "N" }] }],
        }))
        .unwrap();
        assert_eq!(
            config.capacity,
            CapacityMode::Provisioned {
                read_capacity_units: DEFAULT_READ_CAPACITY,
                write_capacity_units: DEFAULT_WRITE_CAPACITY,
            }
        );
        assert_eq!(config.indexes[0].name(), "owner-created-index");
    }
}
