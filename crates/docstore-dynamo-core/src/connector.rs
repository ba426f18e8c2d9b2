//! The connector facade: document CRUD, query, and table lifecycle.

use std::collections::HashMap;

use docstore_core::{ConnectorError, ConnectorResult, Document};
use docstore_dynamo_model::input::{
    CreateTableInput, DeleteItemInput, DeleteTableInput, DescribeTableInput, GetItemInput,
    PutItemInput, UpdateItemInput,
};
use docstore_dynamo_model::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, Projection,
    ProjectionType, ProvisionedThroughput, ReturnValue,
};
use docstore_dynamo_model::{AttributeValue, StoreError, StoreErrorCode};
use tracing::debug;

use crate::client::DynamoApi;
use crate::codec::{self, ID_FIELD};
use crate::config::{CapacityMode, ConnectorConfig};
use crate::query::{QueryPlanner, QueryRequest, QueryResult};
use crate::update;

/// A document-store connector over one table of a DynamoDB-style store.
///
/// The connector is stateless beyond its immutable configuration; every call
/// computes its request fresh and issues exactly one store call, so a single
/// connector is safe to share across tasks.
#[derive(Debug, Clone)]
pub struct DynamoConnector<C> {
    client: C,
    config: ConnectorConfig,
}

impl<C: DynamoApi> DynamoConnector<C> {
    /// Creates a connector over a client and configuration.
    pub fn new(client: C, config: ConnectorConfig) -> Self {
        Self { client, config }
    }

    /// The public connector address, `dynamo://{env}/{prefix}`.
    #[must_use]
    pub fn uri(&self) -> String {
        self.config.uri()
    }

    /// The connector configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    // ---- lifecycle ----

    /// Creates the backing table with its key schema and secondary indexes.
    ///
    /// An already-existing table counts as success.
    pub async fn init(&self) -> ConnectorResult<()> {
        let input = self.create_table_input();
        debug!(table = %input.table_name, "creating table");
        match self.client.create_table(input).await {
            Ok(_) => Ok(()),
            Err(err) if err.code == StoreErrorCode::ResourceInUseException => Ok(()),
            Err(err) => Err(ConnectorError::store(err)),
        }
    }

    /// Deletes the backing table.
    ///
    /// An already-absent table counts as success.
    pub async fn free(&self) -> ConnectorResult<()> {
        let table_name = self.config.table_name();
        debug!(table = %table_name, "deleting table");
        match self.client.delete_table(DeleteTableInput { table_name }).await {
            Ok(_) => Ok(()),
            Err(err) if err.code == StoreErrorCode::ResourceNotFoundException => Ok(()),
            Err(err) => Err(ConnectorError::store(err)),
        }
    }

    /// Probes whether the backing table exists.
    pub async fn ready(&self) -> ConnectorResult<()> {
        let table_name = self.config.table_name();
        match self.client.describe_table(DescribeTableInput { table_name }).await {
            Ok(_) => Ok(()),
            Err(err) if err.code == StoreErrorCode::ResourceNotFoundException => {
                Err(ConnectorError::ConnectionNotReady(self.uri()))
            }
            Err(err) => Err(ConnectorError::store(err)),
        }
    }

    // ---- document operations ----

    /// Fetches a document by id.
    pub async fn get(&self, id: &str) -> ConnectorResult<Document> {
        debug!(table = %self.config.table_name(), id, "get");
        let output = self
            .client
            .get_item(GetItemInput {
                table_name: self.config.table_name(),
                key: key_for(id),
                consistent_read: None,
            })
            .await
            .map_err(ConnectorError::store)?;
        match output.item {
            Some(item) => codec::decode_item(&item),
            None => Err(ConnectorError::ResourceNotFound(format!(
                "{}/{id}",
                self.uri()
            ))),
        }
    }

    /// Writes a full document, replacing any existing one with the same id.
    pub async fn put(&self, document: &Document) -> ConnectorResult<()> {
        debug!(table = %self.config.table_name(), id = %document.id, "put");
        self.client
            .put_item(PutItemInput {
                table_name: self.config.table_name(),
                item: codec::encode_document(document),
                return_values: None,
            })
            .await
            .map_err(ConnectorError::store)?;
        Ok(())
    }

    /// Applies the document's attributes as a partial update.
    ///
    /// Attributes not named in the document keep their stored values. The
    /// write is fire-and-forget: nothing is read back.
    pub async fn update(&self, document: &Document) -> ConnectorResult<()> {
        if document.attributes.is_empty() {
            return Err(ConnectorError::MalformedQuery(
                "update requires at least one attribute".to_string(),
            ));
        }
        debug!(table = %self.config.table_name(), id = %document.id, "update");
        let expr = update::build(&document.attributes);
        self.client
            .update_item(UpdateItemInput {
                table_name: self.config.table_name(),
                key: key_for(&document.id),
                update_expression: Some(expr.expression),
                expression_attribute_names: expr.names,
                expression_attribute_values: expr.values,
                return_values: Some(ReturnValue::None),
            })
            .await
            .map_err(ConnectorError::store)?;
        Ok(())
    }

    /// Deletes a document by id; deleting an absent id is a success.
    pub async fn delete(&self, id: &str) -> ConnectorResult<()> {
        debug!(table = %self.config.table_name(), id, "delete");
        self.client
            .delete_item(DeleteItemInput {
                table_name: self.config.table_name(),
                key: key_for(id),
                return_values: None,
            })
            .await
            .map_err(ConnectorError::store)?;
        Ok(())
    }

    /// Plans and runs an index query, returning one page of documents.
    pub async fn query(&self, request: &QueryRequest) -> ConnectorResult<QueryResult> {
        let planner = QueryPlanner::new(&self.config);
        let input = planner.plan(request)?;
        let output = self.client.query(input).await.map_err(ConnectorError::store)?;
        planner.decode(&output)
    }

    // ---- request assembly ----

    fn create_table_input(&self) -> CreateTableInput {
        let mut attribute_definitions = vec![AttributeDefinition::string(ID_FIELD)];
        for index in &self.config.indexes {
            for key_field in &index.key {
                if attribute_definitions
                    .iter()
                    .all(|d| d.attribute_name != key_field.field)
                {
                    attribute_definitions.push(AttributeDefinition {
                        attribute_name: key_field.field.clone(),
                        attribute_type: key_field.field_type.clone(),
                    });
                }
            }
        }

        let (billing_mode, provisioned_throughput) = match self.config.capacity {
            CapacityMode::OnDemand => (BillingMode::PayPerRequest, None),
            CapacityMode::Provisioned {
                read_capacity_units,
                write_capacity_units,
            } => (
                BillingMode::Provisioned,
                Some(ProvisionedThroughput {
                    read_capacity_units,
                    write_capacity_units,
                }),
            ),
        };

        let global_secondary_indexes = self
            .config
            .indexes
            .iter()
            .map(|index| GlobalSecondaryIndex {
                index_name: index.name(),
                key_schema: vec![
                    KeySchemaElement::hash(&index.hash_field().field),
                    KeySchemaElement::range(&index.range_field().field),
                ],
                projection: Projection {
                    projection_type: Some(ProjectionType::All),
                    non_key_attributes: Vec::new(),
                },
                provisioned_throughput: provisioned_throughput.clone(),
            })
            .collect();

        CreateTableInput {
            table_name: self.config.table_name(),
            key_schema: vec![KeySchemaElement::hash(ID_FIELD)],
            attribute_definitions,
            billing_mode: Some(billing_mode),
            provisioned_throughput,
            global_secondary_indexes,
        }
    }
}

fn key_for(id: &str) -> HashMap<String, AttributeValue> {
    HashMap::from([(ID_FIELD.to_string(), AttributeValue::S(id.to_string()))])
}

/// Recovers the store error behind a pass-through [`ConnectorError::Store`],
/// if that is what the error is.
#[must_use]
pub fn store_error(err: &ConnectorError) -> Option<&StoreError> {
    match err {
        ConnectorError::Store(inner) => inner.downcast_ref(),
        _ => None,
    }
}
