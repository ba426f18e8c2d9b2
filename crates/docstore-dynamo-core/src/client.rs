//! The async client trait the connector drives.

use async_trait::async_trait;
use docstore_dynamo_model::StoreError;
use docstore_dynamo_model::input::{
    CreateTableInput, DeleteItemInput, DeleteTableInput, DescribeTableInput, GetItemInput,
    PutItemInput, QueryInput, UpdateItemInput,
};
use docstore_dynamo_model::output::{
    CreateTableOutput, DeleteItemOutput, DeleteTableOutput, DescribeTableOutput, GetItemOutput,
    PutItemOutput, QueryOutput, UpdateItemOutput,
};

/// The eight store calls the connector needs.
///
/// Implementations own transport, credentials, retries, and timeouts; the
/// connector issues one call per operation and propagates [`StoreError`]s
/// unmodified. The workspace ships [`crate::MemoryDynamo`] for tests and
/// local development.
#[async_trait]
pub trait DynamoApi: Send + Sync {
    /// Creates the backing table.
    async fn create_table(&self, input: CreateTableInput) -> Result<CreateTableOutput, StoreError>;

    /// Deletes the backing table.
    async fn delete_table(&self, input: DeleteTableInput) -> Result<DeleteTableOutput, StoreError>;

    /// Describes the backing table.
    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, StoreError>;

    /// Reads a single item by primary key.
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, StoreError>;

    /// Writes a full item, replacing any existing one.
    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput, StoreError>;

    /// Applies an update expression to a single item.
    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput, StoreError>;

    /// Deletes a single item by primary key.
    async fn delete_item(&self, input: DeleteItemInput) -> Result<DeleteItemOutput, StoreError>;

    /// Runs an index query.
    async fn query(&self, input: QueryInput) -> Result<QueryOutput, StoreError>;
}
