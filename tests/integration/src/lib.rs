//! End-to-end tests for the docstore connector.
//!
//! Every scenario drives a `DynamoConnector` over the in-memory store, so
//! the full path is exercised: AST validation, index selection, expression
//! generation, the wire round-trip, and response decoding.

use std::sync::Once;

use docstore_dynamo_core::{
    ConnectorConfig, DynamoConnector, IndexDefinition, IndexKeyField, MemoryDynamo,
};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A connector over a fresh in-memory store, table already created, with an
/// `owner-created-index` for the query scenarios.
pub async fn task_connector() -> DynamoConnector<MemoryDynamo> {
    init_tracing();
    let config = ConnectorConfig::new("dev", "task").with_index(IndexDefinition::new(
        IndexKeyField::string("owner"),
        IndexKeyField::number("created"),
    ));
    let connector = DynamoConnector::new(MemoryDynamo::new(), config);
    connector.init().await.expect("table creation");
    connector
}

mod test_crud;
mod test_query;
