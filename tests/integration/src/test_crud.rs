//! Document CRUD and table lifecycle scenarios.

#[cfg(test)]
mod tests {
    use docstore_core::{ConnectorError, Document, Value};
    use docstore_dynamo_core::{ConnectorConfig, DynamoConnector, MemoryDynamo, store_error};
    use docstore_dynamo_model::StoreErrorCode;

    use crate::task_connector;

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_should_treat_repeated_init_as_success() {
        let connector = task_connector().await;
        connector.init().await.unwrap();
        connector.ready().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_report_not_ready_before_init() {
        let connector =
            DynamoConnector::new(MemoryDynamo::new(), ConnectorConfig::new("dev", "task"));
        let err = connector.ready().await.unwrap_err();
        assert!(matches!(err, ConnectorError::ConnectionNotReady(_)));
        assert_eq!(err.to_string(), "connection not ready: dynamo://dev/task");
    }

    #[tokio::test]
    async fn test_should_treat_freeing_an_absent_table_as_success() {
        let connector = task_connector().await;
        connector.free().await.unwrap();
        connector.free().await.unwrap();
        assert!(connector.ready().await.is_err());
    }

    #[tokio::test]
    async fn test_should_pass_store_errors_through_downcastable() {
        let connector = task_connector().await;
        connector.free().await.unwrap();

        let err = connector.get("task-1").await.unwrap_err();
        let store = store_error(&err).expect("a pass-through store error");
        assert_eq!(store.code, StoreErrorCode::ResourceNotFoundException);
    }

    // -----------------------------------------------------------------------
    // Put / Get / Update / Delete
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_should_return_put_document_unchanged() {
        let connector = task_connector().await;
        let doc = Document::new(
            "task-1",
            [
                ("title", Value::string("write the report")),
                ("done", Value::Bool(false)),
                ("priority", Value::number(2.0)),
                (
                    "meta",
                    Value::map([("assignee", Value::string("alice"))]),
                ),
            ],
        );
        connector.put(&doc).await.unwrap();
        let got = connector.get("task-1").await.unwrap();
        assert_eq!(got, doc);
    }

    #[tokio::test]
    async fn test_should_update_named_attributes_and_keep_the_rest() {
        let connector = task_connector().await;
        connector
            .put(&Document::new(
                "task-1",
                [
                    ("title", Value::string("write the report")),
                    ("done", Value::Bool(false)),
                ],
            ))
            .await
            .unwrap();

        connector
            .update(&Document::new("task-1", [("done", Value::Bool(true))]))
            .await
            .unwrap();

        let got = connector.get("task-1").await.unwrap();
        assert_eq!(got.get("done"), Some(&Value::Bool(true)));
        assert_eq!(got.get("title"), Some(&Value::string("write the report")));
    }

    #[tokio::test]
    async fn test_should_reject_update_with_empty_patch() {
        let connector = task_connector().await;
        let err = connector
            .update(&Document::new("task-1", Vec::<(&str, Value)>::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::MalformedQuery(_)));
    }

    #[tokio::test]
    async fn test_should_report_resource_address_after_delete() {
        let connector = task_connector().await;
        connector
            .put(&Document::new("task-1", [("title", Value::string("x"))]))
            .await
            .unwrap();
        connector.delete("task-1").await.unwrap();

        let err = connector.get("task-1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "resource not found: dynamo://dev/task/task-1"
        );

        // Deleting again still acks.
        connector.delete("task-1").await.unwrap();
    }
}
