//! Index query scenarios: paging, direction, and validation.

#[cfg(test)]
mod tests {
    use docstore_core::{ConnectorError, Document, Filter, FilterCondition, Sort, Value};
    use docstore_dynamo_core::{DynamoConnector, MemoryDynamo, QueryRequest};

    use crate::task_connector;

    async fn seeded() -> DynamoConnector<MemoryDynamo> {
        let connector = task_connector().await;
        for (id, owner, created) in [
            ("t1", "alice", 100.0),
            ("t2", "alice", 90.0),
            ("t3", "bob", 95.0),
            ("t4", "alice", 110.0),
            ("t5", "alice", 105.0),
        ] {
            connector
                .put(&Document::new(
                    id,
                    [
                        ("owner", Value::string(owner)),
                        ("created", Value::number(created)),
                    ],
                ))
                .await
                .unwrap();
        }
        connector
    }

    fn alice_since(created: f64) -> Filter {
        Filter::and([
            FilterCondition::eq("owner", "alice"),
            FilterCondition::gte("created", created),
        ])
    }

    fn ids(documents: &[Document]) -> Vec<&str> {
        documents.iter().map(|d| d.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_should_return_matches_in_ascending_sort_order() {
        let connector = seeded().await;
        let result = connector
            .query(&QueryRequest {
                filter: alice_since(0.0),
                sort: Sort::asc("created"),
                limit: None,
                cursor: None,
            })
            .await
            .unwrap();
        assert_eq!(ids(&result.documents), vec!["t2", "t1", "t5", "t4"]);
        assert_eq!(result.count, 4);
        assert!(result.cursor.is_none());
    }

    #[tokio::test]
    async fn test_should_page_forward_through_cursor() {
        let connector = seeded().await;
        let first = connector
            .query(&QueryRequest {
                filter: alice_since(0.0),
                sort: Sort::asc("created"),
                limit: Some(2),
                cursor: None,
            })
            .await
            .unwrap();
        assert_eq!(ids(&first.documents), vec!["t2", "t1"]);
        let cursor = first.cursor.expect("a continuation cursor");

        let second = connector
            .query(&QueryRequest {
                filter: alice_since(0.0),
                sort: Sort::asc("created"),
                limit: Some(10),
                cursor: Some(cursor),
            })
            .await
            .unwrap();
        assert_eq!(ids(&second.documents), vec!["t5", "t4"]);
        assert!(second.cursor.is_none());
    }

    #[tokio::test]
    async fn test_should_render_cursor_identically_in_both_directions() {
        let connector = seeded().await;
        // Ascending, the second page starts after t1; descending over the
        // reversed order {t4, t5, t1, t2} a limit of 3 also breaks at t1.
        let asc = connector
            .query(&QueryRequest {
                filter: alice_since(0.0),
                sort: Sort::asc("created"),
                limit: Some(2),
                cursor: None,
            })
            .await
            .unwrap();
        let desc = connector
            .query(&QueryRequest {
                filter: alice_since(0.0),
                sort: Sort::desc("created"),
                limit: Some(3),
                cursor: None,
            })
            .await
            .unwrap();

        let asc_cursor = asc.cursor.unwrap();
        let desc_cursor = desc.cursor.unwrap();
        assert_eq!(asc_cursor, desc_cursor);

        // The cursor is the page-break document's key attributes as plain
        // JSON with sorted keys.
        assert_eq!(
            asc_cursor,
            r#"{"_id":"t1","created":100,"owner":"alice"}"#
        );
        let parsed: serde_json::Value = serde_json::from_str(&asc_cursor).unwrap();
        assert_eq!(parsed["created"], serde_json::json!(100));
    }

    #[tokio::test]
    async fn test_should_filter_on_range_lower_bound() {
        let connector = seeded().await;
        let result = connector
            .query(&QueryRequest {
                filter: alice_since(101.0),
                sort: Sort::desc("created"),
                limit: None,
                cursor: None,
            })
            .await
            .unwrap();
        assert_eq!(ids(&result.documents), vec!["t4", "t5"]);
    }

    #[tokio::test]
    async fn test_should_reject_filter_without_matching_index() {
        let connector = seeded().await;
        let err = connector
            .query(&QueryRequest {
                filter: Filter::and([
                    FilterCondition::eq("c", "x"),
                    FilterCondition::gte("d", 0.0),
                ]),
                sort: Sort::asc("d"),
                limit: None,
                cursor: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "index not found: c-d-index or d-c-index");
    }

    #[tokio::test]
    async fn test_should_reject_sort_on_unfiltered_field() {
        let connector = seeded().await;
        let err = connector
            .query(&QueryRequest {
                filter: Filter::and([FilterCondition::eq("owner", "alice")]),
                sort: Sort::asc("created"),
                limit: None,
                cursor: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::MalformedQuery(_)));
        assert_eq!(
            err.to_string(),
            "malformed query: filter must include sort keys"
        );
    }

    #[tokio::test]
    async fn test_should_resume_from_a_hand_written_cursor() {
        let connector = seeded().await;
        // Cursors are plain JSON of key attributes, so a caller can persist
        // and replay them across processes.
        let result = connector
            .query(&QueryRequest {
                filter: alice_since(0.0),
                sort: Sort::asc("created"),
                limit: None,
                cursor: Some(r#"{"_id":"t1","created":100,"owner":"alice"}"#.to_string()),
            })
            .await
            .unwrap();
        assert_eq!(ids(&result.documents), vec!["t5", "t4"]);
    }
}
