//! An in-memory store speaking the [`DynamoApi`] contract.
//!
//! Backs the integration tests and local development. The query path
//! interprets the same key-condition expressions the planner emits, against a
//! named secondary index, with the store's comparison rules: numbers compare
//! numerically, strings bytewise. Fidelity covers what the connector
//! exercises; it is not a general store emulator.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use docstore_dynamo_model::input::{
    CreateTableInput, DeleteItemInput, DeleteTableInput, DescribeTableInput, GetItemInput,
    PutItemInput, QueryInput, UpdateItemInput,
};
use docstore_dynamo_model::output::{
    CreateTableOutput, DeleteItemOutput, DeleteTableOutput, DescribeTableOutput, GetItemOutput,
    PutItemOutput, QueryOutput, UpdateItemOutput,
};
use docstore_dynamo_model::types::{
    GlobalSecondaryIndex, KeyType, TableDescription, TableStatus,
};
use docstore_dynamo_model::{AttributeValue, StoreError};
use tracing::debug;
use uuid::Uuid;

use crate::client::DynamoApi;
use crate::codec::ID_FIELD;
use crate::expression::{self, CompareOp, KeyCondition};

type Item = HashMap<String, AttributeValue>;

#[derive(Debug)]
struct MemTable {
    description: TableDescription,
    indexes: Vec<GlobalSecondaryIndex>,
    items: HashMap<String, Item>,
}

/// An in-memory [`DynamoApi`] implementation.
#[derive(Debug, Default)]
pub struct MemoryDynamo {
    tables: DashMap<String, MemTable>,
}

impl MemoryDynamo {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items currently held in a table, if the table exists.
    #[must_use]
    pub fn item_count(&self, table_name: &str) -> Option<usize> {
        self.tables.get(table_name).map(|t| t.items.len())
    }
}

#[async_trait]
impl DynamoApi for MemoryDynamo {
    async fn create_table(&self, input: CreateTableInput) -> Result<CreateTableOutput, StoreError> {
        if self.tables.contains_key(&input.table_name) {
            return Err(StoreError::resource_in_use(format!(
                "Table already exists: {}",
                input.table_name
            )));
        }
        debug!(table = %input.table_name, "mem: create table");
        let description = TableDescription {
            table_name: Some(input.table_name.clone()),
            table_status: Some(TableStatus::Active),
            key_schema: input.key_schema,
            attribute_definitions: input.attribute_definitions,
            creation_date_time: Some(epoch_seconds()),
            item_count: Some(0),
            table_id: Some(Uuid::new_v4().to_string()),
            global_secondary_indexes: input.global_secondary_indexes.clone(),
        };
        self.tables.insert(
            input.table_name,
            MemTable {
                description: description.clone(),
                indexes: input.global_secondary_indexes,
                items: HashMap::new(),
            },
        );
        Ok(CreateTableOutput {
            table_description: Some(description),
        })
    }

    async fn delete_table(&self, input: DeleteTableInput) -> Result<DeleteTableOutput, StoreError> {
        let (_, table) = self
            .tables
            .remove(&input.table_name)
            .ok_or_else(|| table_not_found(&input.table_name))?;
        debug!(table = %input.table_name, "mem: delete table");
        let mut description = table.description;
        description.table_status = Some(TableStatus::Deleting);
        Ok(DeleteTableOutput {
            table_description: Some(description),
        })
    }

    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, StoreError> {
        let table = self
            .tables
            .get(&input.table_name)
            .ok_or_else(|| table_not_found(&input.table_name))?;
        Ok(DescribeTableOutput {
            table: Some(table.description.clone()),
        })
    }

    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, StoreError> {
        let table = self
            .tables
            .get(&input.table_name)
            .ok_or_else(|| table_not_found(&input.table_name))?;
        let id = key_id(&input.key)?;
        Ok(GetItemOutput {
            item: table.items.get(id).cloned(),
        })
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput, StoreError> {
        let mut table = self
            .tables
            .get_mut(&input.table_name)
            .ok_or_else(|| table_not_found(&input.table_name))?;
        let id = key_id(&input.item)?.to_string();
        table.items.insert(id, input.item);
        Ok(PutItemOutput::default())
    }

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput, StoreError> {
        let mut table = self
            .tables
            .get_mut(&input.table_name)
            .ok_or_else(|| table_not_found(&input.table_name))?;
        let id = key_id(&input.key)?.to_string();
        let expression = input
            .update_expression
            .as_deref()
            .ok_or_else(|| StoreError::validation("UpdateExpression is required"))?;
        let assignments = expression::parse_set_expression(
            expression,
            &input.expression_attribute_names,
            &input.expression_attribute_values,
        )
        .map_err(|e| StoreError::validation(e.to_string()))?;

        // Upsert semantics: an absent item starts from its key attributes.
        let item = table.items.entry(id).or_insert_with(|| input.key.clone());
        for assignment in assignments {
            item.insert(assignment.field, assignment.value);
        }
        Ok(UpdateItemOutput::default())
    }

    async fn delete_item(&self, input: DeleteItemInput) -> Result<DeleteItemOutput, StoreError> {
        let mut table = self
            .tables
            .get_mut(&input.table_name)
            .ok_or_else(|| table_not_found(&input.table_name))?;
        let id = key_id(&input.key)?;
        table.items.remove(id);
        Ok(DeleteItemOutput::default())
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, StoreError> {
        let table = self
            .tables
            .get(&input.table_name)
            .ok_or_else(|| table_not_found(&input.table_name))?;

        let index_name = input
            .index_name
            .as_deref()
            .ok_or_else(|| StoreError::validation("Query requires an index name"))?;
        let index = table
            .indexes
            .iter()
            .find(|idx| idx.index_name == index_name)
            .ok_or_else(|| {
                StoreError::validation(format!(
                    "The table does not have the specified index: {index_name}"
                ))
            })?;
        let hash_attr = index_key(index, &KeyType::Hash)?;
        let range_attr = index_key(index, &KeyType::Range)?;

        let expression = input
            .key_condition_expression
            .as_deref()
            .ok_or_else(|| StoreError::validation("KeyConditionExpression is required"))?;
        let conditions = expression::parse_key_conditions(
            expression,
            &input.expression_attribute_names,
            &input.expression_attribute_values,
        )
        .map_err(|e| StoreError::validation(e.to_string()))?;

        let hash_value = conditions
            .iter()
            .find_map(|c| match c {
                KeyCondition::Compare { field, op: CompareOp::Eq, value } if field == hash_attr => {
                    Some(value)
                }
                _ => None,
            })
            .ok_or_else(|| {
                StoreError::validation(format!(
                    "Query condition missed key schema element: {hash_attr}"
                ))
            })?;
        let range_conditions: Vec<&KeyCondition> = conditions
            .iter()
            .filter(|c| condition_field(c) == range_attr)
            .collect();
        if conditions.len() != range_conditions.len() + 1 {
            return Err(StoreError::validation(
                "Key condition expressions may only reference the index key attributes",
            ));
        }

        // Items lacking the index range key are not present in the index.
        let mut matches: Vec<&Item> = table
            .items
            .values()
            .filter(|item| item.get(hash_attr) == Some(hash_value))
            .filter(|item| item.contains_key(range_attr))
            .filter(|item| {
                range_conditions
                    .iter()
                    .all(|c| satisfies(&item[range_attr], c))
            })
            .collect();
        matches.sort_by(|a, b| {
            key_order(&a[range_attr], &b[range_attr])
                .then_with(|| a.get(ID_FIELD).map(av_text).cmp(&b.get(ID_FIELD).map(av_text)))
        });
        let forward = input.scan_index_forward.unwrap_or(true);
        if !forward {
            matches.reverse();
        }

        let start = start_position(&matches, &input.exclusive_start_key);
        let remaining = &matches[start..];
        let take = input
            .limit
            .map_or(remaining.len(), |l| usize::try_from(l).unwrap_or(0));
        let page: Vec<Item> = remaining.iter().take(take).map(|i| (*i).clone()).collect();

        let last_evaluated_key = if page.len() < remaining.len() {
            page.last()
                .map(|item| page_break_key(item, hash_attr, range_attr))
                .unwrap_or_default()
        } else {
            HashMap::new()
        };

        debug!(
            table = %input.table_name,
            index = %index_name,
            matched = matches.len(),
            returned = page.len(),
            "mem: query"
        );
        let count = i32::try_from(page.len()).unwrap_or(i32::MAX);
        Ok(QueryOutput {
            items: page,
            count,
            scanned_count: count,
            last_evaluated_key,
        })
    }
}

fn table_not_found(table_name: &str) -> StoreError {
    StoreError::resource_not_found(format!(
        "Requested resource not found: Table: {table_name} not found"
    ))
}

fn key_id(attributes: &Item) -> Result<&str, StoreError> {
    attributes
        .get(ID_FIELD)
        .and_then(AttributeValue::as_s)
        .ok_or_else(|| {
            StoreError::validation(format!("Missing the key {ID_FIELD} in the item"))
        })
}

fn index_key<'a>(
    index: &'a GlobalSecondaryIndex,
    key_type: &KeyType,
) -> Result<&'a str, StoreError> {
    index
        .key_schema
        .iter()
        .find(|e| e.key_type == *key_type)
        .map(|e| e.attribute_name.as_str())
        .ok_or_else(|| {
            StoreError::validation(format!(
                "Index {} has no {key_type} key",
                index.index_name
            ))
        })
}

fn condition_field(condition: &KeyCondition) -> &str {
    match condition {
        KeyCondition::Compare { field, .. } | KeyCondition::BeginsWith { field, .. } => field,
    }
}

fn satisfies(actual: &AttributeValue, condition: &KeyCondition) -> bool {
    match condition {
        KeyCondition::Compare { op, value, .. } => {
            let ordering = key_order(actual, value);
            match op {
                CompareOp::Eq => ordering == Ordering::Equal && actual == value,
                CompareOp::Le => ordering != Ordering::Greater,
                CompareOp::Lt => ordering == Ordering::Less,
                CompareOp::Ge => ordering != Ordering::Less,
                CompareOp::Gt => ordering == Ordering::Greater,
            }
        }
        KeyCondition::BeginsWith { value, .. } => match (actual, value) {
            (AttributeValue::S(s), AttributeValue::S(prefix)) => s.starts_with(prefix.as_str()),
            _ => false,
        },
    }
}

// Store key ordering: numbers numerically, strings bytewise. Anything else
// falls back to its rendered text; key attributes are S/N/B only.
fn key_order(a: &AttributeValue, b: &AttributeValue) -> Ordering {
    match (a, b) {
        (AttributeValue::N(x), AttributeValue::N(y)) => {
            match (x.parse::<f64>(), y.parse::<f64>()) {
                (Ok(x), Ok(y)) => x.total_cmp(&y),
                _ => x.cmp(y),
            }
        }
        (AttributeValue::S(x), AttributeValue::S(y)) => x.as_bytes().cmp(y.as_bytes()),
        _ => av_text(a).cmp(&av_text(b)),
    }
}

fn av_text(value: &AttributeValue) -> String {
    value.to_string()
}

fn start_position(matches: &[&Item], exclusive_start_key: &Item) -> usize {
    if exclusive_start_key.is_empty() {
        return 0;
    }
    let Some(start_id) = exclusive_start_key.get(ID_FIELD) else {
        return 0;
    };
    matches
        .iter()
        .position(|item| item.get(ID_FIELD) == Some(start_id))
        .map_or(0, |pos| pos + 1)
}

fn page_break_key(item: &Item, hash_attr: &str, range_attr: &str) -> Item {
    [hash_attr, range_attr, ID_FIELD]
        .iter()
        .filter_map(|attr| {
            item.get(*attr)
                .map(|value| ((*attr).to_string(), value.clone()))
        })
        .collect()
}

fn epoch_seconds() -> f64 {
    let now = Utc::now();
    let millis = now.timestamp_millis();
    millis as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstore_dynamo_model::types::{
        AttributeDefinition, KeySchemaElement, Projection, ProjectionType,
    };

    fn table_input() -> CreateTableInput {
        CreateTableInput {
            table_name: "dev.task".to_string(),
            key_schema: vec![KeySchemaElement::hash(ID_FIELD)],
            attribute_definitions: vec![
                AttributeDefinition::string(ID_FIELD),
                AttributeDefinition::string("owner"),
                AttributeDefinition {
                    attribute_name: "created".to_string(),
                    attribute_type: docstore_dynamo_model::types::ScalarAttributeType::N,
                },
            ],
            billing_mode: None,
            provisioned_throughput: None,
            global_secondary_indexes: vec![GlobalSecondaryIndex {
                index_name: "owner-created-index".to_string(),
                key_schema: vec![
                    KeySchemaElement::hash("owner"),
                    KeySchemaElement::range("created"),
                ],
                projection: Projection {
                    projection_type: Some(ProjectionType::All),
                    non_key_attributes: Vec::new(),
                },
                provisioned_throughput: None,
            }],
        }
    }

    fn item(id: &str, owner: &str, created: &str) -> Item {
        HashMap::from([
            (ID_FIELD.to_string(), AttributeValue::S(id.to_string())),
            ("owner".to_string(), AttributeValue::S(owner.to_string())),
            ("created".to_string(), AttributeValue::N(created.to_string())),
        ])
    }

    async fn seeded() -> MemoryDynamo {
        let store = MemoryDynamo::new();
        store.create_table(table_input()).await.unwrap();
        for (id, owner, created) in [
            ("t1", "alice", "100"),
            ("t2", "alice", "90"),
            ("t3", "bob", "95"),
            ("t4", "alice", "110"),
        ] {
            store
                .put_item(PutItemInput {
                    table_name: "dev.task".to_string(),
                    item: item(id, owner, created),
                    return_values: None,
                })
                .await
                .unwrap();
        }
        store
    }

    fn query_input(forward: bool, limit: Option<i32>) -> QueryInput {
        QueryInput {
            table_name: "dev.task".to_string(),
            index_name: Some("owner-created-index".to_string()),
            key_condition_expression: Some("#o = :o AND #c >= :c".to_string()),
            expression_attribute_names: HashMap::from([
                ("#o".to_string(), "owner".to_string()),
                ("#c".to_string(), "created".to_string()),
            ]),
            expression_attribute_values: HashMap::from([
                (":o".to_string(), AttributeValue::S("alice".to_string())),
                (":c".to_string(), AttributeValue::N("0".to_string())),
            ]),
            scan_index_forward: Some(forward),
            limit,
            exclusive_start_key: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_create_table() {
        let store = seeded().await;
        let err = store.create_table(table_input()).await.unwrap_err();
        assert_eq!(
            err.code,
            docstore_dynamo_model::StoreErrorCode::ResourceInUseException
        );
    }

    #[tokio::test]
    async fn test_should_query_in_numeric_range_order() {
        let store = seeded().await;
        let out = store.query(query_input(true, None)).await.unwrap();
        let ids: Vec<&str> = out
            .items
            .iter()
            .map(|i| i[ID_FIELD].as_s().unwrap())
            .collect();
        assert_eq!(ids, vec!["t2", "t1", "t4"]);
        assert!(out.last_evaluated_key.is_empty());
    }

    #[tokio::test]
    async fn test_should_page_with_exclusive_start_key() {
        let store = seeded().await;
        let first = store.query(query_input(true, Some(2))).await.unwrap();
        assert_eq!(first.count, 2);
        assert!(!first.last_evaluated_key.is_empty());

        let mut next = query_input(true, Some(2));
        next.exclusive_start_key = first.last_evaluated_key;
        let second = store.query(next).await.unwrap();
        let ids: Vec<&str> = second
            .items
            .iter()
            .map(|i| i[ID_FIELD].as_s().unwrap())
            .collect();
        assert_eq!(ids, vec!["t4"]);
        assert!(second.last_evaluated_key.is_empty());
    }

    #[tokio::test]
    async fn test_should_query_descending() {
        let store = seeded().await;
        let out = store.query(query_input(false, None)).await.unwrap();
        let ids: Vec<&str> = out
            .items
            .iter()
            .map(|i| i[ID_FIELD].as_s().unwrap())
            .collect();
        assert_eq!(ids, vec!["t4", "t1", "t2"]);
    }

    #[tokio::test]
    async fn test_should_upsert_through_update_item() {
        let store = seeded().await;
        store
            .update_item(UpdateItemInput {
                table_name: "dev.task".to_string(),
                key: HashMap::from([(
                    ID_FIELD.to_string(),
                    AttributeValue::S("t9".to_string()),
                )]),
                update_expression: Some("set #t = :v".to_string()),
                expression_attribute_names: HashMap::from([(
                    "#t".to_string(),
                    "title".to_string(),
                )]),
                expression_attribute_values: HashMap::from([(
                    ":v".to_string(),
                    AttributeValue::S("new".to_string()),
                )]),
                return_values: None,
            })
            .await
            .unwrap();
        let got = store
            .get_item(GetItemInput {
                table_name: "dev.task".to_string(),
                key: HashMap::from([(
                    ID_FIELD.to_string(),
                    AttributeValue::S("t9".to_string()),
                )]),
                consistent_read: None,
            })
            .await
            .unwrap();
        let item = got.item.unwrap();
        assert_eq!(item["title"], AttributeValue::S("new".to_string()));
        assert_eq!(item[ID_FIELD], AttributeValue::S("t9".to_string()));
    }

    #[tokio::test]
    async fn test_should_reject_query_on_unknown_index() {
        let store = seeded().await;
        let mut input = query_input(true, None);
        input.index_name = Some("nope-index".to_string());
        let err = store.query(input).await.unwrap_err();
        assert!(err.message.contains("nope-index"));
    }
}
