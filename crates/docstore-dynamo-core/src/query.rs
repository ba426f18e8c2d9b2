//! Query planning: validation, index selection, request building, and
//! response decoding.
//!
//! Planning is synchronous and happens entirely before the store call; a
//! request that survives planning is structurally valid, so any later failure
//! is the store's. Decoding turns the wire page back into documents and an
//! opaque continuation cursor.

use std::collections::{BTreeMap, HashMap};

use docstore_core::{
    ConnectorError, ConnectorResult, Document, Filter, FilterCondition, FilterOperator, Sort,
    SortOrder, Value,
};
use docstore_dynamo_model::AttributeValue;
use docstore_dynamo_model::input::QueryInput;
use docstore_dynamo_model::output::QueryOutput;
use tracing::debug;

use crate::codec;
use crate::config::ConnectorConfig;
use crate::placeholder;

/// Page size used when the caller does not set one.
pub const DEFAULT_QUERY_LIMIT: i32 = 10_000;

/// A compiled-from-DSL query: a flat conjunction, a sort direction, and
/// optional paging state.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// Flat conjunction of leaf conditions.
    pub filter: Filter,
    /// Sort specification; the first entry drives scan direction.
    pub sort: Sort,
    /// Maximum number of documents per page.
    pub limit: Option<i32>,
    /// Opaque continuation cursor from a previous page.
    pub cursor: Option<String>,
}

/// One page of query results.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// The matching documents, in index order.
    pub documents: Vec<Document>,
    /// Continuation cursor; absent when this is the final page.
    pub cursor: Option<String>,
    /// Number of documents in this page.
    pub count: i32,
}

/// Plans query requests against a connector configuration and decodes the
/// store's responses.
#[derive(Debug, Clone, Copy)]
pub struct QueryPlanner<'a> {
    config: &'a ConnectorConfig,
}

impl<'a> QueryPlanner<'a> {
    /// Creates a planner over the given configuration.
    #[must_use]
    pub fn new(config: &'a ConnectorConfig) -> Self {
        Self { config }
    }

    /// Validates a request and builds the wire query.
    pub fn plan(&self, request: &QueryRequest) -> ConnectorResult<QueryInput> {
        validate(&request.filter, &request.sort)?;
        let index_name = self.select_index(&request.filter)?;
        let forward = scan_forward(&request.sort)?;

        let mut key_fragments = Vec::with_capacity(request.filter.operations.len());
        let mut names = HashMap::new();
        let mut values = HashMap::new();
        for condition in &request.filter.operations {
            key_fragments.push(key_fragment(condition, &mut names, &mut values));
        }
        let key_condition_expression = key_fragments.join(" AND ");

        let exclusive_start_key = match &request.cursor {
            Some(cursor) => decode_cursor(cursor)?,
            None => HashMap::new(),
        };

        debug!(
            index = %index_name,
            expression = %key_condition_expression,
            forward,
            "planned query"
        );

        Ok(QueryInput {
            table_name: self.config.table_name(),
            index_name: Some(index_name),
            key_condition_expression: Some(key_condition_expression),
            expression_attribute_names: names,
            expression_attribute_values: values,
            scan_index_forward: Some(forward),
            limit: Some(request.limit.unwrap_or(DEFAULT_QUERY_LIMIT)),
            exclusive_start_key,
        })
    }

    /// Decodes a wire page into documents and the next cursor.
    pub fn decode(&self, output: &QueryOutput) -> ConnectorResult<QueryResult> {
        let documents = output
            .items
            .iter()
            .map(codec::decode_item)
            .collect::<ConnectorResult<Vec<_>>>()?;
        let cursor = if output.last_evaluated_key.is_empty() {
            None
        } else {
            Some(encode_cursor(&output.last_evaluated_key)?)
        };
        Ok(QueryResult {
            count: output.count,
            documents,
            cursor,
        })
    }

    // Two guesses from the filter's field list: fields joined in order, and
    // reversed. Exactly one configured index may match; the forward guess
    // wins when both would.
    fn select_index(&self, filter: &Filter) -> ConnectorResult<String> {
        let fields = filter.fields();
        let forward = guess_name(&fields);
        let mut reversed_fields = fields;
        reversed_fields.reverse();
        let reversed = guess_name(&reversed_fields);

        for guess in [&forward, &reversed] {
            if self.config.indexes.iter().any(|idx| idx.name() == *guess) {
                return Ok(guess.clone());
            }
        }
        Err(ConnectorError::IndexNotFound(format!(
            "{forward} or {reversed}"
        )))
    }
}

fn guess_name(fields: &[&str]) -> String {
    format!("{}-index", fields.join("-"))
}

// Structural validation, all of it ahead of the network call. The messages
// are part of the contract; callers match on them.
fn validate(filter: &Filter, sort: &Sort) -> ConnectorResult<()> {
    if filter.operator != FilterOperator::And {
        return Err(ConnectorError::MalformedQuery(format!(
            "Unknown filter operator {}",
            filter.operator
        )));
    }
    for condition in &filter.operations {
        if !matches!(
            condition.operator,
            FilterOperator::Eq
                | FilterOperator::Gte
                | FilterOperator::Lte
                | FilterOperator::Gt
                | FilterOperator::Lt
                | FilterOperator::Prefix
        ) {
            return Err(ConnectorError::MalformedQuery(format!(
                "Unknown filter operator {}",
                condition.operator
            )));
        }
        if condition.values.is_empty() {
            return Err(ConnectorError::MalformedQuery(format!(
                "filter condition on '{}' requires a value",
                condition.field
            )));
        }
    }
    let filter_fields = filter.fields();
    for sort_field in sort.fields() {
        if !filter_fields.contains(&sort_field) {
            return Err(ConnectorError::MalformedQuery(
                "filter must include sort keys".to_string(),
            ));
        }
    }
    Ok(())
}

fn scan_forward(sort: &Sort) -> ConnectorResult<bool> {
    let first = sort.operations.first().ok_or_else(|| {
        ConnectorError::MalformedQuery("query must include a sort direction".to_string())
    })?;
    Ok(first.operator == SortOrder::Asc)
}

fn key_fragment(
    condition: &FilterCondition,
    names: &mut HashMap<String, String>,
    values: &mut HashMap<String, AttributeValue>,
) -> String {
    let name = placeholder::name_token(&condition.field);
    names.insert(name.clone(), condition.field.clone());
    let mut tokens = Vec::with_capacity(condition.values.len());
    for value in &condition.values {
        let token = placeholder::value_token(value);
        values.insert(token.clone(), codec::encode_value(value));
        tokens.push(token);
    }
    let value = &tokens[0];
    match condition.operator {
        FilterOperator::Gte => format!("{name} >= {value}"),
        FilterOperator::Lte => format!("{name} <= {value}"),
        FilterOperator::Gt => format!("{name} > {value}"),
        FilterOperator::Lt => format!("{name} < {value}"),
        FilterOperator::Prefix => format!("begins_with({name}, {value})"),
        // validate() admits only the six operators above plus Eq.
        _ => format!("{name} = {value}"),
    }
}

// The cursor is canonical JSON of the page-break key attributes in decoded
// form. BTreeMap serialization sorts the keys, so the same page break always
// renders the same cursor text regardless of scan direction.
fn encode_cursor(key: &HashMap<String, AttributeValue>) -> ConnectorResult<String> {
    let mut decoded = BTreeMap::new();
    for (field, value) in key {
        decoded.insert(field.clone(), codec::decode_value(value)?);
    }
    serde_json::to_string(&decoded).map_err(ConnectorError::store)
}

fn decode_cursor(cursor: &str) -> ConnectorResult<HashMap<String, AttributeValue>> {
    let json: serde_json::Value = serde_json::from_str(cursor)
        .map_err(|e| ConnectorError::MalformedCursor(e.to_string()))?;
    let value = Value::try_from(json)?;
    let Value::Map(entries) = value else {
        return Err(ConnectorError::MalformedCursor(
            "cursor must be a JSON object".to_string(),
        ));
    };
    Ok(entries
        .iter()
        .map(|(field, value)| (field.clone(), codec::encode_value(value)))
        .collect())
}
