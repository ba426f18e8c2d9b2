//! Conversion between neutral document values and the store's wire values.
//!
//! Encoding is total: the document model is a closed sum and every variant has
//! a wire representation. Decoding is partial, since the wire model carries
//! tags the document model cannot express (`B`, `NULL`); those fail with
//! [`ConnectorError::MalformedWireValue`].

use std::collections::{BTreeMap, HashMap};

use docstore_core::{ConnectorError, ConnectorResult, Document, Value};
use docstore_dynamo_model::AttributeValue;

/// Reserved attribute holding the document id; doubles as the table's
/// partition key.
pub const ID_FIELD: &str = "_id";

/// Encodes a document value into its tagged wire form.
///
/// Numbers travel as strings on the wire; `f64`'s `Display` produces the
/// shortest text that round-trips.
#[must_use]
pub fn encode_value(value: &Value) -> AttributeValue {
    match value {
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::List(items) => AttributeValue::L(items.iter().map(encode_value).collect()),
        Value::Map(entries) => AttributeValue::M(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), encode_value(v)))
                .collect(),
        ),
    }
}

/// Decodes a tagged wire value back into a document value.
pub fn decode_value(value: &AttributeValue) -> ConnectorResult<Value> {
    match value {
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::N(n) => n
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| ConnectorError::MalformedWireValue(format!("N \"{n}\""))),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::L(items) => items
            .iter()
            .map(decode_value)
            .collect::<ConnectorResult<Vec<_>>>()
            .map(Value::List),
        AttributeValue::M(entries) => {
            let mut map = BTreeMap::new();
            for (k, v) in entries {
                map.insert(k.clone(), decode_value(v)?);
            }
            Ok(Value::Map(map))
        }
        AttributeValue::B(_) | AttributeValue::Null(_) => Err(
            ConnectorError::MalformedWireValue(value.type_descriptor().to_string()),
        ),
    }
}

/// Encodes a document into a wire item, merging the id under [`ID_FIELD`].
#[must_use]
pub fn encode_document(document: &Document) -> HashMap<String, AttributeValue> {
    let mut item: HashMap<String, AttributeValue> = document
        .attributes
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect();
    item.insert(ID_FIELD.to_string(), AttributeValue::S(document.id.clone()));
    item
}

/// Decodes a wire item into a document, splitting the id back out of
/// [`ID_FIELD`].
pub fn decode_item(item: &HashMap<String, AttributeValue>) -> ConnectorResult<Document> {
    let id = item
        .get(ID_FIELD)
        .and_then(AttributeValue::as_s)
        .ok_or_else(|| {
            ConnectorError::MalformedWireValue(format!("an item without a string {ID_FIELD}"))
        })?;
    let mut attributes = BTreeMap::new();
    for (k, v) in item {
        if k == ID_FIELD {
            continue;
        }
        attributes.insert(k.clone(), decode_value(v)?);
    }
    Ok(Document {
        id: id.to_string(),
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        Value::map([
            ("name", Value::string("widget")),
            ("qty", Value::number(3.0)),
            ("active", Value::Bool(true)),
            (
                "tags",
                Value::List(vec![Value::string("a"), Value::number(1.5)]),
            ),
        ])
    }

    #[test]
    fn test_should_round_trip_every_representable_value() {
        let value = sample();
        let decoded = decode_value(&encode_value(&value)).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_should_encode_numbers_as_wire_strings() {
        assert_eq!(
            encode_value(&Value::number(5.0)),
            AttributeValue::N("5".to_string())
        );
        assert_eq!(
            encode_value(&Value::number(2.5)),
            AttributeValue::N("2.5".to_string())
        );
    }

    #[test]
    fn test_should_reject_unparseable_number() {
        let err = decode_value(&AttributeValue::N("not-a-number".to_string())).unwrap_err();
        assert!(err.to_string().contains("not-a-number"));
    }

    #[test]
    fn test_should_reject_binary_and_null_tags() {
        let err = decode_value(&AttributeValue::Null(true)).unwrap_err();
        assert!(matches!(err, ConnectorError::MalformedWireValue(_)));
    }

    #[test]
    fn test_should_merge_and_split_the_id_attribute() {
        let doc = Document::new("task-1", [("title", Value::string("write tests"))]);
        let item = encode_document(&doc);
        assert_eq!(item.get(ID_FIELD), Some(&AttributeValue::S("task-1".into())));

        let back = decode_item(&item).unwrap();
        assert_eq!(back, doc);
        assert!(!back.attributes.contains_key(ID_FIELD));
    }

    #[test]
    fn test_should_reject_item_without_id() {
        let item = HashMap::from([("title".to_string(), AttributeValue::S("x".to_string()))]);
        assert!(decode_item(&item).is_err());
    }
}
