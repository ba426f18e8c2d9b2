//! Update-expression construction for partial document writes.

use std::collections::{BTreeMap, HashMap};

use docstore_core::Value;
use docstore_dynamo_model::AttributeValue;

use crate::codec::{self, ID_FIELD};
use crate::placeholder;

/// A rendered `set` expression together with its placeholder maps.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    /// The expression text, e.g. `set #ab12 = :cd34, #ef56 = :0789`.
    pub expression: String,
    /// Attribute-name substitutions (`#token` to field name).
    pub names: HashMap<String, String>,
    /// Attribute-value substitutions (`:token` to wire value).
    pub values: HashMap<String, AttributeValue>,
}

/// Builds a `set` expression covering every attribute of a patch.
///
/// The reserved id attribute is skipped: it is the key, never an assignment
/// target. Patch iteration is in `BTreeMap` key order, so an identical patch
/// always produces the identical expression text.
#[must_use]
pub fn build(patch: &BTreeMap<String, Value>) -> UpdateExpression {
    let mut assignments = Vec::with_capacity(patch.len());
    let mut names = HashMap::with_capacity(patch.len());
    let mut values = HashMap::with_capacity(patch.len());

    for (field, value) in patch {
        if field == ID_FIELD {
            continue;
        }
        let name = placeholder::name_token(field);
        let token = placeholder::value_token(value);
        assignments.push(format!("{name} = {token}"));
        names.insert(name, field.clone());
        values.insert(token, codec::encode_value(value));
    }

    UpdateExpression {
        expression: format!("set {}", assignments.join(", ")),
        names,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_identical_expression_for_identical_patch() {
        let patch = BTreeMap::from([
            ("title".to_string(), Value::string("updated")),
            ("done".to_string(), Value::Bool(true)),
        ]);
        let a = build(&patch);
        let b = build(&patch);
        assert_eq!(a, b);
        assert!(a.expression.starts_with("set "));
        assert_eq!(a.names.len(), 2);
        assert_eq!(a.values.len(), 2);
    }

    #[test]
    fn test_should_join_assignments_with_comma() {
        let patch = BTreeMap::from([
            ("a".to_string(), Value::number(1.0)),
            ("b".to_string(), Value::number(2.0)),
        ]);
        let expr = build(&patch);
        assert_eq!(expr.expression.matches(" = ").count(), 2);
        assert_eq!(expr.expression.matches(", ").count(), 1);
    }

    #[test]
    fn test_should_skip_the_reserved_id_attribute() {
        let patch = BTreeMap::from([
            ("_id".to_string(), Value::string("task-1")),
            ("title".to_string(), Value::string("x")),
        ]);
        let expr = build(&patch);
        assert_eq!(expr.names.len(), 1);
        assert_eq!(expr.names.values().next().map(String::as_str), Some("title"));
    }
}
