//! The filter/sort AST consumed by connector query compilers.
//!
//! The query DSL itself is an external collaborator; it lexes user input into
//! this already-structured form. Connectors validate and translate the AST
//! into their store's native query language; they never evaluate it.

use std::fmt;

use crate::value::Value;

/// Operators a filter node can carry.
///
/// This is the DSL's full vocabulary. Individual connectors support a subset
/// and must reject the rest with a validation error rather than silently
/// simplifying (the partition/sort-key connector accepts a flat `And` of
/// the six comparison operators only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// Conjunction of leaf conditions.
    And,
    /// Disjunction of leaf conditions.
    Or,
    /// Equality.
    Eq,
    /// Greater than or equal.
    Gte,
    /// Less than or equal.
    Lte,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// String prefix match.
    Prefix,
    /// Inclusive range with two values.
    Between,
}

impl FilterOperator {
    /// Returns the DSL operator name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Eq => "eq",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Prefix => "prefix",
            Self::Between => "between",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leaf condition: an operator applied to a field with its operand values.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// Leaf operator.
    pub operator: FilterOperator,
    /// Field the condition applies to.
    pub field: String,
    /// Operand values, in DSL order. Comparison operators carry one value;
    /// `between` carries two.
    pub values: Vec<Value>,
}

impl FilterCondition {
    fn leaf(operator: FilterOperator, field: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            operator,
            field: field.into(),
            values,
        }
    }

    /// `field == value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(FilterOperator::Eq, field, vec![value.into()])
    }

    /// `field >= value`
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(FilterOperator::Gte, field, vec![value.into()])
    }

    /// `field <= value`
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(FilterOperator::Lte, field, vec![value.into()])
    }

    /// `field > value`
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(FilterOperator::Gt, field, vec![value.into()])
    }

    /// `field < value`
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(FilterOperator::Lt, field, vec![value.into()])
    }

    /// `field` begins with `value`
    pub fn prefix(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(FilterOperator::Prefix, field, vec![value.into()])
    }

    /// `low <= field <= high`
    pub fn between(
        field: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        Self::leaf(FilterOperator::Between, field, vec![low.into(), high.into()])
    }
}

/// A filter: a top-level operator aggregating leaf conditions.
///
/// Nesting is not part of the current DSL contract; the aggregate holds
/// leaves only.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Top-level aggregation operator.
    pub operator: FilterOperator,
    /// The aggregated leaf conditions, in DSL order.
    pub operations: Vec<FilterCondition>,
}

impl Filter {
    /// A conjunction of leaf conditions.
    pub fn and(operations: impl IntoIterator<Item = FilterCondition>) -> Self {
        Self {
            operator: FilterOperator::And,
            operations: operations.into_iter().collect(),
        }
    }

    /// A disjunction of leaf conditions.
    pub fn or(operations: impl IntoIterator<Item = FilterCondition>) -> Self {
        Self {
            operator: FilterOperator::Or,
            operations: operations.into_iter().collect(),
        }
    }

    /// The leaf fields in DSL order, duplicates preserved.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.field.as_str()).collect()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Returns the DSL direction name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single sort key with its direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCondition {
    /// Sort direction.
    pub operator: SortOrder,
    /// Field to order by.
    pub field: String,
}

/// An ordered sort specification.
///
/// The current contract takes the query direction from the first entry only;
/// a single sort key drives the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    /// Sort keys in priority order.
    pub operations: Vec<SortCondition>,
}

impl Sort {
    /// Ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            operations: vec![SortCondition {
                operator: SortOrder::Asc,
                field: field.into(),
            }],
        }
    }

    /// Descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            operations: vec![SortCondition {
                operator: SortOrder::Desc,
                field: field.into(),
            }],
        }
    }

    /// The sort fields in priority order.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.field.as_str()).collect()
    }
}
