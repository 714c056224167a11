//! Filter clauses for list requests
//!
//! Filters are an explicit tagged list of `{field, operator, value}`
//! clauses serialized as JSON into the single `filters` query parameter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator for filter clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equal to
    #[serde(rename = "==")]
    Eq,

    /// Not equal to
    #[serde(rename = "!=")]
    Neq,

    /// Greater than
    #[serde(rename = ">")]
    Gt,

    /// Greater than or equal to
    #[serde(rename = ">=")]
    Gte,

    /// Less than
    #[serde(rename = "<")]
    Lt,

    /// Less than or equal to
    #[serde(rename = "<=")]
    Lte,

    /// In a list of values
    #[serde(rename = "in")]
    In,

    /// Not in a list of values
    #[serde(rename = "not_in")]
    NotIn,

    /// Substring match (case sensitive)
    #[serde(rename = "like")]
    Like,

    /// Substring match (case insensitive)
    #[serde(rename = "ilike")]
    ILike,
}

impl FilterOperator {
    /// The operand token sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "==",
            FilterOperator::Neq => "!=",
            FilterOperator::Gt => ">",
            FilterOperator::Gte => ">=",
            FilterOperator::Lt => "<",
            FilterOperator::Lte => "<=",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "not_in",
            FilterOperator::Like => "like",
            FilterOperator::ILike => "ilike",
        }
    }
}

/// A single filter comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterClause {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterClause {
    pub fn new(field: &str, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: value.into(),
        }
    }
}

/// An ordered list of filter clauses
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<FilterClause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arbitrary clause
    pub fn push(mut self, clause: FilterClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(FilterClause::new(field, FilterOperator::Eq, value))
    }

    pub fn neq(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(FilterClause::new(field, FilterOperator::Neq, value))
    }

    pub fn gt(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(FilterClause::new(field, FilterOperator::Gt, value))
    }

    pub fn gte(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(FilterClause::new(field, FilterOperator::Gte, value))
    }

    pub fn lt(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(FilterClause::new(field, FilterOperator::Lt, value))
    }

    pub fn lte(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(FilterClause::new(field, FilterOperator::Lte, value))
    }

    pub fn in_list(self, field: &str, values: impl Into<Value>) -> Self {
        self.push(FilterClause::new(field, FilterOperator::In, values))
    }

    pub fn not_in(self, field: &str, values: impl Into<Value>) -> Self {
        self.push(FilterClause::new(field, FilterOperator::NotIn, values))
    }

    pub fn like(self, field: &str, pattern: &str) -> Self {
        self.push(FilterClause::new(field, FilterOperator::Like, pattern))
    }

    pub fn ilike(self, field: &str, pattern: &str) -> Self {
        self.push(FilterClause::new(field, FilterOperator::ILike, pattern))
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Serialize the clause list for the `filters` query parameter
    pub fn to_json(&self) -> Result<String, crate::error::Error> {
        Ok(serde_json::to_string(&self.clauses)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operators_serialize_to_operand_tokens() {
        let cases = [
            (FilterOperator::Eq, "=="),
            (FilterOperator::Neq, "!="),
            (FilterOperator::Gt, ">"),
            (FilterOperator::Gte, ">="),
            (FilterOperator::Lt, "<"),
            (FilterOperator::Lte, "<="),
            (FilterOperator::In, "in"),
            (FilterOperator::NotIn, "not_in"),
            (FilterOperator::Like, "like"),
            (FilterOperator::ILike, "ilike"),
        ];
        for (op, token) in cases {
            assert_eq!(op.as_str(), token);
            assert_eq!(serde_json::to_value(op).unwrap(), json!(token));
        }
    }

    #[test]
    fn filter_serializes_as_clause_array() {
        let filter = Filter::new()
            .eq("branch_id", 3)
            .ilike("name", "%diesel%")
            .in_list("status", json!(["active", "maintenance"]));

        let value: serde_json::Value = serde_json::from_str(&filter.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!([
                {"field": "branch_id", "operator": "==", "value": 3},
                {"field": "name", "operator": "ilike", "value": "%diesel%"},
                {"field": "status", "operator": "in", "value": ["active", "maintenance"]}
            ])
        );
    }
}
