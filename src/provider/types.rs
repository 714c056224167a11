//! Types for the data provider

use crate::provider::Filter;
use serde::Deserialize;
use std::collections::HashMap;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Convert the direction to its wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Sort specification for list requests
#[derive(Debug, Clone)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    /// Sort ascending by a field
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            order: SortOrder::Asc,
        }
    }

    /// Sort descending by a field
    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            order: SortOrder::Desc,
        }
    }
}

/// Pagination specification for list requests, 1-indexed
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Zero-based offset sent on the wire
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1) * self.per_page
    }

    /// Page size sent on the wire
    pub fn limit(&self) -> u32 {
        self.per_page
    }
}

/// Parameters for `get_list` and `get_many_reference`
///
/// Leaving `pagination` unset marks the request as unbounded: no offset or
/// limit is sent and the backend returns the full collection.
#[derive(Debug, Clone, Default)]
pub struct GetListParams {
    pub sort: Option<Sort>,
    pub pagination: Option<Pagination>,
    pub filter: Option<Filter>,
}

impl GetListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn paginate(mut self, page: u32, per_page: u32) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Assemble the query string parameters. Sort field and direction are
    /// lower-cased on the wire; pagination is omitted when unbounded.
    pub(crate) fn to_query(&self) -> Result<HashMap<String, String>, crate::error::Error> {
        let mut query = HashMap::new();

        if let Some(sort) = &self.sort {
            query.insert("order_field".to_string(), sort.field.to_lowercase());
            query.insert("order_by".to_string(), sort.order.as_str().to_string());
        }
        if let Some(pagination) = &self.pagination {
            query.insert("offset".to_string(), pagination.offset().to_string());
            query.insert("limit".to_string(), pagination.limit().to_string());
        }
        if let Some(filter) = &self.filter {
            if !filter.is_empty() {
                query.insert("filters".to_string(), filter.to_json()?);
            }
        }

        Ok(query)
    }
}

/// A list response: the records plus the collection total
///
/// The backend contract is the `{"total": n, "data": [...]}` envelope. A
/// few legacy routes still return a bare array; those decode with
/// `total = data.len()`, which under-counts when the server paginates
/// without reporting a total.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "ListPayload<T>")]
pub struct ListResult<T> {
    pub data: Vec<T>,
    pub total: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListPayload<T> {
    Envelope { total: u64, data: Vec<T> },
    Rows(Vec<T>),
}

impl<T> From<ListPayload<T>> for ListResult<T> {
    fn from(payload: ListPayload<T>) -> Self {
        match payload {
            ListPayload::Envelope { total, data } => Self { data, total },
            ListPayload::Rows(rows) => Self {
                total: rows.len() as u64,
                data: rows,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn pagination_offset_is_zero_based() {
        assert_eq!(Pagination::new(1, 10).offset(), 0);
        assert_eq!(Pagination::new(1, 10).limit(), 10);
        assert_eq!(Pagination::new(3, 10).offset(), 20);
        assert_eq!(Pagination::new(3, 10).limit(), 10);
    }

    #[test]
    fn query_lowercases_sort() {
        let params = GetListParams::new()
            .sort(Sort::desc("Created_At"))
            .paginate(2, 25);
        let query = params.to_query().unwrap();
        assert_eq!(query["order_field"], "created_at");
        assert_eq!(query["order_by"], "desc");
        assert_eq!(query["offset"], "25");
        assert_eq!(query["limit"], "25");
    }

    #[test]
    fn unbounded_request_omits_pagination() {
        let params = GetListParams::new().sort(Sort::asc("id"));
        let query = params.to_query().unwrap();
        assert!(!query.contains_key("offset"));
        assert!(!query.contains_key("limit"));
    }

    #[test]
    fn list_result_decodes_envelope() {
        let result: ListResult<Value> =
            serde_json::from_str(r#"{"total": 42, "data": [{"id": 1}]}"#).unwrap();
        assert_eq!(result.total, 42);
        assert_eq!(result.data.len(), 1);
    }

    #[test]
    fn list_result_decodes_bare_array() {
        let result: ListResult<Value> =
            serde_json::from_str(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(result.total, 2);
        assert_eq!(result.data.len(), 2);
    }
}
