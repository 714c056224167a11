//! Resource CRUD operations against the admin REST backend
//!
//! Translates the abstract operation set (list, get, create, update,
//! delete, plus nested many-to-many references) into HTTP requests.
//! Records pass straight through: nothing is cached or retained after a
//! response is returned, and concurrent operations are fully independent.

mod filter;
mod types;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};
use crate::session::SessionStore;

pub use filter::*;
pub use types::*;

/// Join resource names and ids into a nested reference path by
/// alternating the two slices: `["machines", "products"]` with `["7"]`
/// yields `machines/7/products`. A trailing unpaired segment from either
/// slice is appended as-is.
pub fn alternate_join(resources: &[&str], ids: &[&str]) -> String {
    let mut segments = Vec::new();

    let max_len = resources.len().max(ids.len());
    for i in 0..max_len {
        if let Some(resource) = resources.get(i) {
            segments.push(*resource);
        }
        if let Some(id) = ids.get(i) {
            segments.push(*id);
        }
    }

    segments.join("/")
}

/// Client for resource CRUD operations
pub struct DataProvider {
    /// The base URL of the admin API
    url: String,

    /// HTTP client
    client: Client,

    /// Shared session state, read for the bearer token on every request
    session: Arc<dyn SessionStore>,
}

impl DataProvider {
    /// Create a new DataProvider
    pub(crate) fn new(url: &str, client: Client, session: Arc<dyn SessionStore>) -> Self {
        Self {
            url: url.to_string(),
            client,
            session,
        }
    }

    fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}", self.url, resource)
    }

    fn record_url(&self, resource: &str, id: i64) -> String {
        format!("{}/{}/{}", self.url, resource, id)
    }

    /// Attach the bearer token if a session is present; without one the
    /// request goes out unauthenticated and the backend decides.
    fn authed<'a>(&self, builder: FetchBuilder<'a>) -> FetchBuilder<'a> {
        match self.session.access_token() {
            Some(token) => builder.bearer_auth(&token),
            None => builder,
        }
    }

    /// Fetch a page of records with optional sort, pagination and filters
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &GetListParams,
    ) -> Result<ListResult<T>, Error> {
        let query = params.to_query()?;
        self.authed(Fetch::get(&self.client, &self.resource_url(resource)))
            .query(query)
            .execute()
            .await
    }

    /// Fetch a single record by id
    pub async fn get_one<T: DeserializeOwned>(&self, resource: &str, id: i64) -> Result<T, Error> {
        self.authed(Fetch::get(&self.client, &self.record_url(resource, id)))
            .execute()
            .await
    }

    /// Fetch a set of records by id
    pub async fn get_many<T: DeserializeOwned>(
        &self,
        resource: &str,
        ids: &[i64],
    ) -> Result<Vec<T>, Error> {
        let mut query = HashMap::new();
        query.insert("filter".to_string(), json!({ "ids": ids }).to_string());

        self.authed(Fetch::get(&self.client, &self.resource_url(resource)))
            .query(query)
            .execute()
            .await
    }

    /// Fetch records scoped to a foreign-key relationship: behaves like
    /// [`get_list`](Self::get_list) with a `target == id` clause appended
    /// to the filter.
    pub async fn get_many_reference<T: DeserializeOwned>(
        &self,
        resource: &str,
        target: &str,
        id: i64,
        params: &GetListParams,
    ) -> Result<ListResult<T>, Error> {
        let mut params = params.clone();
        let filter = params.filter.take().unwrap_or_default().eq(target, id);
        let params = params.filter(filter);

        self.get_list(resource, &params).await
    }

    /// Create a record; the server assigns the id
    pub async fn create<D: Serialize, T: DeserializeOwned>(
        &self,
        resource: &str,
        data: &D,
    ) -> Result<T, Error> {
        self.authed(Fetch::post(&self.client, &self.resource_url(resource)))
            .json(data)?
            .execute()
            .await
    }

    /// Apply a partial update to a record
    pub async fn update<D: Serialize, T: DeserializeOwned>(
        &self,
        resource: &str,
        id: i64,
        data: &D,
    ) -> Result<T, Error> {
        self.authed(Fetch::patch(&self.client, &self.record_url(resource, id)))
            .json(data)?
            .execute()
            .await
    }

    /// Apply the same partial update to a set of records
    pub async fn update_many<D: Serialize, T: DeserializeOwned>(
        &self,
        resource: &str,
        ids: &[i64],
        data: &D,
    ) -> Result<T, Error> {
        let mut query = HashMap::new();
        query.insert("filter".to_string(), json!({ "id": ids }).to_string());

        self.authed(Fetch::patch(&self.client, &self.resource_url(resource)))
            .query(query)
            .json(data)?
            .execute()
            .await
    }

    /// Delete a record by id
    pub async fn delete<T: DeserializeOwned>(&self, resource: &str, id: i64) -> Result<T, Error> {
        self.authed(Fetch::delete(&self.client, &self.record_url(resource, id)))
            .execute()
            .await
    }

    /// Delete a set of records by id
    pub async fn delete_many<T: DeserializeOwned>(
        &self,
        resource: &str,
        ids: &[i64],
    ) -> Result<T, Error> {
        let mut query = HashMap::new();
        query.insert("filter".to_string(), json!({ "id": ids }).to_string());

        self.authed(Fetch::delete(&self.client, &self.resource_url(resource)))
            .query(query)
            .execute()
            .await
    }

    /// List sub-resources that exist only in the context of a parent,
    /// e.g. `["machines", "products"], ["7"]` lists the products
    /// associated with machine 7.
    pub async fn get_many_to_many_reference_list<T: DeserializeOwned>(
        &self,
        resources: &[&str],
        ids: &[&str],
    ) -> Result<ListResult<T>, Error> {
        let url = format!("{}/{}", self.url, alternate_join(resources, ids));
        self.authed(Fetch::get(&self.client, &url)).execute().await
    }

    /// Fetch a single nested association record
    pub async fn get_many_to_many_reference_one<T: DeserializeOwned>(
        &self,
        resources: &[&str],
        ids: &[&str],
    ) -> Result<T, Error> {
        let url = format!("{}/{}", self.url, alternate_join(resources, ids));
        self.authed(Fetch::get(&self.client, &url)).execute().await
    }

    /// Create an association under a parent; the trailing resource name
    /// is left unpaired (`machines/7/products`).
    pub async fn create_many_to_many_reference<D: Serialize, T: DeserializeOwned>(
        &self,
        resources: &[&str],
        ids: &[&str],
        data: &D,
    ) -> Result<T, Error> {
        let url = format!("{}/{}", self.url, alternate_join(resources, ids));
        self.authed(Fetch::post(&self.client, &url))
            .json(data)?
            .execute()
            .await
    }

    /// Remove an association
    pub async fn delete_many_to_many_reference<T: DeserializeOwned>(
        &self,
        resources: &[&str],
        ids: &[&str],
    ) -> Result<T, Error> {
        let url = format!("{}/{}", self.url, alternate_join(resources, ids));
        self.authed(Fetch::delete(&self.client, &url))
            .execute()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternate_join_pairs() {
        assert_eq!(alternate_join(&["machines"], &["7"]), "machines/7");
        assert_eq!(
            alternate_join(&["machines", "products"], &["7", "45"]),
            "machines/7/products/45"
        );
    }

    #[test]
    fn alternate_join_trailing_resource() {
        assert_eq!(
            alternate_join(&["machines", "products"], &["7"]),
            "machines/7/products"
        );
    }

    #[test]
    fn alternate_join_is_symmetric_in_length() {
        assert_eq!(alternate_join(&["machines"], &["7", "45"]), "machines/7/45");
        assert_eq!(alternate_join(&[], &[]), "");
    }
}
