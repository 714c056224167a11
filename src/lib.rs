//! Gas-Station Admin API Client
//!
//! A Rust client for the REST backend of the multi-branch gas-station
//! sales and inventory system. It covers the generic resource CRUD
//! operations (with sort, pagination, filters and nested many-to-many
//! references), the authentication flows (login, refresh, 2FA, password
//! management), and a raw JSON passthrough for everything else.

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod provider;
pub mod session;

use reqwest::{Client, Method};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::Auth;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder, JsonResponse};
use crate::provider::DataProvider;
use crate::session::{MemorySessionStore, SessionStore};

/// The main entry point for the admin API client
pub struct AdminClient {
    /// The base URL of the admin API, e.g. `https://host/api`
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Session state shared by every sub-client
    pub session: Arc<dyn SessionStore>,
    /// Auth client for login, 2FA and account management
    pub auth: Auth,
    /// Client options
    pub options: ClientOptions,
}

impl AdminClient {
    /// Create a new client with an in-memory session store
    ///
    /// # Example
    ///
    /// ```
    /// use gasadmin_client::AdminClient;
    ///
    /// let client = AdminClient::new("https://station.example.com/api");
    /// ```
    pub fn new(api_url: &str) -> Self {
        Self::new_with_options(
            api_url,
            Arc::new(MemorySessionStore::new()),
            ClientOptions::default(),
        )
    }

    /// Create a new client with a custom session store and options
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use gasadmin_client::{AdminClient, config::ClientOptions, session::MemorySessionStore};
    ///
    /// let options = ClientOptions::default().with_auto_refresh_token(false);
    /// let client = AdminClient::new_with_options(
    ///     "https://station.example.com/api",
    ///     Arc::new(MemorySessionStore::new()),
    ///     options,
    /// );
    /// ```
    pub fn new_with_options(
        api_url: &str,
        session: Arc<dyn SessionStore>,
        options: ClientOptions,
    ) -> Self {
        let url = api_url.trim_end_matches('/').to_string();

        let http_client = match options.request_timeout {
            Some(timeout) => Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            None => Client::new(),
        };

        let auth = Auth::new(&url, http_client.clone(), session.clone(), options.clone());

        Self {
            url,
            http_client,
            session,
            auth,
            options,
        }
    }

    /// Get a reference to the auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Create a data provider for resource CRUD operations
    ///
    /// # Example
    ///
    /// ```
    /// use gasadmin_client::AdminClient;
    ///
    /// let client = AdminClient::new("https://station.example.com/api");
    /// let provider = client.provider();
    /// ```
    pub fn provider(&self) -> DataProvider {
        DataProvider::new(&self.url, self.http_client.clone(), self.session.clone())
    }

    /// Build an authenticated request against an arbitrary API path
    ///
    /// The bearer token is attached when a session is present. This is
    /// the escape hatch for endpoints that do not model as resources.
    pub fn request(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        let url = format!("{}{}", self.url, path);
        let builder = Fetch::request(&self.http_client, &url, method);
        match self.session.access_token() {
            Some(token) => builder.bearer_auth(&token),
            None => builder,
        }
    }

    /// Issue an authenticated request and return the parsed JSON along
    /// with the response status and headers
    pub async fn fetch_json<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
    ) -> Result<JsonResponse, Error> {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body)?;
        }
        builder.execute_json().await
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::TfaMethod;
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::provider::{Filter, GetListParams, ListResult, Pagination, Sort};
    pub use crate::session::{MemorySessionStore, Session, SessionStore};
    pub use crate::AdminClient;
}
