//! Configuration options for the admin client

use std::time::Duration;

/// Configuration options for the admin client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Whether a 401 response triggers a single token refresh attempt
    pub auto_refresh_token: bool,

    /// The request timeout
    pub request_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            auto_refresh_token: true,
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ClientOptions {
    /// Set whether a 401 triggers a refresh attempt
    pub fn with_auto_refresh_token(mut self, value: bool) -> Self {
        self.auto_refresh_token = value;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }
}
