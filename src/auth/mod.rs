//! Authentication flows: login, refresh, 2FA, passwords, permissions

mod types;

use reqwest::{Client, StatusCode};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};
use crate::session::{IdentitySnapshot, Session, SessionStore};

pub use types::*;

/// Client for authentication and account management
///
/// Token lifecycle: anonymous until a login succeeds, back to anonymous
/// on logout, on a refresh failure following a 401, or on any 403. There
/// is no expiry timer; expiry is discovered when a request fails.
pub struct Auth {
    /// The base URL of the admin API
    url: String,

    /// HTTP client
    client: Client,

    /// Shared session state
    session: Arc<dyn SessionStore>,

    /// Client options
    options: ClientOptions,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(
        url: &str,
        client: Client,
        session: Arc<dyn SessionStore>,
        options: ClientOptions,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            session,
            options,
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth{}", self.url, path)
    }

    fn authed<'a>(&self, builder: FetchBuilder<'a>) -> FetchBuilder<'a> {
        match self.session.access_token() {
            Some(token) => builder.bearer_auth(&token),
            None => builder,
        }
    }

    /// Log in with username and password
    ///
    /// On success the token pair is stored and the identity snapshot is
    /// fetched and cached. When the response carries a 2FA challenge
    /// instead of tokens, the caller must complete
    /// [`tfa_verify`](Self::tfa_verify) and call `login` again.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<LoginResponse, Error> {
        let url = self.auth_url("/login");

        let mut builder =
            Fetch::post(&self.client, &url).form(&[("username", username), ("password", password)]);
        if remember {
            let mut query = HashMap::new();
            query.insert("remember".to_string(), "true".to_string());
            builder = builder.query(query);
        }

        let result = builder.execute::<LoginResponse>().await?;

        if let Some(ref access_token) = result.access_token {
            self.session.set_session(Session::new(
                access_token.clone(),
                result.refresh_token.clone(),
            ));
            // The snapshot fetch needs the new token; if it fails the
            // session is rolled back rather than left half-initialized.
            if let Err(err) = self.get_identity().await {
                self.session.clear();
                return Err(err);
            }
        }

        Ok(result)
    }

    /// Register a new account
    ///
    /// Confirmation mismatch is rejected locally, before any request.
    /// Depending on the verification setting the account may need email
    /// verification before it can log in.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), Error> {
        if password != confirm_password {
            return Err(Error::validation("Passwords do not match"));
        }

        let url = self.auth_url("/register");
        let response = Fetch::post(&self.client, &url)
            .json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "confirm_password": confirm_password,
            }))?
            .execute_raw()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::api(status, "Registration failed"));
        }

        Ok(())
    }

    /// Verify an email address with the token from the verification mail
    pub async fn verify_email(&self, token: &str) -> Result<ActionResponse, Error> {
        let url = self.auth_url("/verify_email");

        let mut query = HashMap::new();
        query.insert("token".to_string(), token.to_string());

        Fetch::get(&self.client, &url).query(query).execute().await
    }

    /// Log out and clear the session, even if the request fails
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.auth_url("/logout");

        let result = self.authed(Fetch::post(&self.client, &url)).execute_raw().await;
        self.session.clear();
        result?;

        Ok(())
    }

    /// Exchange the refresh token for a new access token
    pub async fn refresh(&self) -> Result<(), Error> {
        let url = self.auth_url("/refresh");

        let refresh_token = self
            .session
            .session()
            .and_then(|s| s.refresh_token)
            .ok_or_else(|| Error::auth("No refresh token"))?;

        let result = Fetch::post(&self.client, &url)
            .bearer_auth(&refresh_token)
            .execute::<RefreshResponse>()
            .await?;

        self.session.set_session(Session::new(
            result.access_token,
            result.refresh_token.or(Some(refresh_token)),
        ));

        Ok(())
    }

    /// Check whether the current session is still accepted by the backend
    pub async fn check_auth(&self) -> Result<(), Error> {
        let url = self.auth_url("/me");

        let response = self.authed(Fetch::get(&self.client, &url)).execute_raw().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::api(status, "Not authenticated"));
        }

        Ok(())
    }

    /// Fetch the identity and permissions snapshot and cache it for
    /// synchronous permission checks
    pub async fn get_identity(&self) -> Result<IdentitySnapshot, Error> {
        let url = self.auth_url("/me");

        let identity = self
            .authed(Fetch::get(&self.client, &url))
            .execute::<IdentitySnapshot>()
            .await?;

        self.session.set_identity(identity.clone());
        Ok(identity)
    }

    /// The authentication-error hook for failed requests
    ///
    /// A 401 triggers exactly one refresh attempt; if the refresh fails
    /// the session is cleared. Either way the caller still sees the
    /// rejection and retries on its own with the new token. A 403 is
    /// terminal: the session is cleared with no refresh attempt. Any
    /// other status is not an auth error.
    pub async fn check_error(&self, status: StatusCode) -> Result<(), Error> {
        match status {
            StatusCode::UNAUTHORIZED => {
                if !self.options.auto_refresh_token || self.refresh().await.is_err() {
                    self.session.clear();
                }
                Err(Error::api(status, "Authentication required"))
            }
            StatusCode::FORBIDDEN => {
                self.session.clear();
                Err(Error::api(status, "Access denied"))
            }
            _ => Ok(()),
        }
    }

    /// Ask the backend whether the current user may perform an action
    pub async fn can_access(&self, resource: &str, action: &str) -> Result<bool, Error> {
        let url = self.auth_url("/check");

        let mut query = HashMap::new();
        query.insert("resource".to_string(), resource.to_string());
        query.insert("action".to_string(), action.to_string());

        let result = self
            .authed(Fetch::get(&self.client, &url))
            .query(query)
            .execute::<AccessResponse>()
            .await?;

        Ok(result.access)
    }

    /// Synchronous permission check against the cached snapshot
    ///
    /// Permission format is `resource.action`; `*` grants everything,
    /// `resource.*` grants every action on a resource, and `auth.*` is
    /// implicit for any authenticated user. Returns `false` when no
    /// snapshot is cached.
    pub fn can_access_cached(&self, resource: &str, action: &str) -> bool {
        let Some(identity) = self.session.identity() else {
            return false;
        };

        if resource == "auth" {
            return true;
        }

        let required = format!("{}.{}", resource, action);
        let wildcard = format!("{}.*", resource);

        identity
            .permissions
            .iter()
            .any(|p| p == "*" || *p == wildcard || *p == required)
    }

    /// Begin 2FA setup for a delivery method
    pub async fn tfa_setup(&self, method: TfaMethod) -> Result<TfaSetupResponse, Error> {
        let url = self.auth_url(&format!("/tfa/setup/{}", method.as_str()));
        self.authed(Fetch::post(&self.client, &url)).execute().await
    }

    /// Re-send the email one-time code
    pub async fn tfa_send_email(&self) -> Result<TfaSetupResponse, Error> {
        let url = self.auth_url("/tfa/send_email");
        self.authed(Fetch::post(&self.client, &url)).execute().await
    }

    /// Verify a 2FA code during login or setup
    pub async fn tfa_verify(
        &self,
        method: TfaMethod,
        code: &str,
    ) -> Result<TfaVerificationResponse, Error> {
        let url = self.auth_url(&format!("/tfa/verify/{}", method.as_str()));

        let mut query = HashMap::new();
        query.insert("code".to_string(), code.to_string());

        self.authed(Fetch::post(&self.client, &url))
            .query(query)
            .execute()
            .await
    }

    /// Enable a verified 2FA method on the account
    pub async fn tfa_enable(&self, method: TfaMethod) -> Result<ActionResponse, Error> {
        let url = self.auth_url(&format!("/tfa/enable/{}", method.as_str()));
        self.authed(Fetch::post(&self.client, &url)).execute().await
    }

    /// Disable a 2FA method on the account
    pub async fn tfa_disable(&self, method: TfaMethod) -> Result<ActionResponse, Error> {
        let url = self.auth_url(&format!("/tfa/disable/{}", method.as_str()));
        self.authed(Fetch::post(&self.client, &url)).execute().await
    }

    /// Request a password reset email
    pub async fn forgot_password(&self, email: &str) -> Result<ActionResponse, Error> {
        let url = self.auth_url("/forgot_password");
        Fetch::post(&self.client, &url)
            .json(&json!({ "email": email }))?
            .execute()
            .await
    }

    /// Set a new password using the token from a forgot-password email
    ///
    /// The caller is not logged in here, so the token travels as a query
    /// parameter and no bearer header is attached. Confirmation mismatch
    /// is rejected locally, before any request.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<ActionResponse, Error> {
        if new_password != confirm_password {
            return Err(Error::validation("Passwords do not match"));
        }

        let url = self.auth_url("/reset_password");

        let mut query = HashMap::new();
        query.insert("token".to_string(), token.to_string());

        Fetch::post(&self.client, &url)
            .query(query)
            .json(&json!({
                "new_password": new_password,
                "confirm_password": confirm_password,
            }))?
            .execute()
            .await
    }

    /// Change the password of the logged-in user
    pub async fn update_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<ActionResponse, Error> {
        if new_password != confirm_password {
            return Err(Error::validation("Passwords do not match"));
        }

        let url = self.auth_url("/update_password");
        self.authed(Fetch::post(&self.client, &url))
            .json(&json!({
                "current_password": current_password,
                "new_password": new_password,
                "confirm_password": confirm_password,
            }))?
            .execute()
            .await
    }

    /// Generate a new API key for the logged-in user
    pub async fn generate_api_key(&self) -> Result<ApiKeyResponse, Error> {
        let url = self.auth_url("/generate_api_key");
        self.authed(Fetch::post(&self.client, &url)).execute().await
    }
}
