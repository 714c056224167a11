//! Types for authentication flows

use serde::{Deserialize, Serialize};

/// Response from the login endpoint
///
/// Either a token pair, or a 2FA challenge when the account has a 2FA
/// method enabled (no session is established until the verify flow
/// completes and login is repeated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The access token, absent when 2FA is still pending
    pub access_token: Option<String>,

    /// The refresh token
    pub refresh_token: Option<String>,

    /// The token type
    pub token_type: Option<String>,

    /// Whether a 2FA verification is required before tokens are issued
    #[serde(default)]
    pub tfa_required: bool,

    /// The 2FA methods enabled on the account
    #[serde(default)]
    pub tfa_methods: Vec<String>,
}

/// Response from the token refresh endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: Option<String>,
}

/// Generic outcome payload used by password and 2FA management endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// Response from the permission check endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessResponse {
    pub access: bool,
}

/// Two-factor authentication delivery method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TfaMethod {
    Authenticator,
    Email,
}

impl TfaMethod {
    /// The path segment for this method
    pub fn as_str(&self) -> &'static str {
        match self {
            TfaMethod::Authenticator => "authenticator",
            TfaMethod::Email => "email",
        }
    }
}

/// Response from the 2FA setup endpoints
///
/// The authenticator variant returns a provisioning link; the email
/// variant reports whether the one-time code was sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfaSetupResponse {
    pub tfa_link: Option<String>,
    pub message: Option<String>,
    pub success: Option<bool>,
}

/// Response from the 2FA verify endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfaVerificationResponse {
    pub verified: bool,
    pub message: String,
}

/// Response from the API key generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyResponse {
    pub api_key: String,
}
