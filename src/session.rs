//! Session state shared by every outgoing request
//!
//! Auth state is an explicit object injected into the client at
//! construction rather than ambient global storage: tests use
//! [`MemorySessionStore`], applications can back the trait with whatever
//! persistence they have.

use serde::{Deserialize, Serialize};

/// Session data held while a user is authenticated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The access token sent as a bearer on every request
    pub access_token: String,

    /// The refresh token presented to the refresh endpoint
    pub refresh_token: Option<String>,

    /// The token type
    pub token_type: String,
}

impl Session {
    /// Create a new bearer session
    pub fn new(access_token: String, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Identity and permissions snapshot returned by `/auth/me`
///
/// Persisted after login so permission checks do not hit the network on
/// every render; trusted until the next login or refresh cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Storage for the session and identity snapshot
///
/// Implementations must be safe to share across concurrent requests. No
/// lock is held across a request: a logout racing an in-flight call can
/// send a token that is cleared immediately after, which the backend
/// rejects on its own.
pub trait SessionStore: Send + Sync {
    /// The current session, if any
    fn session(&self) -> Option<Session>;

    /// Replace the current session
    fn set_session(&self, session: Session);

    /// The cached identity snapshot, if any
    fn identity(&self) -> Option<IdentitySnapshot>;

    /// Replace the cached identity snapshot
    fn set_identity(&self, identity: IdentitySnapshot);

    /// Clear the session and identity snapshot (logout state)
    fn clear(&self);

    /// The current access token, if any
    fn access_token(&self) -> Option<String> {
        self.session().map(|s| s.access_token)
    }
}

/// In-memory session store
#[derive(Default)]
pub struct MemorySessionStore {
    inner: std::sync::Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    session: Option<Session>,
    identity: Option<IdentitySnapshot>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn session(&self) -> Option<Session> {
        self.inner.lock().unwrap().session.clone()
    }

    fn set_session(&self, session: Session) {
        self.inner.lock().unwrap().session = Some(session);
    }

    fn identity(&self) -> Option<IdentitySnapshot> {
        self.inner.lock().unwrap().identity.clone()
    }

    fn set_identity(&self, identity: IdentitySnapshot) {
        self.inner.lock().unwrap().identity = Some(identity);
    }

    fn clear(&self) {
        let mut state = self.inner.lock().unwrap();
        state.session = None;
        state.identity = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_lifecycle() {
        let store = MemorySessionStore::new();
        assert!(store.session().is_none());
        assert!(store.access_token().is_none());

        store.set_session(Session::new("tok".into(), Some("refresh".into())));
        assert_eq!(store.access_token().as_deref(), Some("tok"));
        assert_eq!(
            store.session().unwrap().refresh_token.as_deref(),
            Some("refresh")
        );

        store.set_identity(IdentitySnapshot {
            id: 1,
            name: Some("Admin".into()),
            email: "admin@example.com".into(),
            role: Some("admin".into()),
            permissions: vec!["branches.*".into()],
        });
        assert!(store.identity().is_some());

        store.clear();
        assert!(store.session().is_none());
        assert!(store.identity().is_none());
    }
}
