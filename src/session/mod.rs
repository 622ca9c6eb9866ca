pub mod profile;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::api::ApiClient;
use crate::storage::{KeyValueStore, MemoryStore, AUTH_KEY};
use crate::utils::{require_field, CareerLensResult};

pub use profile::{completeness, ProfileSummary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    /// Not returned by the server; kept from what the user typed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

impl AuthSession {
    fn from_login(response: LoginResponse, email: &str) -> Self {
        Self {
            user: AuthUser {
                id: response.id,
                name: response.name,
                email: Some(email.to_string()),
            },
            token: response.token,
        }
    }
}

/// Persists the signed-in session as JSON under a fixed key.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// An unreadable stored session counts as signed out.
    pub async fn load(&self) -> CareerLensResult<Option<AuthSession>> {
        let Some(raw) = self.store.get(AUTH_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Ignoring unreadable stored session: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn save(&self, session: &AuthSession) -> CareerLensResult<()> {
        let raw = serde_json::to_string(session)?;
        self.store.set(AUTH_KEY, &raw).await
    }

    pub async fn clear(&self) -> CareerLensResult<()> {
        self.store.remove(AUTH_KEY).await
    }

    /// Bearer token for outgoing requests. Storage failures mean no token.
    pub async fn token(&self) -> Option<String> {
        match self.load().await {
            Ok(session) => session.map(|s| s.token).filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Could not read stored session: {}", e);
                None
            }
        }
    }
}

pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn current(&self) -> CareerLensResult<Option<AuthSession>> {
        self.api.sessions().load().await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> CareerLensResult<AuthSession> {
        require_field("email", email)?;
        require_field("password", password)?;

        let response = self.api.auth().login(&LoginRequest { email, password }).await?;
        self.persist(AuthSession::from_login(response, email)).await
    }

    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> CareerLensResult<AuthSession> {
        require_field("name", name)?;
        require_field("email", email)?;
        require_field("password", password)?;

        let response = self
            .api
            .auth()
            .register(&RegisterRequest { name, email, password })
            .await?;
        self.persist(AuthSession::from_login(response, email)).await
    }

    pub async fn sign_out(&self) -> CareerLensResult<()> {
        self.api.sessions().clear().await?;
        info!("Signed out");
        Ok(())
    }

    async fn persist(&self, session: AuthSession) -> CareerLensResult<AuthSession> {
        self.api.sessions().save(&session).await?;
        info!("Signed in as {} (#{})", session.user.name, session.user.id);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeApi;
    use crate::utils::CareerLensError;

    #[tokio::test]
    async fn test_sign_in_persists_session_and_token_follows() {
        let fake = FakeApi::start().await;
        let client = fake.client();
        let auth = AuthService::new(client.clone());

        let session = auth.sign_in("ana@example.com", FakeApi::PASSWORD).await.unwrap();
        assert_eq!(session.user.email.as_deref(), Some("ana@example.com"));
        assert_eq!(auth.current().await.unwrap(), Some(session));

        client.resumes().list().await;
        assert_eq!(
            fake.resume_list_auth_headers(),
            vec![Some(format!("Bearer {}", FakeApi::TOKEN))]
        );

        auth.sign_out().await.unwrap();
        assert_eq!(auth.current().await.unwrap(), None);

        client.resumes().list().await;
        assert_eq!(fake.resume_list_auth_headers().last(), Some(&None));
    }

    #[tokio::test]
    async fn test_sign_up_keeps_typed_email() {
        let fake = FakeApi::start().await;
        let auth = AuthService::new(fake.client());

        let session = auth
            .sign_up("Bruno", "bruno@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(session.user.name, "Bruno");
        assert_eq!(session.user.email.as_deref(), Some("bruno@example.com"));
    }

    #[tokio::test]
    async fn test_blank_fields_never_reach_server() {
        let fake = FakeApi::start().await;
        let auth = AuthService::new(fake.client());

        let err = auth.sign_in("", "secret").await.unwrap_err();
        assert!(matches!(err, CareerLensError::Validation(_)));
        let err = auth.sign_up("Bruno", "bruno@example.com", "").await.unwrap_err();
        assert!(matches!(err, CareerLensError::Validation(_)));
        assert_eq!(fake.auth_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_sign_in_leaves_no_session() {
        let fake = FakeApi::start().await;
        let auth = AuthService::new(fake.client());

        assert!(auth.sign_in("ana@example.com", "wrong").await.is_err());
        assert_eq!(auth.current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unreadable_session_counts_as_signed_out() {
        let store = Arc::new(MemoryStore::new());
        store.set(AUTH_KEY, "not json").await.unwrap();
        let sessions = SessionStore::new(store);

        assert_eq!(sessions.load().await.unwrap(), None);
        assert_eq!(sessions.token().await, None);
    }
}
