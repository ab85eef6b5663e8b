//! Opaque-token sessions for users and admins.
//!
//! A session is a JSON payload stored under `{prefix}{kind}:{token}` with an
//! absolute expiry set at creation. Reads never extend it. The token is the
//! only thing handed to the client.

use std::sync::Arc;
use std::time::Duration;

use kxl_cache::keys::sessions;
use kxl_cache::{CacheError, KeyValueStore};
use kxl_config::SessionConfig;
use kxl_models::{AdminId, UserId};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Random bytes per token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Stored user session. Fields default so a payload missing them still
/// parses and is rejected by the authenticator instead of the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_session_version: i32,
}

/// Stored admin session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    #[serde(default)]
    pub admin_id: String,
}

/// Hex-encoded token from the OS RNG.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
    user_ttl: Duration,
    admin_ttl: Duration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("prefix", &self.prefix)
            .field("user_ttl", &self.user_ttl)
            .field("admin_ttl", &self.admin_ttl)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            prefix: config.prefix.clone(),
            user_ttl: config.user_ttl(),
            admin_ttl: config.admin_ttl(),
        }
    }

    #[must_use]
    pub fn user_ttl(&self) -> Duration {
        self.user_ttl
    }

    #[must_use]
    pub fn admin_ttl(&self) -> Duration {
        self.admin_ttl
    }

    pub fn user_key(&self, token: &str) -> String {
        sessions::user(&self.prefix, token)
    }

    pub fn admin_key(&self, token: &str) -> String {
        sessions::admin(&self.prefix, token)
    }

    /// Stores a new user session and returns its token.
    #[instrument(skip(self), fields(user.id = %user_id))]
    pub async fn create_user_session(
        &self,
        user_id: UserId,
        session_version: i32,
    ) -> Result<String, CacheError> {
        let token = generate_token();
        let payload = serde_json::to_string(&UserSession {
            user_id: user_id.to_string(),
            user_session_version: session_version,
        })?;
        self.store
            .set_ex(&self.user_key(&token), &payload, self.user_ttl)
            .await?;
        debug!("User session created");
        Ok(token)
    }

    /// Raw lookup. A payload that is not JSON fails with
    /// `CacheError::Serialization`; validity checks are the caller's job.
    pub async fn get_user_session(&self, token: &str) -> Result<Option<UserSession>, CacheError> {
        match self.store.get(&self.user_key(token)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn delete_user_session(&self, token: &str) -> Result<(), CacheError> {
        self.store.del(&self.user_key(token)).await
    }

    #[instrument(skip(self), fields(admin.id = %admin_id))]
    pub async fn create_admin_session(&self, admin_id: AdminId) -> Result<String, CacheError> {
        let token = generate_token();
        let payload = serde_json::to_string(&AdminSession {
            admin_id: admin_id.to_string(),
        })?;
        self.store
            .set_ex(&self.admin_key(&token), &payload, self.admin_ttl)
            .await?;
        debug!("Admin session created");
        Ok(token)
    }

    pub async fn get_admin_session(&self, token: &str) -> Result<Option<AdminSession>, CacheError> {
        match self.store.get(&self.admin_key(token)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn delete_admin_session(&self, token: &str) -> Result<(), CacheError> {
        self.store.del(&self.admin_key(token)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kxl_cache::MemoryStore;

    fn store() -> (MemoryStore, SessionStore) {
        let memory = MemoryStore::new();
        let sessions = SessionStore::new(Arc::new(memory.clone()), &SessionConfig::default());
        (memory, sessions)
    }

    #[test]
    fn test_tokens_are_long_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_user_session_round_trip() {
        let (memory, sessions) = store();
        let user_id = UserId::new();

        let token = sessions.create_user_session(user_id, 4).await.unwrap();
        let session = sessions.get_user_session(&token).await.unwrap().unwrap();
        assert_eq!(session.user_id, user_id.to_string());
        assert_eq!(session.user_session_version, 4);

        let ttl = memory.ttl(&sessions.user_key(&token)).unwrap();
        assert!(ttl <= Duration::from_secs(604_800));
        assert!(ttl > Duration::from_secs(604_000));

        sessions.delete_user_session(&token).await.unwrap();
        assert!(sessions.get_user_session(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_admin_session_round_trip() {
        let (memory, sessions) = store();
        let admin_id = AdminId::new();

        let token = sessions.create_admin_session(admin_id).await.unwrap();
        assert!(memory.contains(&format!("kxl_session:admin:{token}")));
        let session = sessions.get_admin_session(&token).await.unwrap().unwrap();
        assert_eq!(session.admin_id, admin_id.to_string());
        assert!(memory.ttl(&sessions.admin_key(&token)).unwrap() <= Duration::from_secs(7_200));

        sessions.delete_admin_session(&token).await.unwrap();
        assert!(sessions.get_admin_session(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_kinds_do_not_share_tokens() {
        let (_, sessions) = store();
        let token = sessions.create_user_session(UserId::new(), 0).await.unwrap();
        assert!(sessions.get_admin_session(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let (_, sessions) = store();
        sessions.delete_user_session("nope").await.unwrap();
        sessions.delete_admin_session("nope").await.unwrap();
    }

    #[tokio::test]
    async fn test_backend_outage_is_an_error() {
        let (memory, sessions) = store();
        memory.set_unavailable(true);
        assert!(sessions.get_user_session("t").await.is_err());
        assert!(sessions.create_admin_session(AdminId::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_fields_default() {
        let (memory, sessions) = store();
        memory.insert_raw(&sessions.user_key("t"), "{}");
        let session = sessions.get_user_session("t").await.unwrap().unwrap();
        assert!(session.user_id.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_payload_is_serialization_error() {
        let (memory, sessions) = store();
        memory.insert_raw(&sessions.user_key("t"), "not json");
        let err = sessions.get_user_session("t").await.unwrap_err();
        assert!(matches!(err, CacheError::Serialization(_)));
    }
}
