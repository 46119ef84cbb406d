//! # Session Repository
//!
//! The guest cart identity and the interface language.
//!
//! ## Guest Session Lifecycle
//! ```text
//! first cart call (anonymous)
//!      │
//!      ▼
//! guestSessionId stored? ── yes ──► reuse it
//!      │ no
//!      ▼
//! generate guest_{millis}_{base36×9}, store it
//!      │
//!      ▼
//! ... sign in ... POST /cart/merge ... clear_guest_session_id()
//! ```

use chrono::Utc;
use storefront_core::session::{generate_guest_id, is_guest_session_id};
use storefront_core::Language;
use tracing::{debug, info, warn};

use crate::error::DbResult;
use crate::keys;
use crate::repository::kv::KvRepository;

/// Repository for session-scoped values.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    kv: KvRepository,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(kv: KvRepository) -> Self {
        SessionRepository { kv }
    }

    /// The stored guest session id, if any.
    ///
    /// A stored value that isn't a guest id is ignored.
    pub async fn guest_session_id(&self) -> DbResult<Option<String>> {
        let stored = self.kv.get_raw(keys::GUEST_SESSION_ID).await?;
        Ok(stored.filter(|id| {
            let valid = is_guest_session_id(id);
            if !valid {
                warn!(value = %id, "Ignoring malformed guest session id");
            }
            valid
        }))
    }

    /// Returns the stored guest session id, generating and storing a new
    /// one first if needed.
    pub async fn get_or_create_guest_session_id(&self) -> DbResult<String> {
        if let Some(id) = self.guest_session_id().await? {
            debug!(session_id = %id, "Reusing guest session");
            return Ok(id);
        }

        let id = generate_guest_id(Utc::now(), &mut rand::thread_rng());
        self.kv.set_raw(keys::GUEST_SESSION_ID, &id).await?;
        info!(session_id = %id, "Created guest session");
        Ok(id)
    }

    /// Forgets the guest session id (after its cart was merged).
    pub async fn clear_guest_session_id(&self) -> DbResult<()> {
        self.kv.remove(keys::GUEST_SESSION_ID).await?;
        Ok(())
    }

    /// Stored interface language; English when unset or unrecognized.
    pub async fn language(&self) -> DbResult<Language> {
        let stored = self.kv.get_raw(keys::LANGUAGE).await?;
        Ok(stored
            .and_then(|code| code.parse().ok())
            .unwrap_or_default())
    }

    pub async fn set_language(&self, language: Language) -> DbResult<()> {
        self.kv.set_raw(keys::LANGUAGE, language.code()).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_guest_session_is_created_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = db.session();

        assert_eq!(session.guest_session_id().await.unwrap(), None);

        let first = session.get_or_create_guest_session_id().await.unwrap();
        let second = session.get_or_create_guest_session_id().await.unwrap();
        assert_eq!(first, second);
        assert!(is_guest_session_id(&first));
        assert_eq!(
            db.kv().get_raw(keys::GUEST_SESSION_ID).await.unwrap(),
            Some(first)
        );
    }

    #[tokio::test]
    async fn test_clear_guest_session() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = db.session();

        session.get_or_create_guest_session_id().await.unwrap();
        session.clear_guest_session_id().await.unwrap();
        assert_eq!(session.guest_session_id().await.unwrap(), None);

        let second = session.get_or_create_guest_session_id().await.unwrap();
        assert!(is_guest_session_id(&second));
    }

    #[tokio::test]
    async fn test_malformed_guest_id_is_replaced() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.kv().set_raw(keys::GUEST_SESSION_ID, "hello").await.unwrap();

        let id = db.session().get_or_create_guest_session_id().await.unwrap();
        assert_ne!(id, "hello");
        assert!(is_guest_session_id(&id));
    }

    #[tokio::test]
    async fn test_language_defaults_and_persists() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = db.session();

        assert_eq!(session.language().await.unwrap(), Language::En);
        session.set_language(Language::Vi).await.unwrap();
        assert_eq!(session.language().await.unwrap(), Language::Vi);

        db.kv().set_raw(keys::LANGUAGE, "klingon").await.unwrap();
        assert_eq!(session.language().await.unwrap(), Language::En);
    }
}
