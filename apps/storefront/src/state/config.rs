//! # Configuration State
//!
//! Holds the `StorefrontConfig` loaded at startup and answers the two
//! questions every command asks of it: who is the cart for, and how is a
//! price shown.
//!
//! ## Session Resolution
//! ```text
//! auth.user_id set? ──yes──► SessionIdentity::User(id)      "user_7"
//!        │
//!        no
//!        ▼
//! guestSessionId in local store (created on first use)
//!                  ──────► SessionIdentity::Guest(id)       "guest_1717..._k3j..."
//! ```
//!
//! Read-only after startup, so no mutex.

use storefront_client::StorefrontConfig;
use storefront_core::session::SessionIdentity;
use storefront_core::Language;
use tracing::debug;

use crate::error::AppResult;
use crate::state::DbState;

/// Application configuration for commands.
#[derive(Debug, Clone, Default)]
pub struct ConfigState {
    config: StorefrontConfig,
}

impl ConfigState {
    pub fn new(config: StorefrontConfig) -> Self {
        ConfigState { config }
    }

    pub fn inner(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Cart identity for this run.
    pub async fn session(&self, db: &DbState) -> AppResult<SessionIdentity> {
        if let Some(user_id) = self.config.auth.user_id {
            return Ok(SessionIdentity::User(user_id));
        }
        let guest_id = db.inner().session().get_or_create_guest_session_id().await?;
        debug!(%guest_id, "Using guest session");
        Ok(SessionIdentity::Guest(guest_id))
    }

    /// Interface language: the configured one, else the stored choice.
    pub async fn language(&self, db: &DbState) -> AppResult<Language> {
        match self.config.display.language {
            Some(language) => Ok(language),
            None => Ok(db.inner().session().language().await?),
        }
    }

    /// Formats an amount with the configured currency.
    pub fn price(&self, amount: f64) -> String {
        self.config.display.format_price(amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::session::is_guest_session_id;
    use storefront_db::{Database, DbConfig};

    async fn db() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_signed_in_user_keys_cart_by_user() {
        let mut config = StorefrontConfig::default();
        config.auth.user_id = Some(7);
        config.auth.token = Some("t".into());

        let session = ConfigState::new(config).session(&db().await).await.unwrap();
        assert_eq!(session.session_id(), "user_7");
    }

    #[tokio::test]
    async fn test_guest_session_is_stable() {
        let db = db().await;
        let state = ConfigState::default();

        let first = state.session(&db).await.unwrap();
        let second = state.session(&db).await.unwrap();
        assert!(first.is_guest());
        assert!(is_guest_session_id(&first.session_id()));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_configured_language_wins() {
        let db = db().await;
        db.inner().session().set_language(Language::En).await.unwrap();

        let mut config = StorefrontConfig::default();
        config.display.language = Some(Language::Vi);
        assert_eq!(ConfigState::new(config).language(&db).await.unwrap(), Language::Vi);
        assert_eq!(ConfigState::default().language(&db).await.unwrap(), Language::En);
    }
}
