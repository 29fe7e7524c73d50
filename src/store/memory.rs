//! In-memory principal storage for development and tests.

use super::{NewPrincipal, Principal, SecretStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// `HashMap` keyed by normalized email. The uniqueness check and the insert
/// happen under a single lock acquisition, mirroring the database constraint.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    principals: Mutex<HashMap<String, Principal>>,
}

impl MemorySecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn create(&self, principal: NewPrincipal) -> Result<Principal, StoreError> {
        let mut principals = self.principals.lock().await;

        if principals.contains_key(&principal.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let email = principal.email.clone();

        let created = Principal {
            id: Uuid::new_v4(),
            display_name: principal.display_name,
            email: principal.email,
            password_hash: principal.password_hash,
            otp_secret: principal.otp_secret,
            created_at: Utc::now(),
        };

        principals.insert(email, created.clone());

        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError> {
        Ok(self.principals.lock().await.get(email).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::totp::OtpSecret;
    use std::sync::Arc;

    fn new_principal(email: &str) -> NewPrincipal {
        NewPrincipal {
            display_name: "Ann".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            otp_secret: OtpSecret::generate(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_round_trip() {
        let store = MemorySecretStore::new();

        let created = store
            .create(new_principal("ann@example.com"))
            .await
            .unwrap();

        let found = store
            .find_by_email("ann@example.com")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.email, "ann@example.com");
        assert_eq!(
            found.otp_secret.as_bytes(),
            created.otp_secret.as_bytes()
        );
    }

    #[tokio::test]
    async fn test_find_unknown_email_is_none() {
        let store = MemorySecretStore::new();

        assert!(store.find_by_email("ghost@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemorySecretStore::new();

        store
            .create(new_principal("ann@example.com"))
            .await
            .unwrap();

        let err = store
            .create(new_principal("ann@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_concurrent_creates_yield_one_winner() {
        let store = Arc::new(MemorySecretStore::new());

        let (a, b) = tokio::join!(
            store.create(new_principal("race@example.com")),
            store.create(new_principal("race@example.com"))
        );

        let successes = usize::from(a.is_ok()) + usize::from(b.is_ok());

        assert_eq!(successes, 1);

        let loser = if a.is_err() { a } else { b };

        assert!(matches!(loser, Err(StoreError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_ping_always_succeeds() {
        assert!(MemorySecretStore::new().ping().await.is_ok());
    }
}
