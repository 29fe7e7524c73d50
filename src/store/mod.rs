//! Durable principal storage.
//!
//! The store is the only component with durable state and the only place
//! email uniqueness is enforced. Principals are created once at signup;
//! no update or delete operations exist.

pub mod memory;
pub mod postgres;

pub use memory::MemorySecretStore;
pub use postgres::PgSecretStore;

use crate::totp::OtpSecret;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A registered identity.
#[derive(Clone)]
pub struct Principal {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub otp_secret: OtpSecret,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for Principal {
    // keep the password hash out of logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("otp_secret", &self.otp_secret)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Fields supplied at signup; the store assigns `id` and `created_at`.
/// The email arrives already normalized (trimmed, lowercased).
#[derive(Clone)]
pub struct NewPrincipal {
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub otp_secret: OtpSecret,
}

impl fmt::Debug for NewPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPrincipal")
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("otp_secret", &self.otp_secret)
            .finish()
    }
}

#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Atomic check-then-insert. Uniqueness must be enforced by the store
    /// itself, never by a prior read: two concurrent creates with the same
    /// email yield exactly one success and one [`StoreError::DuplicateEmail`].
    async fn create(&self, principal: NewPrincipal) -> Result<Principal, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError>;

    /// Connectivity probe for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;
}
