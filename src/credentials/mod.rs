//! Credential issuance and verification flows.
//!
//! [`CredentialService`] orchestrates the three operations of the auth
//! sequence: signup (hash password, mint OTP secret, persist, hand back
//! enrollment material), login (password check, first factor), and OTP
//! verification (second factor). It holds no per-flow state; the caller
//! tracks where it is in the sequence.

pub mod config;
pub mod error;
pub mod rate_limit;

pub use config::AuthConfig;
pub use error::AuthError;
pub use rate_limit::{NoopRateLimiter, RateLimitAction, RateLimitDecision, RateLimiter};

use crate::password::{PasswordError, PasswordHasher};
use crate::store::{NewPrincipal, Principal, SecretStore};
use crate::totp::{OtpSecret, TotpEngine};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

/// Identity fields safe to hand to callers and to persist in client
/// sessions. Never carries the password hash or the OTP secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalInfo {
    pub name: String,
    pub email: String,
}

impl From<&Principal> for PrincipalInfo {
    fn from(principal: &Principal) -> Self {
        Self {
            name: principal.display_name.clone(),
            email: principal.email.clone(),
        }
    }
}

/// What signup hands back for enrollment: the secret in base32 and the
/// `otpauth://` URI an authenticator app can scan.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentMaterial {
    pub secret_base32: String,
    pub provisioning_uri: String,
}

/// Successful password check. The flow is not authenticated yet; the
/// caller must follow up with [`CredentialService::verify_otp`].
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub principal: PrincipalInfo,
    pub requires_otp: bool,
}

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Emails are compared case-insensitively everywhere; normalize once at
/// the boundary so the store only ever sees one spelling.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn SecretStore>,
    hasher: PasswordHasher,
    totp: TotpEngine,
    rate_limiter: Arc<dyn RateLimiter>,
    dummy_hash: String,
}

impl CredentialService {
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the password hasher cannot
    /// produce the throwaway hash used to equalize lookup timing.
    pub fn new(store: Arc<dyn SecretStore>, config: &AuthConfig) -> Result<Self, AuthError> {
        let hasher = PasswordHasher;

        let totp = TotpEngine::new(config.issuer())
            .with_digits(config.otp_digits())
            .with_step_seconds(config.otp_step_seconds())
            .with_window(config.otp_window());

        // Hashing a throwaway value up front lets lookups that miss still
        // run a full verification, so unknown emails cost the same as
        // known ones.
        let dummy_hash = hasher
            .hash(&OtpSecret::generate().to_base32())
            .map_err(|err| AuthError::Internal(err.to_string()))?;

        Ok(Self {
            store,
            hasher,
            totp,
            rate_limiter: Arc::new(NoopRateLimiter),
            dummy_hash,
        })
    }

    #[must_use]
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Registers a principal and returns their enrollment material.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for empty or malformed fields,
    /// [`AuthError::DuplicateEmail`] if the email is taken,
    /// [`AuthError::RateLimited`] or [`AuthError::StorageUnavailable`]
    /// from the respective collaborators.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<EnrollmentMaterial, AuthError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(AuthError::Validation("name must not be empty"));
        }

        let email = normalize_email(email);

        if email.is_empty() {
            return Err(AuthError::Validation("email must not be empty"));
        }

        if !valid_email(&email) {
            return Err(AuthError::Validation("email must be a valid address"));
        }

        if password.is_empty() {
            return Err(AuthError::Validation("password must not be empty"));
        }

        if self.rate_limiter.check_email(&email, RateLimitAction::Signup)
            == RateLimitDecision::Limited
        {
            return Err(AuthError::RateLimited);
        }

        let password_hash = self.hasher.hash(password).map_err(|err| match err {
            PasswordError::Empty => AuthError::Validation("password must not be empty"),
            PasswordError::Hash(msg) => AuthError::Internal(msg),
        })?;

        let otp_secret = OtpSecret::generate();

        let principal = self
            .store
            .create(NewPrincipal {
                display_name: name.to_string(),
                email,
                password_hash,
                otp_secret,
            })
            .await?;

        debug!("Principal created: {}", principal.id);

        Ok(EnrollmentMaterial {
            secret_base32: principal.otp_secret.to_base32(),
            provisioning_uri: self
                .totp
                .provisioning_uri(&principal.otp_secret, &principal.email),
        })
    }

    /// First factor: password verification.
    ///
    /// Unknown email and wrong password fail identically, and the unknown
    /// path still pays for a full hash verification.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] on any mismatch,
    /// [`AuthError::RateLimited`] or [`AuthError::StorageUnavailable`]
    /// from the respective collaborators.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let email = normalize_email(email);

        if self.rate_limiter.check_email(&email, RateLimitAction::Login)
            == RateLimitDecision::Limited
        {
            return Err(AuthError::RateLimited);
        }

        let Some(principal) = self.store.find_by_email(&email).await? else {
            let _ = self.hasher.verify(password, &self.dummy_hash);

            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &principal.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        debug!("Password verified: {}", principal.id);

        Ok(LoginOutcome {
            principal: PrincipalInfo::from(&principal),
            requires_otp: true,
        })
    }

    /// Second factor: checks the submitted code against the principal's
    /// secret at server time. A failed code leaves the secret valid; the
    /// caller may re-prompt.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidOtp`] on any mismatch (including unknown
    /// email), [`AuthError::RateLimited`] or
    /// [`AuthError::StorageUnavailable`] from the respective
    /// collaborators.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<PrincipalInfo, AuthError> {
        let email = normalize_email(email);

        if self
            .rate_limiter
            .check_email(&email, RateLimitAction::VerifyOtp)
            == RateLimitDecision::Limited
        {
            return Err(AuthError::RateLimited);
        }

        let Some(principal) = self.store.find_by_email(&email).await? else {
            return Err(AuthError::InvalidOtp);
        };

        if !self
            .totp
            .verify(&principal.otp_secret, code, TotpEngine::unix_now())
        {
            return Err(AuthError::InvalidOtp);
        }

        debug!("OTP verified: {}", principal.id);

        Ok(PrincipalInfo::from(&principal))
    }

    /// Storage connectivity probe for health reporting.
    ///
    /// # Errors
    ///
    /// [`AuthError::StorageUnavailable`] when the store cannot be reached.
    pub async fn ping_store(&self) -> Result<(), AuthError> {
        Ok(self.store.ping().await?)
    }
}
