//! TOTP engine: secret generation, code derivation, and windowed
//! verification (RFC 6238, HMAC-SHA1).
//!
//! Verification recomputes codes from (secret, counter) instead of storing
//! them; the same inputs always yield the same code.

pub mod secret;

pub use secret::OtpSecret;

use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use totp_rs::{Algorithm, TOTP};

pub const DEFAULT_DIGITS: usize = 6;
pub const DEFAULT_STEP_SECONDS: u64 = 30;
pub const DEFAULT_WINDOW: u8 = 1;

#[derive(Debug, Error)]
pub enum TotpError {
    #[error("invalid secret encoding")]
    InvalidSecret,

    #[error("totp init: {0}")]
    Init(String),
}

/// Derives and verifies time-based one-time codes for a fixed issuer and
/// tolerance window.
#[derive(Debug, Clone)]
pub struct TotpEngine {
    issuer: String,
    digits: usize,
    step_seconds: u64,
    window: u8,
}

impl TotpEngine {
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            digits: DEFAULT_DIGITS,
            step_seconds: DEFAULT_STEP_SECONDS,
            window: DEFAULT_WINDOW,
        }
    }

    #[must_use]
    pub fn with_digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    #[must_use]
    pub fn with_step_seconds(mut self, step_seconds: u64) -> Self {
        // a zero step would make the counter undefined
        self.step_seconds = step_seconds.max(1);
        self
    }

    /// Accepted skew in steps on each side of the current counter.
    #[must_use]
    pub fn with_window(mut self, window: u8) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn digits(&self) -> usize {
        self.digits
    }

    #[must_use]
    pub fn step_seconds(&self) -> u64 {
        self.step_seconds
    }

    #[must_use]
    pub fn window(&self) -> u8 {
        self.window
    }

    fn totp(&self, secret: &OtpSecret, account: &str, skew: u8) -> Result<TOTP, TotpError> {
        TOTP::new(
            Algorithm::SHA1,
            self.digits,
            skew,
            self.step_seconds,
            secret.as_bytes().to_vec(),
            Some(self.issuer.clone()),
            account.to_string(),
        )
        .map_err(|e| TotpError::Init(e.to_string()))
    }

    /// Code for the counter containing `time` (seconds since the Unix epoch):
    /// `counter = floor(time / step)`, HMAC-SHA1 over the big-endian counter,
    /// dynamic-offset truncation to `digits` decimal digits, zero-padded.
    ///
    /// # Errors
    ///
    /// Returns [`TotpError::Init`] if the engine parameters are rejected
    /// (for example an issuer containing `:`).
    pub fn current_code(&self, secret: &OtpSecret, time: u64) -> Result<String, TotpError> {
        // label doesn't matter for code derivation
        Ok(self.totp(secret, "user", 0)?.generate(time))
    }

    /// Whether `submitted` matches the code of any counter in
    /// `[current - window, current + window]` at `time`.
    ///
    /// Fails closed: empty, wrong-length, or non-digit submissions never
    /// match, and neither do times too close to the epoch for the window to
    /// apply. Candidate comparison is constant-time.
    #[must_use]
    pub fn verify(&self, secret: &OtpSecret, submitted: &str, time: u64) -> bool {
        if submitted.len() != self.digits || !submitted.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }

        // counters this early would underflow the skew sweep
        if time / self.step_seconds < u64::from(self.window) {
            return false;
        }

        self.totp(secret, "user", self.window)
            .map_or(false, |totp| totp.check(submitted, time))
    }

    /// Enrollment URI for authenticator apps:
    /// `otpauth://totp/{issuer}:{account}?secret=...&issuer=...&algorithm=SHA1&digits=...&period=...`
    #[must_use]
    pub fn provisioning_uri(&self, secret: &OtpSecret, account: &str) -> String {
        format!(
            "otpauth://totp/{}:{}?secret={}&issuer={}&algorithm=SHA1&digits={}&period={}",
            self.issuer,
            account,
            secret.to_base32(),
            self.issuer,
            self.digits,
            self.step_seconds
        )
    }

    /// Current Unix time in seconds; a clock before the epoch reads as 0,
    /// which verifies nothing.
    #[must_use]
    pub fn unix_now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs())
    }
}
