//! Auth configuration.

use crate::totp::{DEFAULT_DIGITS, DEFAULT_STEP_SECONDS, DEFAULT_WINDOW};

const DEFAULT_ISSUER: &str = "sesamo";

/// Knobs for the credential flows. Defaults match what authenticator apps
/// expect (SHA-1, 6 digits, 30 second steps, one step of clock tolerance).
#[derive(Clone, Debug)]
pub struct AuthConfig {
    issuer: String,
    otp_digits: usize,
    otp_step_seconds: u64,
    otp_window: u8,
}

impl AuthConfig {
    #[must_use]
    pub fn new(issuer: String) -> Self {
        Self {
            issuer,
            otp_digits: DEFAULT_DIGITS,
            otp_step_seconds: DEFAULT_STEP_SECONDS,
            otp_window: DEFAULT_WINDOW,
        }
    }

    #[must_use]
    pub fn with_otp_digits(mut self, digits: usize) -> Self {
        self.otp_digits = digits;
        self
    }

    #[must_use]
    pub fn with_otp_step_seconds(mut self, seconds: u64) -> Self {
        self.otp_step_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_otp_window(mut self, window: u8) -> Self {
        self.otp_window = window;
        self
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn otp_digits(&self) -> usize {
        self.otp_digits
    }

    #[must_use]
    pub fn otp_step_seconds(&self) -> u64 {
        self.otp_step_seconds
    }

    #[must_use]
    pub fn otp_window(&self) -> u8 {
        self.otp_window
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ISSUER.to_string())
    }
}
