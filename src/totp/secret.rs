use crate::totp::TotpError;
use data_encoding::BASE32_NOPAD;
use rand::{rngs::OsRng, RngCore};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Generated secret length in bytes (160 bits).
pub const SECRET_LEN: usize = 20;

/// Shortest secret accepted when decoding stored material (128 bits).
const MIN_SECRET_LEN: usize = 16;

/// Raw TOTP secret. Zeroed on drop, redacted in `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct OtpSecret(Vec<u8>);

impl OtpSecret {
    /// New random secret from the OS RNG, [`SECRET_LEN`] bytes.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; SECRET_LEN];
        OsRng.fill_bytes(&mut bytes);

        Self(bytes)
    }

    /// Wrap raw bytes, rejecting keys shorter than 128 bits.
    ///
    /// # Errors
    ///
    /// Returns [`TotpError::InvalidSecret`] if the key is too short.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, TotpError> {
        if bytes.len() < MIN_SECRET_LEN {
            return Err(TotpError::InvalidSecret);
        }

        Ok(Self(bytes))
    }

    /// Decode a base32 secret as stored or as typed by a user: case,
    /// surrounding whitespace, inner spaces, and trailing padding are all
    /// tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`TotpError::InvalidSecret`] if the input is not base32 or
    /// decodes to fewer than 128 bits.
    pub fn from_base32(encoded: &str) -> Result<Self, TotpError> {
        let clean = encoded
            .trim()
            .trim_end_matches('=')
            .replace(' ', "")
            .to_ascii_uppercase();

        let bytes = BASE32_NOPAD
            .decode(clean.as_bytes())
            .map_err(|_| TotpError::InvalidSecret)?;

        Self::from_bytes(bytes)
    }

    /// Base32 (RFC 4648, no padding) encoding for storage and enrollment.
    #[must_use]
    pub fn to_base32(&self) -> String {
        BASE32_NOPAD.encode(&self.0)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for OtpSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpSecret(..)")
    }
}
