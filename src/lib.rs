//! # Sesamo (Credential Issuance & Multi-Factor Verification)
//!
//! `sesamo` issues credentials and verifies them in two factors: a user signs
//! up with a password, receives a TOTP secret as a scannable provisioning
//! URI, and must later present both the password and a freshly generated
//! one-time code to become authenticated.
//!
//! ## Signup & Enrollment
//!
//! Passwords are hashed with `Argon2id` (PHC string encoding, fresh salt per
//! hash). The OTP secret is 160 random bits, generated exactly once at signup
//! and returned as enrollment material (base32 secret + `otpauth://` URI);
//! it is never regenerated implicitly.
//!
//! ## Login Flow
//!
//! - **Password step:** unknown email and wrong password are deliberately
//!   indistinguishable (`InvalidCredentials` both ways), and unknown emails
//!   still run a dummy verification so both paths do comparable work.
//! - **OTP step:** codes are checked against a rolling time window
//!   (6 digits / 30 s step / ±1 step by default) with server-side time.
//!
//! ## Storage & Sessions
//!
//! Principals live behind the [`store::SecretStore`] trait: Postgres in
//! production, in-memory for development and tests. The client-held
//! [`session::SessionState`] persists only `{name, email}` to durable local
//! storage; secrets never leave the store.

pub mod api;
pub mod cli;
pub mod credentials;
pub mod password;
pub mod session;
pub mod store;
pub mod totp;
