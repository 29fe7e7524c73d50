//! Postgres-backed principal storage.

use super::{NewPrincipal, Principal, SecretStore, StoreError};
use crate::totp::OtpSecret;
use async_trait::async_trait;
use sqlx::{postgres::PgRow, Connection, PgPool, Row};
use tracing::{error, info_span, instrument, Instrument};

#[derive(Debug, Clone)]
pub struct PgSecretStore {
    pool: PgPool,
}

impl PgSecretStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// SQLSTATE 23505, the Postgres code for a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().is_some_and(|code| code.as_ref() == "23505");
    }

    false
}

fn principal_from_row(row: &PgRow) -> Result<Principal, StoreError> {
    let secret_base32: String = row.get("otp_secret");

    let otp_secret = OtpSecret::from_base32(&secret_base32).map_err(|err| {
        error!("Stored OTP secret failed to decode: {}", err);
        StoreError::Unavailable("stored OTP secret is corrupt".to_string())
    })?;

    Ok(Principal {
        id: row.get("id"),
        display_name: row.get("display_name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        otp_secret,
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl SecretStore for PgSecretStore {
    #[instrument(skip(self, principal))]
    async fn create(&self, principal: NewPrincipal) -> Result<Principal, StoreError> {
        let query = r"
            INSERT INTO principals (display_name, email, password_hash, otp_secret)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at
        ";

        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );

        let row = sqlx::query(query)
            .bind(&principal.display_name)
            .bind(&principal.email)
            .bind(&principal.password_hash)
            .bind(principal.otp_secret.to_base32())
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(Principal {
                id: row.get("id"),
                created_at: row.get("created_at"),
                display_name: principal.display_name,
                email: principal.email,
                password_hash: principal.password_hash,
                otp_secret: principal.otp_secret,
            }),

            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateEmail),

            Err(err) => {
                error!("Failed to insert principal: {}", err);

                Err(StoreError::Unavailable(err.to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError> {
        let query = r"
            SELECT id, display_name, email, password_hash, otp_secret, created_at
            FROM principals
            WHERE email = $1
        ";

        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );

        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| {
                error!("Failed to query principal: {}", err);

                StoreError::Unavailable(err.to_string())
            })?;

        row.as_ref().map(principal_from_row).transpose()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );

        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .map_err(|err| {
                error!("Failed to acquire database connection: {}", err);

                StoreError::Unavailable(err.to_string())
            })?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");

        conn.ping().instrument(ping_span).await.map_err(|err| {
            error!("Failed to ping database: {}", err);

            StoreError::Unavailable(err.to_string())
        })
    }
}
