//! Database access for OTP verification and session issuance.
//!
//! The core logic talks to these traits so it can be exercised without a
//! running Postgres; `PgAuthStore` is the production implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, FromRow, PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

/// User fields the OTP flow reads and resets.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub role: Option<Uuid>,
    pub otp: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub otp_attempts: i32,
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            role: row.try_get("role")?,
            otp: row.try_get("otp")?,
            otp_expires_at: row.try_get("otp_expires_at")?,
            otp_attempts: row.try_get("otp_attempts")?,
        })
    }
}

/// One issued refresh token plus the provenance captured at login.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub origin: Option<String>,
}

/// User-record operations needed by the OTP flow.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>>;

    /// Add one failed attempt. Must be a single atomic increment in the
    /// store; concurrent submissions for the same user must not lose counts.
    async fn increment_otp_attempts(&self, id: Uuid) -> Result<()>;

    /// Clear the pending challenge, zero the attempt counter, stamp
    /// `last_access_at`, and mark the account active.
    async fn reset_challenge_and_activate(&self, id: Uuid, now: DateTime<Utc>) -> Result<()>;
}

/// Session-record operations needed by the OTP flow.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, session: &SessionRecord) -> Result<()>;

    /// Delete every session whose expiry has passed, store-wide.
    /// Returns the number of rows removed.
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64>;
}

/// Postgres-backed store shared by both traits.
#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgAuthStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>> {
        let query = r"
            SELECT id, role, otp, otp_expires_at, otp_attempts
            FROM users
            WHERE id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user")?;

        row.map(|row| UserRecord::from_row(&row).context("failed to decode user row"))
            .transpose()
    }

    async fn increment_otp_attempts(&self, id: Uuid) -> Result<()> {
        // Single UPDATE so concurrent submissions never lose an increment.
        let query = r"
            UPDATE users
            SET otp_attempts = otp_attempts + 1
            WHERE id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(id)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to increment otp attempts")?;
        Ok(())
    }

    async fn reset_challenge_and_activate(&self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        // This deployment treats a completed OTP login as account activation.
        let query = r"
            UPDATE users
            SET otp = NULL,
                otp_expires_at = NULL,
                otp_attempts = 0,
                last_access_at = $2,
                status = 'active'
            WHERE id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(id)
            .bind(now)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to reset otp challenge")?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PgAuthStore {
    async fn insert_session(&self, session: &SessionRecord) -> Result<()> {
        let query = r"
            INSERT INTO user_sessions (token, user_id, expires_at, ip, user_agent, origin)
            VALUES ($1, $2, $3, $4, $5, $6)
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(&session.token)
            .bind(session.user_id)
            .bind(session.expires_at)
            .bind(&session.ip)
            .bind(&session.user_agent)
            .bind(&session.origin)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to insert session")?;
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
        // Amortized garbage collection piggybacked on successful logins.
        let query = "DELETE FROM user_sessions WHERE expires_at < $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(now)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to delete expired sessions")?;
        Ok(result.rows_affected())
    }
}
