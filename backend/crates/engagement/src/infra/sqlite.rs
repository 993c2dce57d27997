//! SQLite Repository Implementations
//!
//! Durable session slot and decision cache. Each cached decision list is
//! stored as one JSON blob together with its SHA-256 digest; a blob whose
//! digest no longer matches is reported as [`EngagementError::CorruptedReplica`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use platform::crypto::{sha256_base64, verify_sha256_base64};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::domain::entity::{decision::Decision, session::Session};
use crate::domain::repository::{DecisionCache, SessionRepository};
use crate::domain::value_object::FreelancerId;
use crate::error::{EngagementError, EngagementResult};

/// SQLite-backed session slot and decision cache
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `url`
    ///
    /// In-memory databases are private to a connection, so they get a
    /// single connection that is never recycled.
    pub async fn connect(url: &str) -> EngagementResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(4)
                .connect_with(options)
                .await?
        };

        tracing::debug!(url, "Engagement cache database opened");
        Ok(Self { pool })
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> EngagementResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Drop cached lists not refreshed since `cutoff`
    pub async fn prune_cache(&self, cutoff: DateTime<Utc>) -> EngagementResult<u64> {
        let deleted = sqlx::query("DELETE FROM decision_cache WHERE updated_at_ms < ?")
            .bind(cutoff.timestamp_millis())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(replicas_deleted = deleted, "Pruned stale decision replicas");

        Ok(deleted)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for SqliteStore {
    async fn load(&self) -> EngagementResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT freelancer_id, created_at_ms, valid
            FROM session_slot
            WHERE slot = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_session()).transpose()
    }

    async fn save(&self, session: &Session) -> EngagementResult<()> {
        sqlx::query(
            r#"
            INSERT INTO session_slot (slot, freelancer_id, created_at_ms, valid)
            VALUES (1, ?, ?, ?)
            ON CONFLICT (slot) DO UPDATE SET
                freelancer_id = excluded.freelancer_id,
                created_at_ms = excluded.created_at_ms,
                valid = excluded.valid
            "#,
        )
        .bind(session.freelancer_id.as_str())
        .bind(session.created_at.timestamp_millis())
        .bind(session.valid)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear(&self) -> EngagementResult<()> {
        sqlx::query("DELETE FROM session_slot")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Decision Cache Implementation
// ============================================================================

impl DecisionCache for SqliteStore {
    async fn load(&self, freelancer_id: &FreelancerId) -> EngagementResult<Option<Vec<Decision>>> {
        let row = sqlx::query_as::<_, ReplicaRow>(
            r#"
            SELECT payload, digest
            FROM decision_cache
            WHERE freelancer_id = ?
            "#,
        )
        .bind(freelancer_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_decisions(freelancer_id)).transpose()
    }

    async fn store(
        &self,
        freelancer_id: &FreelancerId,
        decisions: &[Decision],
    ) -> EngagementResult<()> {
        let payload = serde_json::to_string(decisions)?;
        let digest = sha256_base64(payload.as_bytes());

        sqlx::query(
            r#"
            INSERT INTO decision_cache (freelancer_id, payload, digest, updated_at_ms)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (freelancer_id) DO UPDATE SET
                payload = excluded.payload,
                digest = excluded.digest,
                updated_at_ms = excluded.updated_at_ms
            "#,
        )
        .bind(freelancer_id.as_str())
        .bind(&payload)
        .bind(&digest)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            freelancer_id = %freelancer_id,
            count = decisions.len(),
            "Decision replica stored"
        );
        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct SessionRow {
    freelancer_id: String,
    created_at_ms: i64,
    valid: bool,
}

impl SessionRow {
    fn into_session(self) -> EngagementResult<Session> {
        let freelancer_id = FreelancerId::parse(&self.freelancer_id)?;
        let created_at = DateTime::from_timestamp_millis(self.created_at_ms).ok_or_else(|| {
            EngagementError::Internal(format!("Invalid created_at_ms: {}", self.created_at_ms))
        })?;

        Ok(Session {
            freelancer_id,
            created_at,
            valid: self.valid,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReplicaRow {
    payload: String,
    digest: String,
}

impl ReplicaRow {
    fn into_decisions(self, freelancer_id: &FreelancerId) -> EngagementResult<Vec<Decision>> {
        if !verify_sha256_base64(self.payload.as_bytes(), &self.digest) {
            return Err(EngagementError::CorruptedReplica {
                freelancer_id: freelancer_id.to_string(),
            });
        }
        Ok(serde_json::from_str(&self.payload)?)
    }
}
