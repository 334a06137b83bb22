use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use super::domain::{QuoteRequest, SubmissionContext};

pub const QUOTES_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS quotes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    company TEXT,
    pickup TEXT NOT NULL,
    delivery TEXT NOT NULL,
    freight_type TEXT NOT NULL,
    ip_address TEXT,
    submitted_at TEXT NOT NULL
)";

const INSERT_QUOTE: &str = "INSERT INTO quotes (
    name, email, phone, company, pickup, delivery,
    freight_type, ip_address, submitted_at
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// One row of the `quotes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct QuoteRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub pickup: String,
    pub delivery: String,
    /// Freight types as a JSON array string, e.g. `["Frozen","Chilled"]`.
    pub freight_type: String,
    pub ip_address: Option<String>,
    pub submitted_at: String,
}

impl QuoteRecord {
    pub fn from_submission(
        request: &QuoteRequest,
        context: &SubmissionContext,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            company: request.company.clone(),
            pickup: request.pickup.clone(),
            delivery: request.delivery.clone(),
            freight_type: serde_json::to_string(&request.freight_type)?,
            ip_address: context.ip_address.clone(),
            submitted_at: context.submitted_at_iso(),
        })
    }
}

/// Append-only sink for quote submissions.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn insert(&self, record: &QuoteRecord) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend could not be reached. For stores without a driver error type.
    #[error("quote store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to encode freight types: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// SQLite-backed [`QuoteStore`].
#[derive(Debug, Clone)]
pub struct SqliteQuoteStore {
    pool: SqlitePool,
}

impl SqliteQuoteStore {
    /// Open (creating if needed) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self::from_pool(pool);
        store.ensure_schema().await?;
        info!("quote store connected");
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(QUOTES_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl QuoteStore for SqliteQuoteStore {
    async fn insert(&self, record: &QuoteRecord) -> Result<(), StoreError> {
        let result = sqlx::query(INSERT_QUOTE)
            .bind(&record.name)
            .bind(&record.email)
            .bind(&record.phone)
            .bind(&record.company)
            .bind(&record.pickup)
            .bind(&record.delivery)
            .bind(&record.freight_type)
            .bind(&record.ip_address)
            .bind(&record.submitted_at)
            .execute(&self.pool)
            .await?;
        debug!(row_id = result.last_insert_rowid(), "quote row inserted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    async fn memory_store() -> SqliteQuoteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let store = SqliteQuoteStore::from_pool(pool);
        store.ensure_schema().await.expect("schema");
        store
    }

    fn record() -> QuoteRecord {
        let request = QuoteRequest {
            name: "Jo Smith".to_string(),
            phone: "021 555 123".to_string(),
            email: "jo@example.com".to_string(),
            company: None,
            pickup: "Auckland".to_string(),
            delivery: "Wellington".to_string(),
            freight_type: vec!["Frozen".to_string(), "Chilled".to_string()],
        };
        let submitted_at = Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        let context = SubmissionContext::new(Some("203.0.113.7".to_string()), submitted_at);
        QuoteRecord::from_submission(&request, &context).expect("record builds")
    }

    #[test]
    fn record_serializes_freight_as_json_array() {
        let record = record();
        assert_eq!(record.freight_type, r#"["Frozen","Chilled"]"#);
        assert_eq!(record.submitted_at, "2025-03-01T09:30:00.000Z");
        assert_eq!(record.ip_address.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn insert_appends_rows_with_nulls_for_absent_fields() {
        let store = memory_store().await;
        let mut anonymous = record();
        anonymous.ip_address = None;

        store.insert(&record()).await.expect("first insert");
        store.insert(&anonymous).await.expect("second insert");

        let rows: Vec<QuoteRecord> = sqlx::query_as(
            "SELECT name, email, phone, company, pickup, delivery, freight_type, ip_address, submitted_at FROM quotes ORDER BY id",
        )
        .fetch_all(store.pool())
        .await
        .expect("rows load");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], record());
        assert!(rows[1].company.is_none());
        assert!(rows[1].ip_address.is_none());
    }

    #[tokio::test]
    async fn schema_creation_is_repeatable() {
        let store = memory_store().await;
        store.ensure_schema().await.expect("second run is a no-op");
    }

    #[tokio::test]
    async fn insert_without_schema_reports_database_error() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let store = SqliteQuoteStore::from_pool(pool);
        let err = store.insert(&record()).await.expect_err("table missing");
        assert!(matches!(err, StoreError::Database(_)));
    }
}
