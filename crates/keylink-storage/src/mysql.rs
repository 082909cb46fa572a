use async_trait::async_trait;
use jiff::Timestamp;
use keylink_core::error::{Result, StorageError};
use keylink_core::key::{SecretKey, ShortKey};
use keylink_core::repository::{NewUrlRecord, ReadRepository, Repository, UrlRecord};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tracing::{debug, trace};

const SELECT_COLUMNS: &str = r#"
    SELECT id, target_url, url_key, secret_key, is_active, clicks, created_at, updated_at
    FROM short_urls
"#;

/// MySQL implementation of the repository contract.
///
/// Deactivation is a soft delete on `is_active`; rows are never removed, so
/// the unique indexes on `url_key` and `secret_key` also cover deactivated
/// records and a key is never reissued. Each call borrows a pooled
/// connection for the duration of a single statement.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Operation(format!("migration failed: {e}")))?;
        debug!("schema migrations applied");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn exists_by_id(&self, id: u64) -> Result<bool> {
        let exists = sqlx::query("SELECT 1 FROM short_urls WHERE id = ? LIMIT 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .is_some();

        Ok(exists)
    }
}

fn parse_timestamp(column: &str, seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{seconds}': {e}"))
    })
}

fn record_from_row(row: &MySqlRow) -> Result<UrlRecord> {
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let updated_at: i64 = row.try_get("updated_at").map_err(map_sqlx_error)?;

    Ok(UrlRecord {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        target_url: row.try_get("target_url").map_err(map_sqlx_error)?,
        key: ShortKey::new(row.try_get::<String, _>("url_key").map_err(map_sqlx_error)?),
        secret_key: SecretKey::new(
            row.try_get::<String, _>("secret_key")
                .map_err(map_sqlx_error)?,
        ),
        is_active: row.try_get("is_active").map_err(map_sqlx_error)?,
        clicks: row.try_get("clicks").map_err(map_sqlx_error)?,
        created_at: parse_timestamp("created_at", created_at)?,
        updated_at: parse_timestamp("updated_at", updated_at)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn find_by_key(&self, key: &ShortKey, active_only: bool) -> Result<Option<UrlRecord>> {
        let sql = if active_only {
            format!("{SELECT_COLUMNS} WHERE url_key = ? AND is_active = TRUE LIMIT 1")
        } else {
            format!("{SELECT_COLUMNS} WHERE url_key = ? LIMIT 1")
        };

        let row = sqlx::query(&sql)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn find_by_secret(&self, secret_key: &SecretKey) -> Result<Option<UrlRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE secret_key = ? LIMIT 1");

        let row = sqlx::query(&sql)
            .bind(secret_key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn key_exists(&self, key: &ShortKey) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM short_urls
            WHERE url_key = ?
            LIMIT 1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord> {
        let created_at = record.created_at.as_second();
        // Stored with second precision; hand back what a later read returns.
        let record = NewUrlRecord {
            created_at: parse_timestamp("created_at", created_at)?,
            ..record
        };

        let result = sqlx::query(
            r#"
            INSERT INTO short_urls
                (url_key, secret_key, target_url, is_active, clicks, created_at, updated_at)
            VALUES (?, ?, ?, TRUE, 0, ?, ?)
            "#,
        )
        .bind(record.key.as_str())
        .bind(record.secret_key.as_str())
        .bind(record.target_url.as_str())
        .bind(created_at)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_id();
                trace!(id, key = %record.key, "inserted record");
                Ok(record.into_record(id))
            }
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(record.key.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn update(&self, record: &UrlRecord) -> Result<bool> {
        // `is_active AND ?` keeps deactivation one-way.
        let result = sqlx::query(
            r#"
            UPDATE short_urls
            SET is_active = (is_active AND ?),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(record.is_active)
        .bind(record.updated_at.as_second())
        .bind(record.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        // MySQL reports changed rows, not matched rows.
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        self.exists_by_id(record.id).await
    }

    async fn increment_clicks(&self, id: u64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE short_urls
            SET clicks = clicks + 1
            WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Operation(format!("no record with id {id}")));
        }
        Ok(())
    }
}
