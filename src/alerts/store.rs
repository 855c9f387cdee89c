//! Alert repository trait and its SQLite implementation
//!
//! Schema lives in `sql/01_alerts.sql` and is applied on open (all
//! statements use `IF NOT EXISTS`, so reopening is safe).

use super::types::{Alert, AlertCondition, AlertType, AlertUpdate, NewAlert};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

const ALERTS_SCHEMA: &str = include_str!("../../sql/01_alerts.sql");

#[derive(Debug)]
pub enum AlertStoreError {
    Database(rusqlite::Error),
    /// Row holds a value the entity cannot represent
    Corrupt(String),
    LockPoisoned,
}

impl From<rusqlite::Error> for AlertStoreError {
    fn from(err: rusqlite::Error) -> Self {
        AlertStoreError::Database(err)
    }
}

impl std::fmt::Display for AlertStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertStoreError::Database(e) => write!(f, "Database error: {}", e),
            AlertStoreError::Corrupt(msg) => write!(f, "Corrupt alert row: {}", msg),
            AlertStoreError::LockPoisoned => write!(f, "Alert store lock poisoned"),
        }
    }
}

impl std::error::Error for AlertStoreError {}

/// CRUD over persisted alerts
///
/// Operations:
/// - `create` - INSERT, returns the stored alert with its new id
/// - `list` - all alerts, optionally for one coin, ordered by id
/// - `get` - one alert by id
/// - `update` - partial update, `Ok(None)` if the id does not exist
/// - `delete` - `Ok(false)` if the id does not exist
#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn create(&self, alert: NewAlert) -> Result<Alert, AlertStoreError>;

    async fn list(&self, coin_id: Option<&str>) -> Result<Vec<Alert>, AlertStoreError>;

    async fn get(&self, id: i64) -> Result<Option<Alert>, AlertStoreError>;

    async fn update(&self, id: i64, update: AlertUpdate) -> Result<Option<Alert>, AlertStoreError>;

    async fn delete(&self, id: i64) -> Result<bool, AlertStoreError>;
}

/// Raw column values before enum/timestamp conversion
struct AlertRow {
    id: i64,
    coin_id: String,
    coin_name: String,
    alert_type: String,
    condition: String,
    threshold: f64,
    enabled: bool,
    created_at: i64,
}

impl AlertRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            coin_id: row.get(1)?,
            coin_name: row.get(2)?,
            alert_type: row.get(3)?,
            condition: row.get(4)?,
            threshold: row.get(5)?,
            enabled: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_alert(self) -> Result<Alert, AlertStoreError> {
        let alert_type = AlertType::from_str(&self.alert_type)
            .ok_or_else(|| AlertStoreError::Corrupt(format!("alert_type '{}'", self.alert_type)))?;
        let condition = AlertCondition::from_str(&self.condition)
            .ok_or_else(|| AlertStoreError::Corrupt(format!("condition '{}'", self.condition)))?;
        let created_at = DateTime::<Utc>::from_timestamp(self.created_at, 0)
            .ok_or_else(|| AlertStoreError::Corrupt(format!("created_at {}", self.created_at)))?;

        Ok(Alert {
            id: self.id,
            coin_id: self.coin_id,
            coin_name: self.coin_name,
            alert_type,
            condition,
            threshold: self.threshold,
            enabled: self.enabled,
            created_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, coin_id, coin_name, alert_type, condition, threshold, enabled, created_at FROM alerts";

pub struct SqliteAlertRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAlertRepository {
    /// Open (or create) the database file and apply the schema
    pub fn open(db_path: &str) -> Result<Self, AlertStoreError> {
        let conn = Connection::open(db_path)?;

        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        log::info!("📊 SQLite journal mode: {}", mode);

        Self::with_connection(conn)
    }

    /// Private in-memory database, used by tests and ephemeral runs
    pub fn open_in_memory() -> Result<Self, AlertStoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, AlertStoreError> {
        conn.execute_batch(ALERTS_SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, AlertStoreError> {
        self.conn.lock().map_err(|_| AlertStoreError::LockPoisoned)
    }

    fn load(conn: &Connection, id: i64) -> Result<Option<Alert>, AlertStoreError> {
        let row = conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), [id], AlertRow::from_row)
            .optional()?;

        row.map(AlertRow::into_alert).transpose()
    }
}

#[async_trait]
impl AlertRepository for SqliteAlertRepository {
    async fn create(&self, alert: NewAlert) -> Result<Alert, AlertStoreError> {
        let conn = self.lock()?;
        let created_at = Utc::now().timestamp();

        conn.execute(
            r#"
            INSERT INTO alerts (coin_id, coin_name, alert_type, condition, threshold, enabled, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            rusqlite::params![
                alert.coin_id,
                alert.coin_name,
                alert.alert_type.as_str(),
                alert.condition.as_str(),
                alert.threshold,
                alert.enabled,
                created_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        log::debug!("Created alert {} for {}", id, alert.coin_id);

        Self::load(&conn, id)?
            .ok_or_else(|| AlertStoreError::Corrupt(format!("alert {} vanished after insert", id)))
    }

    async fn list(&self, coin_id: Option<&str>) -> Result<Vec<Alert>, AlertStoreError> {
        let conn = self.lock()?;

        let rows: Vec<AlertRow> = match coin_id {
            Some(coin) => {
                let mut stmt = conn.prepare(&format!("{} WHERE coin_id = ?1 ORDER BY id", SELECT_COLUMNS))?;
                let rows = stmt.query_map([coin], AlertRow::from_row)?;
                rows.collect::<rusqlite::Result<_>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
                let rows = stmt.query_map([], AlertRow::from_row)?;
                rows.collect::<rusqlite::Result<_>>()?
            }
        };

        rows.into_iter().map(AlertRow::into_alert).collect()
    }

    async fn get(&self, id: i64) -> Result<Option<Alert>, AlertStoreError> {
        let conn = self.lock()?;
        Self::load(&conn, id)
    }

    async fn update(&self, id: i64, update: AlertUpdate) -> Result<Option<Alert>, AlertStoreError> {
        let conn = self.lock()?;

        let Some(mut alert) = Self::load(&conn, id)? else {
            return Ok(None);
        };
        update.apply(&mut alert);

        conn.execute(
            r#"
            UPDATE alerts SET
                coin_id = ?1,
                coin_name = ?2,
                alert_type = ?3,
                condition = ?4,
                threshold = ?5,
                enabled = ?6
            WHERE id = ?7
            "#,
            rusqlite::params![
                alert.coin_id,
                alert.coin_name,
                alert.alert_type.as_str(),
                alert.condition.as_str(),
                alert.threshold,
                alert.enabled,
                id,
            ],
        )?;

        Ok(Some(alert))
    }

    async fn delete(&self, id: i64) -> Result<bool, AlertStoreError> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM alerts WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn new_alert(coin: &str, threshold: f64) -> NewAlert {
        NewAlert {
            coin_id: coin.to_string(),
            coin_name: coin.to_uppercase(),
            alert_type: AlertType::Positive,
            condition: AlertCondition::Above,
            threshold,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = SqliteAlertRepository::open_in_memory().unwrap();

        let created = repo.create(new_alert("bitcoin", 60.0)).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.coin_id, "bitcoin");
        assert!(created.enabled);

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_list_with_coin_filter() {
        let repo = SqliteAlertRepository::open_in_memory().unwrap();
        repo.create(new_alert("bitcoin", 60.0)).await.unwrap();
        repo.create(new_alert("ethereum", 40.0)).await.unwrap();
        repo.create(new_alert("bitcoin", 70.0)).await.unwrap();

        assert_eq!(repo.list(None).await.unwrap().len(), 3);

        let btc = repo.list(Some("bitcoin")).await.unwrap();
        assert_eq!(btc.len(), 2);
        assert!(btc.iter().all(|a| a.coin_id == "bitcoin"));
        assert!(btc[0].id < btc[1].id);

        assert!(repo.list(Some("cardano")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let repo = SqliteAlertRepository::open_in_memory().unwrap();
        let created = repo.create(new_alert("solana", 50.0)).await.unwrap();

        let update = AlertUpdate {
            enabled: Some(false),
            condition: Some(AlertCondition::Below),
            ..Default::default()
        };
        let updated = repo.update(created.id, update).await.unwrap().unwrap();

        assert!(!updated.enabled);
        assert_eq!(updated.condition, AlertCondition::Below);
        assert_eq!(updated.threshold, 50.0);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(repo.get(created.id).await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = SqliteAlertRepository::open_in_memory().unwrap();
        let result = repo.update(999, AlertUpdate::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = SqliteAlertRepository::open_in_memory().unwrap();
        let created = repo.create(new_alert("cardano", 30.0)).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.get(created.id).await.unwrap().is_none());
        assert!(repo.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();

        let id = {
            let repo = SqliteAlertRepository::open(db_path).unwrap();
            repo.create(new_alert("ethereum", 45.0)).await.unwrap().id
        };

        // Schema re-applied on reopen must not clobber rows
        let repo = SqliteAlertRepository::open(db_path).unwrap();
        let alert = repo.get(id).await.unwrap().unwrap();
        assert_eq!(alert.coin_id, "ethereum");
        assert_eq!(alert.threshold, 45.0);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported() {
        let repo = SqliteAlertRepository::open_in_memory().unwrap();
        {
            let conn = repo.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO alerts (coin_id, coin_name, alert_type, condition, threshold, enabled, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params!["bitcoin", "Bitcoin", "volume", "above", 1.0, 1, 1700000000],
            )
            .unwrap();
        }

        let result = repo.list(None).await;
        assert!(matches!(result, Err(AlertStoreError::Corrupt(_))));
    }
}
