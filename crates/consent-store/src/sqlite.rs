//! SQLite-backed consent store.
//!
//! Status and permissions are stored as text (permissions comma-delimited, request order);
//! timestamps as RFC 3339 with their original offset.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use consent_types::{ConsentRecord, ConsentStatus, ConsentStore, Permission, StoreError};
use std::path::Path;

/// Raw row as read from `account_access_consents`, before vocabulary parsing.
struct ConsentRow {
    consent_id: String,
    status: String,
    creation_date_time: String,
    status_update_date_time: String,
    expiration_date_time: String,
    permissions: String,
    request_body: String,
}

impl ConsentRow {
    fn into_record(self) -> Result<ConsentRecord, StoreError> {
        let corrupt = |e: &dyn std::fmt::Display| {
            StoreError::Corrupt(format!("{}: {}", self.consent_id, e))
        };
        let status = self.status.parse::<ConsentStatus>().map_err(|e| corrupt(&e))?;
        let permissions = Permission::split(&self.permissions).map_err(|e| corrupt(&e))?;
        let creation_time = parse_ts(&self.creation_date_time).map_err(|e| corrupt(&e))?;
        let status_update_time =
            parse_ts(&self.status_update_date_time).map_err(|e| corrupt(&e))?;
        let expiration_time = parse_ts(&self.expiration_date_time).map_err(|e| corrupt(&e))?;
        Ok(ConsentRecord {
            id: self.consent_id,
            status,
            creation_time,
            status_update_time,
            expiration_time,
            permissions,
            raw_request: self.request_body,
        })
    }
}

fn parse_ts(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s)
}

/// SQLite-backed consent store for persistence.
pub struct SqliteConsentStore {
    conn: std::sync::Mutex<rusqlite::Connection>,
}

impl SqliteConsentStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    /// `":memory:"` gives a private in-memory database.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn =
            rusqlite::Connection::open(path).map_err(|e| StoreError::Other(e.to_string()))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS account_access_consents (
                consent_id TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                creation_date_time TEXT NOT NULL,
                status_update_date_time TEXT NOT NULL,
                expiration_date_time TEXT NOT NULL,
                permissions TEXT NOT NULL,
                request_body TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| StoreError::Other(e.to_string()))?;
        tracing::debug!(path = %path.display(), "sqlite consent store opened");

        Ok(Self {
            conn: std::sync::Mutex::new(conn),
        })
    }

    fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<T, rusqlite::Error>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Other(format!("failed to acquire lock: {}", e)))?;
        f(&conn).map_err(|e| StoreError::Other(e.to_string()))
    }
}

#[async_trait]
impl ConsentStore for SqliteConsentStore {
    async fn get(&self, id: &str) -> Result<Option<ConsentRecord>, StoreError> {
        let row = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT consent_id, status, creation_date_time, status_update_date_time, expiration_date_time, permissions, request_body FROM account_access_consents WHERE consent_id = ?1",
            )?;
            let result = stmt.query_row([id], |row| {
                Ok(ConsentRow {
                    consent_id: row.get(0)?,
                    status: row.get(1)?,
                    creation_date_time: row.get(2)?,
                    status_update_date_time: row.get(3)?,
                    expiration_date_time: row.get(4)?,
                    permissions: row.get(5)?,
                    request_body: row.get(6)?,
                })
            });
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })?;
        row.map(ConsentRow::into_record).transpose()
    }

    async fn save(&self, record: &ConsentRecord) -> Result<(), StoreError> {
        let status = record.status.as_str();
        let permissions = Permission::join(&record.permissions);
        let creation = record.creation_time.to_rfc3339();
        let status_update = record.status_update_time.to_rfc3339();
        let expiration = record.expiration_time.to_rfc3339();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO account_access_consents (consent_id, status, creation_date_time, status_update_date_time, expiration_date_time, permissions, request_body) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    record.id,
                    status,
                    creation,
                    status_update,
                    expiration,
                    permissions,
                    record.raw_request,
                ],
            )
        })?;
        Ok(())
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM account_access_consents WHERE consent_id = ?1)",
                [id],
                |row| row.get::<_, bool>(0),
            )
        })
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM account_access_consents WHERE consent_id = ?1",
                [id],
            )
        })?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ConsentRecord {
        let created = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        ConsentRecord {
            id: id.to_string(),
            status: ConsentStatus::AwaitingAuthorisation,
            creation_time: created,
            status_update_time: created,
            expiration_time: DateTime::parse_from_rfc3339("2030-06-01T12:30:00+05:30").unwrap(),
            permissions: vec![
                Permission::ReadTransactionsDetail,
                Permission::ReadPartyPsu,
                Permission::ReadTransactionsDetail,
            ],
            raw_request: r#"{"Data":{"Permissions":["ReadTransactionsDetail"]}}"#.to_string(),
        }
    }

    #[tokio::test]
    async fn save_then_get_preserves_every_field() {
        let store = SqliteConsentStore::new(":memory:").unwrap();
        let rec = record("ACC-1");
        store.save(&rec).await.unwrap();

        let got = store.get("ACC-1").await.unwrap().unwrap();
        assert_eq!(got, rec);
        assert_eq!(got.expiration_time.offset().local_minus_utc(), 19800);
    }

    #[tokio::test]
    async fn missing_id_reads_as_none() {
        let store = SqliteConsentStore::new(":memory:").unwrap();
        assert!(store.get("ACC-missing").await.unwrap().is_none());
        assert!(!store.exists_by_id("ACC-missing").await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_row_once() {
        let store = SqliteConsentStore::new(":memory:").unwrap();
        store.save(&record("ACC-1")).await.unwrap();
        assert!(store.exists_by_id("ACC-1").await.unwrap());

        assert!(store.delete_by_id("ACC-1").await.unwrap());
        assert!(!store.delete_by_id("ACC-1").await.unwrap());
        assert!(store.get("ACC-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_stored_status_is_corrupt() {
        let store = SqliteConsentStore::new(":memory:").unwrap();
        store.save(&record("ACC-1")).await.unwrap();
        store
            .with_conn(|conn| {
                conn.execute(
                    "UPDATE account_access_consents SET status = 'Pending' WHERE consent_id = 'ACC-1'",
                    [],
                )
            })
            .unwrap();

        let err = store.get("ACC-1").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
