mod schema;

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::StoreError;
use crate::models::{Entity, NewRecord, Record};

// Primary SQLite result codes that mean the file itself is unusable
const SQLITE_PERM: i32 = 3;
const SQLITE_READONLY: i32 = 8;
const SQLITE_IOERR: i32 = 10;
const SQLITE_CORRUPT: i32 = 11;
const SQLITE_FULL: i32 = 13;
const SQLITE_CANTOPEN: i32 = 14;
const SQLITE_NOTADB: i32 = 26;

/// Handle to the application's database file.
///
/// Every operation opens its own connection and closes it before returning,
/// so the handle holds no open resources between calls.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl Store {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            // Rollback journal, as the files have always been written
            .journal_mode(SqliteJournalMode::Delete)
            .disable_statement_logging();

        Self { path, options }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows of `R`'s table in storage order
    pub async fn list_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query_as::<_, R>(R::ENTITY.select_sql())
            .fetch_all(&mut conn)
            .await;
        self.release(conn).await;

        let rows = rows.map_err(|err| self.classify(R::ENTITY, err))?;
        debug!(table = R::ENTITY.table(), rows = rows.len(), "listed rows");
        Ok(rows)
    }

    /// Insert one row and return its id
    pub async fn create<N: NewRecord>(&self, record: &N) -> Result<i64, StoreError> {
        let mut conn = self.connect().await?;
        let result = record
            .bind(sqlx::query(record.insert_sql()))
            .execute(&mut conn)
            .await;
        self.release(conn).await;

        let id = result
            .map_err(|err| self.classify(N::ENTITY, err))?
            .last_insert_rowid();
        info!(table = N::ENTITY.table(), id, "created row");
        Ok(id)
    }

    /// Remove the row with `id`. A missing id is not an error.
    pub async fn delete(&self, entity: Entity, id: i64) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(entity.delete_sql())
            .bind(id)
            .execute(&mut conn)
            .await;
        self.release(conn).await;

        let removed = result
            .map_err(|err| self.classify(entity, err))?
            .rows_affected();
        if removed == 0 {
            debug!(table = entity.table(), id, "delete matched no row");
        } else {
            info!(table = entity.table(), id, "deleted row");
        }
        Ok(())
    }

    async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        self.options
            .connect()
            .await
            .map_err(|source| StoreError::StorageUnavailable {
                path: self.path.clone(),
                source,
            })
    }

    async fn release(&self, conn: SqliteConnection) {
        if let Err(err) = conn.close().await {
            warn!(path = %self.path.display(), error = %err, "failed to close connection");
        }
    }

    fn classify(&self, entity: Entity, err: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueConstraintViolation {
                    entity,
                    detail: db_err.message().to_string(),
                };
            }
        }

        self.storage_error(err)
    }

    /// Errors with no record behind them, such as schema setup.
    fn storage_error(&self, err: sqlx::Error) -> StoreError {
        if is_storage_failure(&err) {
            StoreError::StorageUnavailable {
                path: self.path.clone(),
                source: err,
            }
        } else {
            StoreError::Database(err)
        }
    }
}

fn is_storage_failure(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_) => true,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .map(|code| {
                matches!(
                    code & 0xff,
                    SQLITE_PERM
                        | SQLITE_READONLY
                        | SQLITE_IOERR
                        | SQLITE_CORRUPT
                        | SQLITE_FULL
                        | SQLITE_CANTOPEN
                        | SQLITE_NOTADB
                )
            })
            .unwrap_or(false),
        _ => false,
    }
}

/// Open the configured database and make sure its tables exist
pub async fn init(config: &Config) -> Result<Store, StoreError> {
    let store = Store::new(&config.database_path);
    store.init_schema().await?;

    info!(path = %store.path().display(), "database ready");
    Ok(store)
}
