use sqlx::sqlite::SqliteConnection;
use sqlx::Connection;
use tracing::debug;

use super::Store;
use crate::error::StoreError;
use crate::models::Entity;

// Kept textually identical to the statements that created existing files
const CREATE_CLIENTS: &str = "
        CREATE TABLE IF NOT EXISTS clients (
            id INTEGER PRIMARY KEY,
            name TEXT,
            business_type TEXT,
            address TEXT,
            phone TEXT,
            email TEXT
        )
    ";

const CREATE_PROJECTS: &str = "
        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY,
            name TEXT,
            description TEXT,
            budget DECIMAL,
            status TEXT DEFAULT 'pending'
        )
    ";

const CREATE_INVOICES: &str = "
        CREATE TABLE IF NOT EXISTS invoices (
            id INTEGER PRIMARY KEY,
            invoice_number TEXT UNIQUE,
            amount DECIMAL,
            status TEXT DEFAULT 'unpaid'
        )
    ";

fn create_sql(entity: Entity) -> &'static str {
    match entity {
        Entity::Client => CREATE_CLIENTS,
        Entity::Project => CREATE_PROJECTS,
        Entity::Invoice => CREATE_INVOICES,
    }
}

impl Store {
    /// Create any missing tables. Safe to run on every start; existing
    /// tables and rows are left untouched.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;
        let result = create_tables(&mut conn).await;
        self.release(conn).await;

        result.map_err(|err| self.storage_error(err))
    }
}

async fn create_tables(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    let mut tx = conn.begin().await?;
    for entity in Entity::ALL {
        sqlx::query(create_sql(entity)).execute(&mut *tx).await?;
        debug!(table = entity.table(), "ensured table");
    }
    tx.commit().await
}
