mod client;
mod invoice;
mod money;
mod project;

use std::fmt;

use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::FromRow;
use tracing::warn;

pub use client::{Client, ClientForm, NewClient};
pub use invoice::{Invoice, InvoiceForm, NewInvoice};
pub use money::{Money, MAX_SIGNIFICANT_DIGITS};
pub use project::{NewProject, Project, ProjectForm};

use crate::error::ValidationError;

/// Tag selecting one of the three record tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Client,
    Project,
    Invoice,
}

impl Entity {
    pub const ALL: [Entity; 3] = [Entity::Client, Entity::Project, Entity::Invoice];

    pub fn table(&self) -> &'static str {
        match self {
            Entity::Client => "clients",
            Entity::Project => "projects",
            Entity::Invoice => "invoices",
        }
    }

    /// Plural heading used by the UI
    pub fn title(&self) -> &'static str {
        match self {
            Entity::Client => "Clients",
            Entity::Project => "Projects",
            Entity::Invoice => "Invoices",
        }
    }

    /// Full-table read in storage order. Money columns are cast to text so
    /// they decode into `Money` without passing through a float.
    pub fn select_sql(&self) -> &'static str {
        match self {
            Entity::Client => {
                "SELECT id, name, business_type, address, phone, email FROM clients"
            }
            Entity::Project => {
                "SELECT id, name, description, CAST(budget AS TEXT) AS budget, status FROM projects"
            }
            Entity::Invoice => {
                "SELECT id, invoice_number, CAST(amount AS TEXT) AS amount, status FROM invoices"
            }
        }
    }

    pub fn delete_sql(&self) -> &'static str {
        match self {
            Entity::Client => "DELETE FROM clients WHERE id = ?",
            Entity::Project => "DELETE FROM projects WHERE id = ?",
            Entity::Invoice => "DELETE FROM invoices WHERE id = ?",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Client => "client",
            Entity::Project => "project",
            Entity::Invoice => "invoice",
        };
        f.write_str(name)
    }
}

/// A stored row that `Store::list_all` can return
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const ENTITY: Entity;

    fn id(&self) -> i64;
}

/// A validated set of field values that `Store::create` can insert
pub trait NewRecord: Sync {
    const ENTITY: Entity;

    /// Static INSERT template for this value. Fields left unset are omitted
    /// from the column list so SQLite applies the column default.
    fn insert_sql(&self) -> &'static str;

    /// Bind the values in the order `insert_sql` expects them.
    fn bind<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>>;
}

/// Non-empty check applied to every required form field.
pub(crate) fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField { field })
    } else {
        Ok(value)
    }
}

/// Optional form fields become NULL when left blank.
pub(crate) fn optional(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Decode a money column selected through `CAST(.. AS TEXT)`.
///
/// NULL and values that do not fit a decimal (`inf`, `1e+30`) read as zero.
pub(crate) fn money_column(row: &SqliteRow, column: &str) -> Result<Money, sqlx::Error> {
    use sqlx::Row;

    let text: Option<String> = row.try_get(column)?;
    let Some(text) = text else {
        return Ok(Money::zero());
    };

    match text.parse() {
        Ok(money) => Ok(money),
        Err(err) => {
            warn!(column, value = %text, error = %err, "unreadable money value, showing zero");
            Ok(Money::zero())
        }
    }
}
