use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{FromRow, Row};

use super::{money_column, required, Entity, Money, NewRecord, Record};
use crate::db::Store;
use crate::error::{StoreError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub amount: Money,
    pub status: String,
}

impl<'r> FromRow<'r, SqliteRow> for Invoice {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            invoice_number: row.try_get("invoice_number")?,
            amount: money_column(row, "amount")?,
            status: row.try_get("status")?,
        })
    }
}

impl Record for Invoice {
    const ENTITY: Entity = Entity::Invoice;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    /// Unique across the invoices table
    pub invoice_number: String,
    pub amount: Money,
    /// `None` stores the column default, `unpaid`
    pub status: Option<String>,
}

impl NewInvoice {
    pub fn new(invoice_number: impl Into<String>, amount: Money) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            amount,
            status: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub async fn save(&self, store: &Store) -> Result<i64, StoreError> {
        store.create(self).await
    }
}

impl NewRecord for NewInvoice {
    const ENTITY: Entity = Entity::Invoice;

    fn insert_sql(&self) -> &'static str {
        match self.status {
            Some(_) => "INSERT INTO invoices (invoice_number, amount, status) VALUES (?, ?, ?)",
            None => "INSERT INTO invoices (invoice_number, amount) VALUES (?, ?)",
        }
    }

    fn bind<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        let query = query
            .bind(self.invoice_number.as_str())
            .bind(self.amount.to_sql_text());
        match &self.status {
            Some(status) => query.bind(status.as_str()),
            None => query,
        }
    }
}

/// Raw text typed into the invoice form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceForm {
    pub invoice_number: String,
    pub amount: String,
    pub status: String,
}

impl InvoiceForm {
    pub fn validate(&self) -> Result<NewInvoice, ValidationError> {
        let invoice_number = required("invoice_number", &self.invoice_number)?;
        let amount = required("amount", &self.amount)?;
        let status = required("status", &self.status)?;
        let amount = Money::parse("amount", amount)?;

        Ok(NewInvoice::new(invoice_number, amount).with_status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_form() {
        let form = InvoiceForm {
            invoice_number: "INV-001".to_string(),
            amount: "250".to_string(),
            status: "paid".to_string(),
        };
        let invoice = form.validate().unwrap();
        assert_eq!(invoice.invoice_number, "INV-001");
        assert_eq!(invoice.amount.to_string(), "250.00");
        assert_eq!(invoice.status.as_deref(), Some("paid"));
    }

    #[test]
    fn rejects_bad_amount_and_blank_number() {
        let form = InvoiceForm {
            invoice_number: "INV-002".to_string(),
            amount: "12,50".to_string(),
            status: "unpaid".to_string(),
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidNumber { field: "amount", .. })
        ));

        let blank = InvoiceForm {
            amount: "10".to_string(),
            status: "unpaid".to_string(),
            ..Default::default()
        };
        assert_eq!(
            blank.validate(),
            Err(ValidationError::MissingField { field: "invoice_number" })
        );
    }
}
