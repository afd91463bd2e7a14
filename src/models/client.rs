use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

use super::{optional, required, Entity, NewRecord, Record};
use crate::db::Store;
use crate::error::{StoreError, ValidationError};

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub business_type: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Record for Client {
    const ENTITY: Entity = Entity::Client;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Field values for a client that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub business_type: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl NewClient {
    pub fn new(name: impl Into<String>, business_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            business_type: business_type.into(),
            address: None,
            phone: None,
            email: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub async fn save(&self, store: &Store) -> Result<i64, StoreError> {
        store.create(self).await
    }
}

impl NewRecord for NewClient {
    const ENTITY: Entity = Entity::Client;

    fn insert_sql(&self) -> &'static str {
        "INSERT INTO clients (name, business_type, address, phone, email) VALUES (?, ?, ?, ?, ?)"
    }

    fn bind<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(self.name.as_str())
            .bind(self.business_type.as_str())
            .bind(self.address.as_deref())
            .bind(self.phone.as_deref())
            .bind(self.email.as_deref())
    }
}

/// Raw text typed into the client form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientForm {
    pub name: String,
    pub business_type: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl ClientForm {
    pub fn validate(&self) -> Result<NewClient, ValidationError> {
        let name = required("name", &self.name)?;
        let business_type = required("business_type", &self.business_type)?;

        Ok(NewClient {
            name: name.to_string(),
            business_type: business_type.to_string(),
            address: optional(&self.address),
            phone: optional(&self.phone),
            email: optional(&self.email),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_requires_name_and_business_type() {
        let mut form = ClientForm {
            business_type: "Retail".to_string(),
            ..Default::default()
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingField { field: "name" })
        );

        form.name = "Acme".to_string();
        form.business_type.clear();
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingField { field: "business_type" })
        );
    }

    #[test]
    fn form_leaves_blank_optionals_null() {
        let form = ClientForm {
            name: "Acme".to_string(),
            business_type: "Retail".to_string(),
            phone: "555-0100".to_string(),
            ..Default::default()
        };
        assert_eq!(
            form.validate(),
            Ok(NewClient::new("Acme", "Retail").with_phone("555-0100"))
        );
    }
}
