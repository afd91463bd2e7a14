use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{FromRow, Row};

use super::{money_column, required, Entity, Money, NewRecord, Record};
use crate::db::Store;
use crate::error::{StoreError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub budget: Money,
    pub status: String,
}

impl<'r> FromRow<'r, SqliteRow> for Project {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            budget: money_column(row, "budget")?,
            status: row.try_get("status")?,
        })
    }
}

impl Record for Project {
    const ENTITY: Entity = Entity::Project;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub budget: Money,
    /// `None` stores the column default, `pending`
    pub status: Option<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>, description: impl Into<String>, budget: Money) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            budget,
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

impl NewRecord for NewProject {
    const ENTITY: Entity = Entity::Project;

    fn insert_sql(&self) -> &'static str {
        match self.status {
            Some(_) => {
                "INSERT INTO projects (name, description, budget, status) VALUES (?, ?, ?, ?)"
            }
            None => "INSERT INTO projects (name, description, budget) VALUES (?, ?, ?)",
        }
    }

    fn bind<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        let query = query
            .bind(self.name.as_str())
            .bind(self.description.as_str())
            .bind(self.budget.to_sql_text());
        match &self.status {
            Some(status) => query.bind(status.as_str()),
            None => query,
        }
    }
}

/// Raw text typed into the project form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub budget: String,
    pub status: String,
}

impl ProjectForm {
    pub fn validate(&self) -> Result<NewProject, ValidationError> {
        let name = required("name", &self.name)?;
        let description = required("description", &self.description)?;
        let budget = required("budget", &self.budget)?;
        let status = required("status", &self.status)?;
        let budget = Money::parse("budget", budget)?;

        Ok(NewProject::new(name, description, budget).with_status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProjectForm {
        ProjectForm {
            name: "Website".to_string(),
            description: "Landing page rebuild".to_string(),
            budget: "1500.50".to_string(),
            status: "active".to_string(),
        }
    }

    #[test]
    fn valid_form_parses_budget() {
        let project = form().validate().unwrap();
        assert_eq!(project.budget, "1500.5".parse::<Money>().unwrap());
        assert_eq!(project.status.as_deref(), Some("active"));
    }

    #[test]
    fn non_numeric_budget_is_rejected() {
        let mut form = form();
        form.budget = "abc".to_string();
        assert_eq!(
            form.validate(),
            Err(ValidationError::InvalidNumber {
                field: "budget",
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn every_field_is_required() {
        let mut missing_status = form();
        missing_status.status = String::new();
        assert_eq!(
            missing_status.validate(),
            Err(ValidationError::MissingField { field: "status" })
        );

        let mut missing_budget = form();
        missing_budget.budget = " ".to_string();
        assert_eq!(
            missing_budget.validate(),
            Err(ValidationError::MissingField { field: "budget" })
        );
    }

    #[test]
    fn insert_template_follows_status() {
        let project = NewProject::new("a", "b", Money::zero());
        assert!(!project.insert_sql().contains("status"));
        assert!(project.with_status("done").insert_sql().contains("status"));
    }
}
