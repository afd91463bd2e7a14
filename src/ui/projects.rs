use tui::layout::Constraint;

use super::records::{Columns, RecordListState};
use super::wizard::{FormFields, WizardState};
use crate::error::ValidationError;
use crate::models::{NewProject, Project, ProjectForm};

pub type ProjectsState = RecordListState<Project>;
pub type ProjectWizardState = WizardState<ProjectForm>;

impl Columns for Project {
    const HEADERS: &'static [&'static str] = &["Name", "Description", "Budget", "Status"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Percentage(25),
        Constraint::Percentage(40),
        Constraint::Percentage(15),
        Constraint::Percentage(20),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone(),
            self.budget.to_string(),
            self.status.clone(),
        ]
    }
}

impl FormFields for ProjectForm {
    type Output = NewProject;

    const TITLE: &'static str = "Project";
    const LABELS: &'static [&'static str] = &["Name", "Description", "Budget", "Status"];

    fn field(&self, index: usize) -> Option<&str> {
        let value = match index {
            0 => &self.name,
            1 => &self.description,
            2 => &self.budget,
            3 => &self.status,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.name),
            1 => Some(&mut self.description),
            2 => Some(&mut self.budget),
            3 => Some(&mut self.status),
            _ => None,
        }
    }

    fn validate(&self) -> Result<NewProject, ValidationError> {
        ProjectForm::validate(self)
    }
}
