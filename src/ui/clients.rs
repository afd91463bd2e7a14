use tui::layout::Constraint;

use super::records::{Columns, RecordListState};
use super::wizard::{FormFields, WizardState};
use crate::error::ValidationError;
use crate::models::{Client, ClientForm, NewClient};

pub type ClientsState = RecordListState<Client>;
pub type ClientWizardState = WizardState<ClientForm>;

impl Columns for Client {
    const HEADERS: &'static [&'static str] = &["Name", "Business Type", "Address", "Phone", "Email"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Percentage(25),
        Constraint::Percentage(15),
        Constraint::Percentage(20),
    ];

    fn cells(&self) -> Vec<String> {
        let or_dash = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        vec![
            self.name.clone(),
            self.business_type.clone(),
            or_dash(&self.address),
            or_dash(&self.phone),
            or_dash(&self.email),
        ]
    }
}

impl FormFields for ClientForm {
    type Output = NewClient;

    const TITLE: &'static str = "Client";
    const LABELS: &'static [&'static str] = &["Name", "Business Type", "Address", "Phone", "Email"];

    fn field(&self, index: usize) -> Option<&str> {
        let value = match index {
            0 => &self.name,
            1 => &self.business_type,
            2 => &self.address,
            3 => &self.phone,
            4 => &self.email,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.name),
            1 => Some(&mut self.business_type),
            2 => Some(&mut self.address),
            3 => Some(&mut self.phone),
            4 => Some(&mut self.email),
            _ => None,
        }
    }

    fn validate(&self) -> Result<NewClient, ValidationError> {
        ClientForm::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::wizard::WizardAction;
    use crossterm::event::KeyCode;

    fn type_text(state: &mut ClientWizardState, text: &str) {
        state.handle_key(KeyCode::Enter);
        for c in text.chars() {
            state.handle_key(KeyCode::Char(c));
        }
        state.handle_key(KeyCode::Enter);
    }

    #[test]
    fn fills_required_fields_and_saves() {
        let mut state = ClientWizardState::new();
        type_text(&mut state, "Acme");
        state.handle_key(KeyCode::Down);
        type_text(&mut state, "Retail");

        match state.handle_key(KeyCode::Char('s')) {
            Some(WizardAction::Save(client)) => {
                assert_eq!(client, NewClient::new("Acme", "Retail"));
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn missing_business_type_keeps_form_open() {
        let mut state = ClientWizardState::new();
        // 's' while editing is text, not a save
        type_text(&mut state, "Sims");

        assert!(state.handle_key(KeyCode::Char('s')).is_none());
        assert_eq!(state.form().name, "Sims");
        assert_eq!(state.message(), Some("business_type is required"));
    }

    #[test]
    fn field_navigation_wraps() {
        let mut state = ClientWizardState::new();
        state.handle_key(KeyCode::Up);
        assert_eq!(state.current_field(), 4);
        state.handle_key(KeyCode::Down);
        assert_eq!(state.current_field(), 0);
        assert!(matches!(state.handle_key(KeyCode::Esc), Some(WizardAction::Cancel)));
    }

    #[test]
    fn cells_show_dash_for_missing_values() {
        let client = Client {
            id: 1,
            name: "Acme".to_string(),
            business_type: "Retail".to_string(),
            address: None,
            phone: Some("555-0100".to_string()),
            email: None,
        };
        assert_eq!(client.cells(), ["Acme", "Retail", "-", "555-0100", "-"]);
    }
}
