use tui::layout::Constraint;

use super::records::{Columns, RecordListState};
use super::wizard::{FormFields, WizardState};
use crate::error::ValidationError;
use crate::models::{Invoice, InvoiceForm, NewInvoice};

pub type InvoicesState = RecordListState<Invoice>;
pub type InvoiceWizardState = WizardState<InvoiceForm>;

impl Columns for Invoice {
    const HEADERS: &'static [&'static str] = &["Number", "Amount", "Status"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Percentage(40),
        Constraint::Percentage(30),
        Constraint::Percentage(30),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.invoice_number.clone(),
            self.amount.to_string(),
            self.status.clone(),
        ]
    }
}

impl FormFields for InvoiceForm {
    type Output = NewInvoice;

    const TITLE: &'static str = "Invoice";
    const LABELS: &'static [&'static str] = &["Invoice Number", "Amount", "Status"];

    fn field(&self, index: usize) -> Option<&str> {
        let value = match index {
            0 => &self.invoice_number,
            1 => &self.amount,
            2 => &self.status,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.invoice_number),
            1 => Some(&mut self.amount),
            2 => Some(&mut self.status),
            _ => None,
        }
    }

    fn validate(&self) -> Result<NewInvoice, ValidationError> {
        InvoiceForm::validate(self)
    }
}
