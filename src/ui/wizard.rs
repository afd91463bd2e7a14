use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tracing::warn;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::error::ValidationError;

/// Raw text fields behind an add form
pub trait FormFields: Default {
    type Output;

    /// Singular record name shown in the title
    const TITLE: &'static str;
    const LABELS: &'static [&'static str];

    fn field(&self, index: usize) -> Option<&str>;
    fn field_mut(&mut self, index: usize) -> Option<&mut String>;
    fn validate(&self) -> Result<Self::Output, ValidationError>;
}

pub enum WizardAction<T> {
    Cancel,
    Save(T),
}

pub struct WizardState<F> {
    form: F,
    current_field: usize,
    editing: bool,
    message: Option<String>,
}

impl<F: FormFields> Default for WizardState<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FormFields> WizardState<F> {
    pub fn new() -> Self {
        Self {
            form: F::default(),
            current_field: 0,
            editing: false,
            message: None,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn current_field(&self) -> usize {
        self.current_field
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Show a problem with the last save attempt. The fields stay as typed.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % F::LABELS.len();
    }

    pub fn previous_field(&mut self) {
        self.current_field = (self.current_field + F::LABELS.len() - 1) % F::LABELS.len();
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        if let Some(value) = self.form.field_mut(self.current_field) {
            super::edit_text(value, key);
        }
    }

    fn try_save(&mut self) -> Option<WizardAction<F::Output>> {
        match self.form.validate() {
            Ok(record) => Some(WizardAction::Save(record)),
            Err(err) => {
                warn!(form = F::TITLE, error = %err, "input rejected");
                self.message = Some(err.to_string());
                None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<WizardAction<F::Output>> {
        match key {
            KeyCode::Esc => {
                if self.editing {
                    self.toggle_editing();
                } else {
                    return Some(WizardAction::Cancel);
                }
            }
            KeyCode::Enter => {
                self.toggle_editing();
            }
            KeyCode::Up if !self.editing => {
                self.previous_field();
            }
            KeyCode::Down if !self.editing => {
                self.next_field();
            }
            KeyCode::Char('s') if !self.editing => {
                return self.try_save();
            }
            _ if self.editing => {
                self.edit_current_field(key);
            }
            _ => {}
        }
        None
    }
}

pub fn render_wizard<B: Backend, F: FormFields>(f: &mut Frame<B>, state: &mut WizardState<F>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new(format!("New {}", F::TITLE))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let status = Paragraph::new(state.message().unwrap_or(""))
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[2]);

    let help_text = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save | Esc - Cancel"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

fn render_form<B: Backend, F: FormFields>(f: &mut Frame<B>, state: &WizardState<F>, area: Rect) {
    let items: Vec<ListItem> = F::LABELS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let value = state.form.field(i).unwrap_or("");
            let selected = i == state.current_field;

            let content = if selected && state.editing {
                Spans::from(vec![
                    Span::styled(format!("{}: ", name), Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("{}|", value),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{}: ", name), style),
                    Span::raw(value.to_string()),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} Details", F::TITLE)),
        )
        .highlight_style(Style::default().fg(Color::Yellow));

    f.render_widget(form_list, area);
}

pub fn handle_input<F: FormFields>(state: &mut WizardState<F>) -> Result<Option<WizardAction<F::Output>>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }

    Ok(None)
}
