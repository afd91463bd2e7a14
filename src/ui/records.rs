use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::db::Store;
use crate::models::Record;

/// How a record type is laid out as a table row
pub trait Columns: Record {
    const HEADERS: &'static [&'static str];
    const WIDTHS: &'static [Constraint];

    fn cells(&self) -> Vec<String>;
}

// Represents the state of a record list screen
pub struct RecordListState<R> {
    records: Vec<R>,
    table_state: TableState,
    show_delete_confirmation: bool,
}

pub enum ListAction {
    Back,
    New,
    Delete(i64), // Contains record id
}

impl<R: Record> RecordListState<R> {
    pub fn new(records: Vec<R>) -> Self {
        let mut table_state = TableState::default();
        if !records.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            records,
            table_state,
            show_delete_confirmation: false,
        }
    }

    /// Re-read the table and build a fresh screen state
    pub async fn load(store: &Store) -> Result<Self> {
        let records = store.list_all::<R>().await?;
        Ok(Self::new(records))
    }

    pub fn next(&mut self) {
        if let Some(i) = super::step(self.table_state.selected(), self.records.len(), true) {
            self.table_state.select(Some(i));
        }
    }

    pub fn previous(&mut self) {
        if let Some(i) = super::step(self.table_state.selected(), self.records.len(), false) {
            self.table_state.select(Some(i));
        }
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.show_delete_confirmation
    }

    pub fn selected(&self) -> Option<&R> {
        self.table_state.selected().and_then(|i| self.records.get(i))
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected().map(|record| record.id())
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<ListAction> {
        if self.show_delete_confirmation {
            match key {
                KeyCode::Char('y') => {
                    self.toggle_delete_confirmation();
                    return self.selected_id().map(ListAction::Delete);
                }
                KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => {
                    self.toggle_delete_confirmation();
                }
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Some(ListAction::Back),
            KeyCode::Char('n') => return Some(ListAction::New),
            KeyCode::Char('d') => {
                if self.selected().is_some() {
                    self.toggle_delete_confirmation();
                }
            }
            KeyCode::Down => self.next(),
            KeyCode::Up => self.previous(),
            _ => {}
        }
        None
    }
}

pub fn render_records<B: Backend, R: Columns>(frame: &mut Frame<B>, state: &mut RecordListState<R>) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
        ].as_ref())
        .split(size);

    let header_cells = R::HEADERS
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells)
        .style(Style::default())
        .height(1)
        .bottom_margin(1);

    let rows = state
        .records
        .iter()
        .map(|record| Row::new(record.cells().into_iter().map(Cell::from)).height(1));

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title(R::ENTITY.title()).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(R::WIDTHS);

    frame.render_stateful_widget(table, chunks[0], &mut state.table_state);

    let buttons_text = if state.selected().is_some() {
        "<N> New | <D> Delete | <Up/Down> Navigate | <Esc> Back to Menu"
    } else {
        "<N> New | <Esc> Back to Menu"
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[1]);

    if state.show_delete_confirmation {
        render_delete_confirmation::<B, R>(frame, size);
    }
}

fn render_delete_confirmation<B: Backend, R: Record>(frame: &mut Frame<B>, size: Rect) {
    let popup_area = super::centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(format!("Are you sure you want to delete this {}?", R::ENTITY)),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

pub fn handle_input<R: Record>(state: &mut RecordListState<R>) -> Result<Option<ListAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Client;

    fn client(id: i64, name: &str) -> Client {
        Client {
            id,
            name: name.to_string(),
            business_type: "Retail".to_string(),
            address: None,
            phone: None,
            email: None,
        }
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut state = RecordListState::<Client>::new(vec![]);
        state.next();
        assert!(state.selected().is_none());
        assert!(state.handle_key(KeyCode::Char('d')).is_none());
        assert!(!state.is_confirming_delete());
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut state = RecordListState::new(vec![client(4, "Acme"), client(9, "Globex")]);
        state.handle_key(KeyCode::Down);

        assert!(state.handle_key(KeyCode::Char('d')).is_none());
        assert!(state.is_confirming_delete());
        // navigation is ignored while the popup is open
        assert!(state.handle_key(KeyCode::Up).is_none());

        assert!(matches!(
            state.handle_key(KeyCode::Char('y')),
            Some(ListAction::Delete(9))
        ));
        assert!(!state.is_confirming_delete());
    }

    #[test]
    fn cancelled_confirmation_deletes_nothing() {
        let mut state = RecordListState::new(vec![client(1, "Acme")]);
        state.handle_key(KeyCode::Char('d'));
        assert!(state.handle_key(KeyCode::Esc).is_none());
        assert!(!state.is_confirming_delete());
        assert!(matches!(state.handle_key(KeyCode::Esc), Some(ListAction::Back)));
        assert!(matches!(state.handle_key(KeyCode::Char('n')), Some(ListAction::New)));
    }
}
