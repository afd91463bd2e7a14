use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::Entity;

// Represents the state of the main menu
pub struct MenuState {
    list_state: ListState,
}

pub enum MenuAction {
    Exit,
    Open(Entity),
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuState {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self { list_state }
    }

    pub fn next(&mut self) {
        let i = super::step(self.list_state.selected(), Entity::ALL.len(), true);
        self.list_state.select(i);
    }

    pub fn previous(&mut self) {
        let i = super::step(self.list_state.selected(), Entity::ALL.len(), false);
        self.list_state.select(i);
    }

    pub fn selected_entity(&self) -> Option<Entity> {
        self.list_state
            .selected()
            .and_then(|i| Entity::ALL.get(i).copied())
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<MenuAction> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Some(MenuAction::Exit),
            KeyCode::Down => self.next(),
            KeyCode::Up => self.previous(),
            KeyCode::Enter => return self.selected_entity().map(MenuAction::Open),
            _ => {}
        }
        None
    }
}

pub fn render_menu<B: Backend>(frame: &mut Frame<B>, state: &mut MenuState) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(3),
        ].as_ref())
        .split(size);

    let welcome = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(Span::styled(
            "Welcome",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(welcome, chunks[0]);

    let items: Vec<ListItem> = Entity::ALL
        .iter()
        .map(|entity| ListItem::new(Spans::from(vec![Span::raw(entity.title())])))
        .collect();

    let menu = List::new(items)
        .block(Block::default().title("Menu").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(menu, chunks[1], &mut state.list_state);

    let buttons = Paragraph::new("<Enter> Open | <Up/Down> Navigate | <Q> Quit")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[2]);
}

pub fn handle_input(state: &mut MenuState) -> Result<Option<MenuAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}
