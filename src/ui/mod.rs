pub mod clients;
pub mod invoices;
pub mod menu;
pub mod projects;
pub mod records;
pub mod wizard;

use crossterm::event::KeyCode;
use tracing::warn;
use tui::layout::{Constraint, Direction, Layout, Rect};

use crate::error::StoreError;

/// Index after moving one step through a list of `len` items, wrapping at
/// both ends.
pub fn step(selected: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let i = match selected {
        Some(i) if forward => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    Some(i)
}

/// Apply a key press to a text field being edited
pub fn edit_text(value: &mut String, key: KeyCode) {
    match key {
        KeyCode::Char(c) => value.push(c),
        KeyCode::Backspace => {
            value.pop();
        }
        _ => {}
    }
}

/// Split a failed add into a message the form can show, or a fatal error.
pub fn add_failure_message(err: StoreError) -> anyhow::Result<String> {
    match err {
        StoreError::UniqueConstraintViolation { entity, detail } => {
            warn!(%entity, %detail, "add rejected by unique constraint");
            Ok(format!("That {entity} already exists"))
        }
        other => Err(other.into()),
    }
}

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entity;

    #[test]
    fn step_wraps_both_ways() {
        assert_eq!(step(Some(2), 3, true), Some(0));
        assert_eq!(step(Some(0), 3, false), Some(2));
        assert_eq!(step(Some(1), 3, true), Some(2));
        assert_eq!(step(None, 3, false), Some(0));
        assert_eq!(step(Some(0), 0, true), None);
    }

    #[test]
    fn edit_text_appends_and_deletes() {
        let mut value = String::from("ab");
        edit_text(&mut value, KeyCode::Char('c'));
        edit_text(&mut value, KeyCode::Backspace);
        edit_text(&mut value, KeyCode::Backspace);
        edit_text(&mut value, KeyCode::Left);
        assert_eq!(value, "a");
    }

    #[test]
    fn duplicate_is_recoverable_other_errors_are_not() {
        let duplicate = StoreError::UniqueConstraintViolation {
            entity: Entity::Invoice,
            detail: "UNIQUE constraint failed: invoices.invoice_number".to_string(),
        };
        assert_eq!(
            add_failure_message(duplicate).unwrap(),
            "That invoice already exists"
        );

        let fatal = StoreError::Database(sqlx::Error::RowNotFound);
        assert!(add_failure_message(fatal).is_err());
    }
}
