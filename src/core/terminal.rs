/// Keyboard side of the terminal page: a cursor over the board standing in
/// for the mouse.
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::core::page::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    /// Click the cell under the cursor
    Click(Coord),
    /// Take a fresh identity and join again
    Rejoin,
    Moved,
    Ignored,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BoardCursor {
    pos: Coord,
}

impl BoardCursor {
    pub fn position(&self) -> Coord {
        self.pos
    }

    /// Map one key press onto the board of size `dims` (rows, cols)
    pub fn handle_key(&mut self, key: KeyEvent, dims: Option<(usize, usize)>) -> KeyAction {
        if key.kind != KeyEventKind::Press {
            return KeyAction::Ignored;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyAction::Quit,
            KeyCode::Char('j') => return KeyAction::Rejoin,
            _ => {}
        }

        let Some((rows, cols)) = dims else {
            return KeyAction::Ignored;
        };
        if rows == 0 || cols == 0 {
            return KeyAction::Ignored;
        }
        // The board may have shrunk since the last key
        self.pos.row = self.pos.row.min(rows - 1);
        self.pos.col = self.pos.col.min(cols - 1);

        match key.code {
            KeyCode::Up => self.pos.row = self.pos.row.saturating_sub(1),
            KeyCode::Down => self.pos.row = (self.pos.row + 1).min(rows - 1),
            KeyCode::Left => self.pos.col = self.pos.col.saturating_sub(1),
            KeyCode::Right => self.pos.col = (self.pos.col + 1).min(cols - 1),
            KeyCode::Enter | KeyCode::Char(' ') => return KeyAction::Click(self.pos),
            _ => return KeyAction::Ignored,
        }
        KeyAction::Moved
    }
}
