/// Ratatui drawing of the game page: board cells, status line, key help.
use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::core::page::{Coord, Page, POINTER_CLASS};

const CELL_WIDTH: u16 = 4;

#[derive(Debug)]
pub struct BoardRenderer;

impl BoardRenderer {
    pub fn render(frame: &mut Frame, page: &Page, cursor: Coord, title: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Message
                Constraint::Length(1), // Keys
            ])
            .split(frame.area());

        let header = Paragraph::new(title.to_string())
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(header, chunks[0]);

        match page.dimensions() {
            Some((rows, cols)) => {
                frame.render_widget(Self::build_board_widget(page, rows, cols, cursor), chunks[1]);
            }
            None => {
                let waiting = Paragraph::new("Waiting for the game board...")
                    .block(Block::default().borders(Borders::ALL).title("Board"))
                    .alignment(Alignment::Center);
                frame.render_widget(waiting, chunks[1]);
            }
        }

        let message = Paragraph::new(page.message().unwrap_or_default())
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(message, chunks[2]);

        let keys = Paragraph::new("[←↑↓→] Move  [Enter/Space] Play  [J] Rejoin  [Q/Esc] Quit")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        frame.render_widget(keys, chunks[3]);
    }

    fn build_board_widget(page: &Page, rows: usize, cols: usize, cursor: Coord) -> Table<'static> {
        let mut header = vec![Cell::from("")];
        header.extend((0..cols).map(|c| Cell::from(column_label(c))));

        let mut table_rows = vec![Row::new(header).style(Style::default().fg(Color::DarkGray))];

        for row in 0..rows {
            let mut cells = vec![Cell::from(row_label(row)).style(Style::default().fg(Color::DarkGray))];

            for col in 0..cols {
                let coord = Coord::new(row, col);
                let (text, clickable) = match page.cell(coord) {
                    Some(el) => (el.text_content(), el.has_class(POINTER_CLASS)),
                    None => (String::new(), false),
                };

                let mut style = if clickable {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::White)
                };
                if coord == cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }

                cells.push(Cell::from(text).style(style));
            }

            table_rows.push(Row::new(cells));
        }

        Table::new(table_rows, std::iter::repeat(Constraint::Length(CELL_WIDTH)).take(cols + 1))
            .block(Block::default().borders(Borders::ALL).title("Board"))
    }
}

/// Columns read A, B, C...
pub fn column_label(col: usize) -> String {
    label(col, b'A')
}

/// Rows read a, b, c...
pub fn row_label(row: usize) -> String {
    label(row, b'a')
}

fn label(index: usize, base: u8) -> String {
    if index < 26 {
        ((base + index as u8) as char).to_string()
    } else {
        index.to_string()
    }
}
