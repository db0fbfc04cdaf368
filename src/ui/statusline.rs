// cmdbar — interactive command line for a keyboard-driven file manager
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Status-line rendering: the prompt and the line being edited, wrapped at
//! character granularity so display columns stay continuous across rows.
//! The insertion point is placed with the terminal cursor, not a styled cell.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

use crate::app::input::EditSession;

use super::theme;

/// Draw `session` into `area` and park the cursor on the insertion point.
/// `area` is expected to be [`EditSession::required_rows`] rows tall.
pub fn render(frame: &mut Frame, area: Rect, session: &EditSession) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let rows = wrap_columns(
        &format!("{}{}", session.prompt(), session.text()),
        usize::from(area.width),
    );
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(row, text)| {
            if row == 0 && !session.prompt().is_empty() {
                // The prompt only ever occupies the head of the first row.
                let split = session.prompt().len().min(text.len());
                Line::from(vec![
                    Span::styled(text[..split].to_owned(), Style::default().fg(theme::PROMPT)),
                    Span::raw(text[split..].to_owned()),
                ])
            } else {
                Line::from(text.clone())
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);

    let (cursor_row, cursor_col) = cursor_position(session, area.width);
    if cursor_row < area.height {
        frame.set_cursor_position((area.x + cursor_col, area.y + cursor_row));
    }
}

/// Row and column of the insertion point inside the status-line area. Pure
/// arithmetic over the continuous display column.
#[must_use]
pub fn cursor_position(session: &EditSession, width: u16) -> (u16, u16) {
    if width == 0 {
        return (0, 0);
    }
    let width = usize::from(width);
    let col = session.cursor_col();
    let row = u16::try_from(col / width).unwrap_or(u16::MAX);
    let col = u16::try_from(col % width).unwrap_or(0);
    (row, col)
}

/// Split `text` into rows of at most `width` display columns, breaking at
/// character boundaries. A character too wide for the remaining columns
/// starts the next row.
fn wrap_columns(text: &str, width: usize) -> Vec<String> {
    let mut rows = vec![String::new()];
    let mut used = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width && used > 0 {
            rows.push(String::new());
            used = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(c);
        }
        used += w;
    }
    rows
}
