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

//! The wild menu: a single row of completion candidates above the status
//! line. Selecting the first candidate, or landing back on the typed text,
//! rewinds the viewport; wrapping backward onto the last candidate pulls
//! the tail of the list into view instead of scrolling one step at a time.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::CompletionView;

use super::theme;

/// Columns between neighboring candidates.
const GAP: usize = 2;
/// Columns a scroll marker occupies.
const MARKER: usize = 2;

/// One row of the menu after viewport clipping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildRow<'a> {
    /// Candidates scrolled off to the left.
    pub left_marker: bool,
    /// Candidates that did not fit on the right.
    pub right_marker: bool,
    /// Visible candidates as `(index, text)`.
    pub items: Vec<(usize, &'a str)>,
}

/// Viewport state of the wild menu. Lives with the host so the scroll
/// position persists across frames; [`WildMenu::reset`] belongs next to the
/// host's completion teardown.
#[derive(Debug, Default)]
pub struct WildMenu {
    visible_start: usize,
}

impl WildMenu {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.visible_start = 0;
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, view: &CompletionView<'_>) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let row = self.layout(view.candidates, view.selected, usize::from(area.width));

        let mut spans: Vec<Span> = Vec::with_capacity(row.items.len() * 2 + 2);
        if row.left_marker {
            spans.push(Span::styled(
                theme::MARKER_LEFT,
                Style::default().fg(theme::WILD_MARKER),
            ));
        }
        for (slot, (index, text)) in row.items.iter().enumerate() {
            if slot > 0 {
                spans.push(Span::raw("  "));
            }
            let style = candidate_style(view.selected == Some(*index));
            spans.push(Span::styled((*text).to_owned(), style));
        }
        if row.right_marker {
            spans.push(Span::styled(
                theme::MARKER_RIGHT,
                Style::default().fg(theme::WILD_MARKER),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Clip the candidate list to `width` columns around `selected`.
    fn layout<'a>(
        &mut self,
        candidates: &'a [String],
        selected: Option<usize>,
        width: usize,
    ) -> WildRow<'a> {
        let count = candidates.len();
        if count == 0 {
            return WildRow {
                left_marker: false,
                right_marker: false,
                items: Vec::new(),
            };
        }
        self.visible_start = self.visible_start.min(count);
        // The first candidate and the typed text both rewind to the start.
        if matches!(selected, None | Some(0)) {
            self.visible_start = 0;
        }
        if let Some(s) = selected {
            // Wrapping backward onto the last candidate starts past the
            // end; the shrink below pulls the viewport left until the tail
            // of the list fills the row.
            if self.visible_start == 0 && s + 1 == count {
                self.visible_start = count;
            }
            if s < self.visible_start {
                self.shrink_left(candidates, width);
            }
        }
        let row = fill_from(candidates, self.visible_start, width);
        if let Some(s) = selected
            && !row.items.iter().any(|(i, _)| *i == s)
        {
            // The selected candidate is wider than what the viewport kept;
            // re-anchor directly on it.
            self.visible_start = s;
            return fill_from(candidates, self.visible_start, width);
        }
        row
    }

    /// Walk the viewport left, spending `width` columns on the candidates
    /// it passes, and step back right once when the last one did not fit.
    fn shrink_left(&mut self, candidates: &[String], width: usize) {
        let mut remaining = width;
        while self.visible_start > 0 && remaining > MARKER {
            self.visible_start -= 1;
            let text = candidates[self.visible_start].as_str();
            let need = UnicodeWidthStr::width(text)
                + if self.visible_start > 0 { GAP } else { 0 };
            remaining = remaining.saturating_sub(need);
        }
        if remaining < MARKER {
            self.visible_start += 1;
        }
    }
}

fn candidate_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED | Modifier::UNDERLINED)
    } else {
        Style::default().fg(theme::DIM)
    }
}

/// Greedily place candidates from `start` into `width` columns, reserving
/// marker space on the sides that scroll.
fn fill_from(candidates: &[String], start: usize, width: usize) -> WildRow<'_> {
    let left_marker = start > 0;
    let mut avail = width.saturating_sub(if left_marker { MARKER } else { 0 });
    let mut items: Vec<(usize, &str)> = Vec::new();
    let mut next = start;
    while next < candidates.len() {
        let text = candidates[next].as_str();
        let need = UnicodeWidthStr::width(text) + if items.is_empty() { 0 } else { GAP };
        if need > avail {
            break;
        }
        avail -= need;
        items.push((next, text));
        next += 1;
    }

    let mut right_marker = next < candidates.len();
    // The marker replaces trailing items rather than overflowing the row;
    // the viewport logic keeps at least the selected candidate.
    while right_marker && avail < MARKER && items.len() > 1 {
        if let Some((_, text)) = items.pop() {
            avail += UnicodeWidthStr::width(text) + GAP;
        }
        right_marker = true;
    }
    WildRow {
        left_marker,
        right_marker,
        items,
    }
}
