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

//! Per-submode history log plus the two navigation strategies over it:
//! sequential cycling and prefix search anchored at the line's length when
//! the search began.

use crate::app::input::{EditSession, HistoryMode};

/// An append-biased history log. Entries are stored oldest to newest;
/// navigation addresses them by distance from the newest entry so that
/// position `0` is always the most recent confirm.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
    limit: usize,
}

impl History {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a confirmed line. Empty lines are not recorded; re-confirming
    /// an existing entry moves it to the front instead of duplicating it.
    /// The oldest entries fall off once `limit` is exceeded; a limit of zero
    /// disables recording entirely.
    pub fn push(&mut self, entry: &str) {
        if self.limit == 0 || entry.is_empty() {
            return;
        }
        if let Some(existing) = self.entries.iter().position(|e| e == entry) {
            self.entries.remove(existing);
        }
        self.entries.push(entry.to_owned());
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
    }

    /// The entry `pos` steps back from the newest one.
    #[must_use]
    pub fn entry_from_newest(&self, pos: usize) -> Option<&str> {
        let idx = self.entries.len().checked_sub(1 + pos)?;
        self.entries.get(idx).map(String::as_str)
    }

    /// Newest-first view, for hosts that display their history.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().rev().map(String::as_str)
    }
}

/// On the first navigation of a turn, snapshot the line so leaving history
/// can restore it. Switching strategies re-anchors the prefix length at the
/// current line.
fn begin_navigation(session: &mut EditSession, mode: HistoryMode) {
    if session.history_mode == HistoryMode::None {
        session.saved_line = Some(session.text().to_owned());
        session.history_pos = None;
    }
    if session.history_mode != mode {
        session.prefix_len = session.len();
        session.history_mode = mode;
    }
}

fn land(session: &mut EditSession, pos: usize, entry: &str) {
    session.history_pos = Some(pos);
    session.set_line(entry);
}

/// Move one entry towards the oldest. At the oldest entry (or with an empty
/// history) the line is left untouched.
pub fn sequential_older(session: &mut EditSession, history: &History) {
    begin_navigation(session, HistoryMode::Sequential);
    let next = match session.history_pos {
        None => 0,
        Some(pos) => pos + 1,
    };
    if let Some(entry) = history.entry_from_newest(next) {
        land(session, next, entry);
    }
}

/// Move one entry towards the newest. Stepping past the newest entry
/// restores the pre-navigation snapshot and leaves history.
pub fn sequential_newer(session: &mut EditSession, history: &History) {
    begin_navigation(session, HistoryMode::Sequential);
    match session.history_pos {
        None => {}
        Some(0) => restore_snapshot(session),
        Some(pos) => {
            if let Some(entry) = history.entry_from_newest(pos - 1) {
                land(session, pos - 1, entry);
            }
        }
    }
}

/// Jump to the nearest older entry sharing the anchored prefix; a miss is a
/// silent no-op.
pub fn prefix_older(session: &mut EditSession, history: &History) {
    begin_navigation(session, HistoryMode::PrefixSearch);
    let prefix = anchored_prefix(session);
    let start = match session.history_pos {
        None => 0,
        Some(pos) => pos + 1,
    };
    for pos in start..history.len() {
        if let Some(entry) = history.entry_from_newest(pos)
            && entry.starts_with(&prefix)
        {
            land(session, pos, entry);
            return;
        }
    }
}

/// Jump to the nearest newer entry sharing the anchored prefix; past the
/// newest match, restore the snapshot and leave history.
pub fn prefix_newer(session: &mut EditSession, history: &History) {
    begin_navigation(session, HistoryMode::PrefixSearch);
    let Some(current) = session.history_pos else {
        return;
    };
    let prefix = anchored_prefix(session);
    for pos in (0..current).rev() {
        if let Some(entry) = history.entry_from_newest(pos)
            && entry.starts_with(&prefix)
        {
            land(session, pos, entry);
            return;
        }
    }
    restore_snapshot(session);
}

/// The first `prefix_len` characters of the current line. Entries landed on
/// during the search share this prefix, so it is stable across jumps.
fn anchored_prefix(session: &EditSession) -> String {
    session.text().chars().take(session.prefix_len).collect()
}

fn restore_snapshot(session: &mut EditSession) {
    if let Some(saved) = session.saved_line.clone() {
        session.set_line(&saved);
    }
    session.history_pos = None;
}
