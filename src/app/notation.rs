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

//! Bracket-notation translation: rewrites scripted input like `":e <c-w>x<cr>"`
//! into the literal key events the dispatcher consumes.
//!
//! Notations are closed `<...>` chunks, so lookup resolves the whole chunk at
//! once; a notation can never shadow a longer one regardless of table order.

use std::sync::OnceLock;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One row of the translation table.
#[derive(Debug)]
struct NotationEntry {
    /// The notation itself, lowercase, brackets included.
    notation: String,
    /// The key events substituted for the notation.
    keys: Vec<KeyEvent>,
    /// Raw input bytes consumed on a match; notations are ASCII.
    match_len: usize,
}

/// Longest notation in the table is `<pagedown>` (10 bytes); chunks longer
/// than this cannot match and are passed through literally.
const MAX_NOTATION_LEN: usize = 10;

static TABLE: OnceLock<Vec<NotationEntry>> = OnceLock::new();

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn modified(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

/// Builds the sorted table. Entry generation replaces the original's long
/// literal listing: every modifier family covers `a`..`z` plus the control
/// punctuation group, and the function keys cover `<f1>`..`<f24>` with
/// shift/ctrl/alt variants.
fn build_table() -> Vec<NotationEntry> {
    let mut table: Vec<NotationEntry> = Vec::with_capacity(512);

    let mut push = |notation: &str, keys: Vec<KeyEvent>| {
        debug_assert!(notation.len() <= MAX_NOTATION_LEN);
        table.push(NotationEntry {
            notation: notation.to_ascii_lowercase(),
            match_len: notation.len(),
            keys,
        });
    };

    push("<esc>", vec![key(KeyCode::Esc)]);
    push("<cr>", vec![key(KeyCode::Enter)]);
    push("<space>", vec![key(KeyCode::Char(' '))]);
    push("<tab>", vec![key(KeyCode::Tab)]);
    push("<s-tab>", vec![key(KeyCode::BackTab)]);
    push("<bs>", vec![key(KeyCode::Backspace)]);
    push("<del>", vec![key(KeyCode::Backspace)]);
    push("<delete>", vec![key(KeyCode::Delete)]);
    push("<home>", vec![key(KeyCode::Home)]);
    push("<end>", vec![key(KeyCode::End)]);
    push("<left>", vec![key(KeyCode::Left)]);
    push("<right>", vec![key(KeyCode::Right)]);
    push("<up>", vec![key(KeyCode::Up)]);
    push("<down>", vec![key(KeyCode::Down)]);
    push("<pageup>", vec![key(KeyCode::PageUp)]);
    push("<pagedown>", vec![key(KeyCode::PageDown)]);

    let ctrl_chars = ('a'..='z').chain(['[', '\\', ']', '^', '_']);
    for c in ctrl_chars {
        let ctrl = modified(KeyCode::Char(c), KeyModifiers::CONTROL);
        let ctrl_shift = modified(KeyCode::Char(c), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        push(&format!("<c-{c}>"), vec![ctrl]);
        push(&format!("<s-c-{c}>"), vec![ctrl_shift]);
        push(&format!("<c-s-{c}>"), vec![ctrl_shift]);
    }

    for c in 'a'..='z' {
        let alt = modified(KeyCode::Char(c), KeyModifiers::ALT);
        let alt_ctrl = modified(KeyCode::Char(c), KeyModifiers::ALT | KeyModifiers::CONTROL);
        // <a-..> and <m-..> are synonyms, as are the combined orderings.
        push(&format!("<a-{c}>"), vec![alt]);
        push(&format!("<m-{c}>"), vec![alt]);
        push(&format!("<a-c-{c}>"), vec![alt_ctrl]);
        push(&format!("<m-c-{c}>"), vec![alt_ctrl]);
        push(&format!("<c-a-{c}>"), vec![alt_ctrl]);
        push(&format!("<c-m-{c}>"), vec![alt_ctrl]);
    }

    for n in 1..=24u8 {
        push(&format!("<f{n}>"), vec![key(KeyCode::F(n))]);
    }
    for n in 1..=12u8 {
        push(&format!("<s-f{n}>"), vec![modified(KeyCode::F(n), KeyModifiers::SHIFT)]);
        push(&format!("<c-f{n}>"), vec![modified(KeyCode::F(n), KeyModifiers::CONTROL)]);
        push(&format!("<a-f{n}>"), vec![modified(KeyCode::F(n), KeyModifiers::ALT)]);
        push(&format!("<m-f{n}>"), vec![modified(KeyCode::F(n), KeyModifiers::ALT)]);
    }

    table.sort_by(|a, b| a.notation.cmp(&b.notation));
    table
}

fn table() -> &'static [NotationEntry] {
    TABLE.get_or_init(build_table)
}

/// The `<...>` chunk starting at the head of `rest`, if one closes within the
/// longest possible notation. Bounding the scan keeps an unmatched `<` from
/// turning substitution quadratic.
fn bracket_chunk(rest: &str) -> Option<&str> {
    for (i, c) in rest.char_indices().take(MAX_NOTATION_LEN) {
        if c == '>' && i > 0 {
            return Some(&rest[..=i]);
        }
    }
    None
}

/// Rewrite `input` by substituting every recognized notation with its key
/// events; everything else becomes a literal `Char` event. Never fails, and
/// the output never has more events than `input` has characters.
pub fn substitute(input: &str) -> Vec<KeyEvent> {
    let table = table();
    let mut out = Vec::with_capacity(input.chars().count());
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        if c == '<'
            && let Some(chunk) = bracket_chunk(rest)
        {
            let lowered = chunk.to_ascii_lowercase();
            if let Ok(i) = table.binary_search_by(|e| e.notation.as_str().cmp(lowered.as_str())) {
                out.extend(table[i].keys.iter().copied());
                rest = &rest[table[i].match_len..];
                continue;
            }
        }
        out.push(key(KeyCode::Char(c)));
        rest = &rest[c.len_utf8()..];
    }
    out
}
