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

//! The completion pipeline: a provider turns the text left of the cursor
//! into a candidate list, and a [`CompletionSession`] cycles through it.
//!
//! The final candidate is always the provider's fallback — the original
//! token, escaped — so a full cycle returns the line to what was typed.

use tracing::debug;

/// Direction of one completion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOrder {
    Forward,
    Backward,
}

/// A provider's answer: the candidates plus the character offset into the
/// line at which every candidate is spliced in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub candidates: Vec<String>,
    pub replace_offset: usize,
}

/// Produces completion candidates for the text left of the cursor.
///
/// The contract: `candidates` is never empty — its last element is the
/// original token escaped, acting as the cycle's "back to what I typed"
/// stop — and `replace_offset` never exceeds the cursor's character index.
pub trait CompletionProvider {
    fn complete(&mut self, before_cursor: &str) -> Completion;
}

/// One active completion cycle. The cursor starts on the fallback entry, so
/// the first forward step yields the first candidate and the first backward
/// step yields the last real one.
#[derive(Debug)]
pub struct CompletionSession {
    candidates: Vec<String>,
    cursor: usize,
    replace_offset: usize,
}

impl CompletionSession {
    /// Ask `provider` for candidates and open a cycle over them.
    pub fn query(provider: &mut dyn CompletionProvider, before_cursor: &str) -> Self {
        let mut completion = provider.complete(before_cursor);
        debug!(
            candidates = completion.candidates.len(),
            offset = completion.replace_offset,
            "completion query"
        );
        debug_assert!(!completion.candidates.is_empty(), "provider broke its contract");
        if completion.candidates.is_empty() {
            completion.candidates.push(String::new());
            completion.replace_offset = 0;
        }
        let cursor = completion.candidates.len() - 1;
        Self {
            candidates: completion.candidates,
            cursor,
            replace_offset: completion.replace_offset,
        }
    }

    /// Step the cycle and return the candidate to splice in. Wraps in both
    /// directions, passing through the fallback entry.
    pub fn advance(&mut self, order: CycleOrder) -> &str {
        let len = self.candidates.len();
        self.cursor = match order {
            CycleOrder::Forward => (self.cursor + 1) % len,
            CycleOrder::Backward => (self.cursor + len - 1) % len,
        };
        &self.candidates[self.cursor]
    }

    #[must_use]
    pub fn replace_offset(&self) -> usize {
        self.replace_offset
    }

    /// Candidate count including the fallback entry.
    #[must_use]
    pub fn count(&self) -> usize {
        self.candidates.len()
    }

    /// The candidates without the trailing fallback, for display.
    #[must_use]
    pub fn displayed_candidates(&self) -> &[String] {
        &self.candidates[..self.candidates.len() - 1]
    }

    /// Index of the selected displayed candidate; `None` while the cycle sits
    /// on the fallback entry.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        (self.cursor + 1 < self.candidates.len()).then_some(self.cursor)
    }
}

/// Character offset at which the token under completion begins: one past the
/// last whitespace not protected by a backslash.
#[must_use]
pub fn token_start(before_cursor: &str) -> usize {
    let chars: Vec<char> = before_cursor.chars().collect();
    let mut start = 0;
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' {
            i += 2;
            continue;
        }
        if chars[i].is_whitespace() {
            start = i + 1;
        }
        i += 1;
    }
    start
}

/// Strip the backslash escaping [`token_start`] honors, yielding the literal
/// fragment a provider matches against.
#[must_use]
pub fn unescape(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
