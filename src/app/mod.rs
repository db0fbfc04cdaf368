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

//! Command-line state: one [`CmdLine`] owns the histories and the provider
//! for the lifetime of the host, and at most one interactive turn at a time.
//!
//! The host feeds key events in and acts on the returned [`Outcome`]; the
//! UI layer reads the active session back out for rendering.

pub mod completion;
pub mod history;
pub mod input;
pub mod notation;
pub mod provider;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::app::completion::{
    CompletionProvider, CompletionSession, CycleOrder,
};
use crate::app::history::{
    History, prefix_newer, prefix_older, sequential_newer, sequential_older,
};
use crate::app::input::EditSession;

/// What kind of input the active turn collects. Each submode has its own
/// prompt glyph, and command/search submodes feed separate histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submode {
    Command,
    SearchForward,
    SearchBackward,
    MenuCommand,
    MenuSearchForward,
    MenuSearchBackward,
    /// Free-form answer to a host question; opened via
    /// [`CmdLine::enter_prompt`] with a callback.
    Prompt,
}

impl Submode {
    fn prompt(self) -> &'static str {
        match self {
            Submode::Command | Submode::MenuCommand => ":",
            Submode::SearchForward | Submode::MenuSearchForward => "/",
            Submode::SearchBackward | Submode::MenuSearchBackward => "?",
            Submode::Prompt => "",
        }
    }

    fn is_menu(self) -> bool {
        matches!(
            self,
            Submode::MenuCommand | Submode::MenuSearchForward | Submode::MenuSearchBackward
        )
    }
}

/// Where a turn was opened from. Carried through to [`Outcome::Done`] so
/// the host can unwind whatever mode it suspended to hand over the
/// keyboard; a turn opened while a selection was being extended ends that
/// outer mode whichever way the turn finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    Normal,
    Selection,
}

/// What the host should do once a turn finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The turn ended without input to act on.
    Cancelled { submode: Submode },
    Command { line: String },
    Search { pattern: String, forward: bool },
    MenuCommand { line: String },
    MenuSearch { pattern: String, forward: bool },
    Prompt { response: String },
}

/// Result of feeding one key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The turn is still collecting input (or none is active).
    Pending,
    /// The turn finished; the session is gone.
    Done { origin: Origin, action: Action },
}

/// Invoked with the confirmed response of a [`Submode::Prompt`] turn;
/// dropped unused when the prompt is cancelled.
pub type PromptCallback = Box<dyn FnOnce(&str)>;

/// Snapshot of the active completion cycle for the wild-menu renderer.
/// Only produced while there are at least two real candidates.
#[derive(Debug, Clone, Copy)]
pub struct CompletionView<'a> {
    pub candidates: &'a [String],
    pub selected: Option<usize>,
}

struct Turn {
    submode: Submode,
    origin: Origin,
    session: EditSession,
    completion: Option<CompletionSession>,
    callback: Option<PromptCallback>,
}

impl Turn {
    fn stop_completion(&mut self) {
        self.completion = None;
        self.session.continue_completion = false;
    }
}

impl std::fmt::Debug for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Turn")
            .field("submode", &self.submode)
            .field("origin", &self.origin)
            .field("session", &self.session)
            .field("completion", &self.completion)
            .field("callback", &self.callback.as_ref().map(|_| ".."))
            .finish()
    }
}

/// The command-line subsystem. Histories and the completion provider outlive
/// individual turns; a turn exists between `enter` and confirm/cancel.
pub struct CmdLine {
    provider: Box<dyn CompletionProvider>,
    commands: History,
    searches: History,
    turn: Option<Turn>,
}

impl std::fmt::Debug for CmdLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmdLine")
            .field("commands", &self.commands)
            .field("searches", &self.searches)
            .field("turn", &self.turn)
            .finish_non_exhaustive()
    }
}

impl CmdLine {
    pub fn new(provider: Box<dyn CompletionProvider>, history_limit: usize) -> Self {
        Self {
            provider,
            commands: History::new(history_limit),
            searches: History::new(history_limit),
            turn: None,
        }
    }

    /// Open a turn in `submode` with `seed` already in the buffer, cursor at
    /// the end. `origin` is handed back untouched when the turn finishes.
    /// Only one turn may be active; the host's mode handling is expected to
    /// guarantee that, so a second `enter` is a bug.
    pub fn enter(&mut self, submode: Submode, seed: &str, origin: Origin) {
        assert!(self.turn.is_none(), "command-line turn already active");
        assert!(
            submode != Submode::Prompt,
            "prompt turns are opened via enter_prompt"
        );
        debug!(?submode, ?origin, "command line entered");
        self.turn = Some(Turn {
            submode,
            origin,
            session: EditSession::new(submode.prompt(), seed),
            completion: None,
            callback: None,
        });
    }

    /// Open a [`Submode::Prompt`] turn with a custom prompt text; `callback`
    /// runs with the response when the prompt is confirmed.
    pub fn enter_prompt(
        &mut self,
        prompt: &str,
        seed: &str,
        origin: Origin,
        callback: PromptCallback,
    ) {
        assert!(self.turn.is_none(), "command-line turn already active");
        debug!(prompt, ?origin, "prompt entered");
        self.turn = Some(Turn {
            submode: Submode::Prompt,
            origin,
            session: EditSession::new(prompt, seed),
            completion: None,
            callback: Some(callback),
        });
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.turn.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&EditSession> {
        self.turn.as_ref().map(|t| &t.session)
    }

    #[must_use]
    pub fn submode(&self) -> Option<Submode> {
        self.turn.as_ref().map(|t| t.submode)
    }

    /// Terminal rows the status line needs at `width`; zero when inactive.
    #[must_use]
    pub fn required_rows(&self, width: u16) -> u16 {
        self.session().map_or(0, |s| s.required_rows(width))
    }

    #[must_use]
    pub fn completion_view(&self) -> Option<CompletionView<'_>> {
        let completion = self.turn.as_ref()?.completion.as_ref()?;
        (completion.count() > 2).then(|| CompletionView {
            candidates: completion.displayed_candidates(),
            selected: completion.selected(),
        })
    }

    /// Feed one interactive key event.
    pub fn dispatch_key(&mut self, key: KeyEvent) -> Outcome {
        self.handle_key(key, false)
    }

    /// Feed scripted input, bracket notation included, as from a mapping.
    /// Confirms triggered this way do not touch the histories. Returns the
    /// actions of every turn the script finished.
    pub fn dispatch_script(&mut self, input: &str) -> Vec<Action> {
        let mut done = Vec::new();
        for key in notation::substitute(input) {
            if self.turn.is_none() {
                break;
            }
            if let Outcome::Done { action, .. } = self.handle_key(key, true) {
                done.push(action);
            }
        }
        done
    }

    /// Run one completion step in `order`; only [`Submode::Command`] turns
    /// complete.
    pub fn complete(&mut self, order: CycleOrder) {
        let Self { turn, provider, .. } = self;
        if let Some(turn) = turn.as_mut() {
            run_completion(turn, provider.as_mut(), order);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, mapped: bool) -> Outcome {
        if self.turn.is_none() {
            return Outcome::Pending;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        // Turn-ending keys first; they consume the turn itself.
        match key.code {
            KeyCode::Esc => return self.cancel(),
            KeyCode::Char('c') if ctrl => return self.cancel(),
            KeyCode::Enter => return self.confirm(mapped),
            KeyCode::Char('m') if ctrl => return self.confirm(mapped),
            KeyCode::Backspace | KeyCode::Char('h')
                if (key.code == KeyCode::Backspace || ctrl)
                    && self.turn.as_ref().is_some_and(|t| {
                        t.session.is_empty() && t.submode != Submode::Prompt
                    }) =>
            {
                return self.cancel();
            }
            _ => {}
        }

        let Self {
            turn,
            provider,
            commands,
            searches,
        } = self;
        let Some(turn) = turn.as_mut() else {
            return Outcome::Pending;
        };
        // Prompt and menu turns have no history; navigation keys are inert
        // there.
        let history: Option<&History> = match turn.submode {
            Submode::Command => Some(commands),
            Submode::SearchForward | Submode::SearchBackward => Some(searches),
            _ => None,
        };

        // Typing `/` right after a completed directory only closes the
        // cycle; the slash the completion inserted stays the only one.
        let slash_after_completed_dir = key.code == KeyCode::Char('/')
            && !ctrl
            && !alt
            && turn.session.continue_completion
            && turn.session.before_cursor().ends_with('/');

        let completion_key = matches!(key.code, KeyCode::Tab | KeyCode::BackTab)
            || (ctrl && key.code == KeyCode::Char('i'));
        if !completion_key {
            turn.stop_completion();
        }
        if slash_after_completed_dir {
            return Outcome::Pending;
        }

        match key.code {
            KeyCode::Tab => run_completion(turn, provider.as_mut(), CycleOrder::Forward),
            KeyCode::Char('i') if ctrl => {
                run_completion(turn, provider.as_mut(), CycleOrder::Forward);
            }
            KeyCode::BackTab => run_completion(turn, provider.as_mut(), CycleOrder::Backward),

            KeyCode::Backspace => turn.session.delete_before(),
            KeyCode::Char('h') if ctrl => turn.session.delete_before(),
            KeyCode::Delete => turn.session.delete_at(),
            KeyCode::Char('d') if ctrl => turn.session.delete_at(),
            KeyCode::Char('k') if ctrl => turn.session.kill_to_end(),
            KeyCode::Char('u') if ctrl => turn.session.kill_to_start(),
            KeyCode::Char('w') if ctrl => turn.session.delete_word_back(),
            KeyCode::Char('d') if alt => turn.session.delete_word_forward(),

            KeyCode::Left => turn.session.move_left(),
            KeyCode::Char('b') if ctrl => turn.session.move_left(),
            KeyCode::Right => turn.session.move_right(),
            KeyCode::Char('f') if ctrl => turn.session.move_right(),
            KeyCode::Home => turn.session.move_home(),
            KeyCode::Char('a') if ctrl => turn.session.move_home(),
            KeyCode::End => turn.session.move_end(),
            KeyCode::Char('e') if ctrl => turn.session.move_end(),
            KeyCode::Char('b') if alt => turn.session.word_left(),
            KeyCode::Char('f') if alt => turn.session.word_right(),

            KeyCode::Char('p') if ctrl => {
                if let Some(history) = history {
                    sequential_older(&mut turn.session, history);
                }
            }
            KeyCode::Char('n') if ctrl => {
                if let Some(history) = history {
                    sequential_newer(&mut turn.session, history);
                }
            }
            KeyCode::Up => {
                if let Some(history) = history {
                    prefix_older(&mut turn.session, history);
                }
            }
            KeyCode::Down => {
                if let Some(history) = history {
                    prefix_newer(&mut turn.session, history);
                }
            }

            KeyCode::Char(c) if !ctrl && !alt => turn.session.insert_char(c),
            _ => {}
        }
        Outcome::Pending
    }

    fn cancel(&mut self) -> Outcome {
        let Some(turn) = self.turn.take() else {
            return Outcome::Pending;
        };
        debug!(submode = ?turn.submode, origin = ?turn.origin, "command line cancelled");
        Outcome::Done {
            origin: turn.origin,
            action: Action::Cancelled {
                submode: turn.submode,
            },
        }
    }

    fn confirm(&mut self, mapped: bool) -> Outcome {
        let Some(turn) = self.turn.take() else {
            return Outcome::Pending;
        };
        let submode = turn.submode;
        let origin = turn.origin;
        let line = turn.session.text().to_owned();
        debug!(?submode, mapped, "command line confirmed");

        let action = match submode {
            Submode::Command | Submode::MenuCommand => {
                // Leading colons and blanks are scar tissue from mappings
                // like `:!cmd`; strip them before dispatch.
                let trimmed = line.trim_start_matches([':', ' ']).to_owned();
                if trimmed.is_empty() {
                    Action::Cancelled { submode }
                } else {
                    if !mapped && !submode.is_menu() {
                        self.commands.push(&trimmed);
                    }
                    if submode.is_menu() {
                        Action::MenuCommand { line: trimmed }
                    } else {
                        Action::Command { line: trimmed }
                    }
                }
            }
            Submode::SearchForward
            | Submode::SearchBackward
            | Submode::MenuSearchForward
            | Submode::MenuSearchBackward => {
                let forward = matches!(
                    submode,
                    Submode::SearchForward | Submode::MenuSearchForward
                );
                // An empty pattern repeats the previous search.
                let pattern = if line.is_empty() {
                    match self.searches.entry_from_newest(0) {
                        Some(previous) => previous.to_owned(),
                        None => {
                            return Outcome::Done {
                                origin,
                                action: Action::Cancelled { submode },
                            };
                        }
                    }
                } else {
                    line
                };
                if !mapped && !submode.is_menu() {
                    self.searches.push(&pattern);
                }
                if submode.is_menu() {
                    Action::MenuSearch { pattern, forward }
                } else {
                    Action::Search { pattern, forward }
                }
            }
            Submode::Prompt => {
                if let Some(callback) = turn.callback {
                    callback(&line);
                }
                Action::Prompt { response: line }
            }
        };
        Outcome::Done { origin, action }
    }
}

fn run_completion(turn: &mut Turn, provider: &mut dyn CompletionProvider, order: CycleOrder) {
    if turn.submode != Submode::Command {
        return;
    }
    if !turn.session.continue_completion || turn.completion.is_none() {
        let completion = CompletionSession::query(provider, turn.session.before_cursor());
        turn.session.continue_completion = completion.count() > 2;
        turn.completion = Some(completion);
    }
    if let Some(completion) = turn.completion.as_mut() {
        let offset = completion.replace_offset();
        let candidate = completion.advance(order).to_owned();
        turn.session.splice(offset, &candidate);
    }
    if !turn.session.continue_completion {
        turn.completion = None;
    }
}
