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

//! An embeddable command-line subsystem for keyboard-driven terminal
//! applications: a `:`/`/`/`?` style input bar with per-submode history,
//! tab completion over the filesystem and `$PATH`, bracket-notation
//! scripting, and ratatui widgets for the status line and wild menu.
//!
//! The host owns a [`app::CmdLine`], opens a turn when the user presses a
//! trigger key, forwards key events, and acts on the returned
//! [`app::Outcome`]. Rendering is read-only over the active session.

pub mod app;
pub mod ui;

pub use app::{Action, CmdLine, CompletionView, Origin, Outcome, PromptCallback, Submode};
