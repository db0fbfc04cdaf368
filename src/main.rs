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

//! `cmdbar-demo`: a minimal host that wires the command line, wild menu and
//! status line into a full-screen TUI. `:` opens a command, `/` and `?` open
//! searches, `p` opens a rename-style prompt, `q` quits.

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::DefaultTerminal;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cmdbar::app::provider::FsCompleter;
use cmdbar::ui::{statusline, theme, wildmenu::WildMenu};
use cmdbar::{Action, CmdLine, Origin, Outcome, Submode};

#[derive(Parser, Debug)]
#[command(name = "cmdbar-demo", version, about = "Interactive demo of the cmdbar command line")]
struct Args {
    /// Entries kept per history category.
    #[arg(long, default_value_t = 100)]
    history_limit: usize,
    /// Append logs to this file; set RUST_LOG to pick levels.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum DemoError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("`echo` needs an argument")]
    MissingArgument,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    let terminal = ratatui::init();
    let result = run(terminal, &args);
    ratatui::restore();
    result
}

/// File-only logging; a TUI cannot share stderr with its own frames.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(mut terminal: DefaultTerminal, args: &Args) -> Result<()> {
    let base_dir = std::env::current_dir().context("reading working directory")?;
    let mut demo = Demo {
        cmdline: CmdLine::new(Box::new(FsCompleter::new(base_dir)), args.history_limit),
        wildmenu: WildMenu::new(),
        log: Rc::new(RefCell::new(Vec::new())),
        should_quit: false,
    };

    while !demo.should_quit {
        terminal.draw(|frame| demo.render(frame))?;
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            demo.handle_key(key);
        }
    }
    Ok(())
}

struct Demo {
    cmdline: CmdLine,
    wildmenu: WildMenu,
    log: Rc<RefCell<Vec<String>>>,
    should_quit: bool,
}

impl Demo {
    fn handle_key(&mut self, key: KeyEvent) {
        if self.cmdline.is_active() {
            if let Outcome::Done { action, .. } = self.cmdline.dispatch_key(key) {
                self.apply(action);
            }
            if self.cmdline.completion_view().is_none() {
                self.wildmenu.reset();
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(':') => self.cmdline.enter(Submode::Command, "", Origin::Normal),
            KeyCode::Char('/') => self.cmdline.enter(Submode::SearchForward, "", Origin::Normal),
            KeyCode::Char('?') => self.cmdline.enter(Submode::SearchBackward, "", Origin::Normal),
            KeyCode::Char('p') => {
                let log = Rc::clone(&self.log);
                self.cmdline.enter_prompt(
                    "New name: ",
                    "old_name.txt",
                    Origin::Normal,
                    Box::new(move |response| {
                        log.borrow_mut().push(format!("renamed to {response}"));
                    }),
                );
            }
            _ => {}
        }
    }

    fn apply(&mut self, action: Action) {
        debug!(?action, "turn finished");
        match action {
            Action::Cancelled { .. } => {}
            Action::Command { line } | Action::MenuCommand { line } => {
                if line == "q" || line == "quit" {
                    self.should_quit = true;
                    return;
                }
                let entry = match run_command(&line) {
                    Ok(output) => output,
                    Err(err) => format!("error: {err}"),
                };
                self.log.borrow_mut().push(entry);
            }
            Action::Search { pattern, forward } | Action::MenuSearch { pattern, forward } => {
                let direction = if forward { "forward" } else { "backward" };
                self.log.borrow_mut().push(format!("search {direction}: {pattern}"));
            }
            // The prompt callback already logged.
            Action::Prompt { .. } => {}
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let wild_rows = u16::from(self.cmdline.completion_view().is_some());
        let status_rows = self.cmdline.required_rows(area.width).max(1);
        let [log_area, wild_area, status_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(wild_rows),
            Constraint::Length(status_rows),
        ])
        .areas(area);

        let log = self.log.borrow();
        let skip = log.len().saturating_sub(usize::from(log_area.height));
        let lines: Vec<Line> = log[skip..].iter().map(|entry| Line::from(entry.clone())).collect();
        frame.render_widget(Paragraph::new(lines), log_area);
        drop(log);

        if let Some(view) = self.cmdline.completion_view() {
            self.wildmenu.render(frame, wild_area, &view);
        }
        if let Some(session) = self.cmdline.session() {
            statusline::render(frame, status_area, session);
        } else {
            let hint = Line::styled(
                ": command   / search   ? reverse search   p prompt   q quit",
                Style::default().fg(theme::DIM),
            );
            frame.render_widget(Paragraph::new(hint), status_area);
        }
    }
}

fn run_command(line: &str) -> Result<String, DemoError> {
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    match name {
        "echo" => {
            if rest.is_empty() {
                Err(DemoError::MissingArgument)
            } else {
                Ok(rest.to_owned())
            }
        }
        "pwd" => Ok(std::env::current_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|_| "?".to_owned())),
        _ => Err(DemoError::UnknownCommand(name.to_owned())),
    }
}
