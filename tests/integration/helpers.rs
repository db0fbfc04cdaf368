use std::path::Path;

use cmdbar::app::completion::{Completion, CompletionProvider, token_start};
use cmdbar::app::provider::FsCompleter;
use cmdbar::{Action, CmdLine, Origin, Outcome};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A command line completing the token under the cursor against a fixed
/// word list. No filesystem, no environment -- just state.
pub fn word_list_cmdline(words: &[&str]) -> CmdLine {
    let words: Vec<String> = words.iter().map(|w| (*w).to_owned()).collect();
    CmdLine::new(Box::new(WordList(words)), 100)
}

/// A command line completing against a real directory, isolated from the
/// caller's home and `$PATH`.
pub fn fs_cmdline(base_dir: &Path) -> CmdLine {
    let provider = FsCompleter::new(base_dir)
        .with_home(None)
        .with_search_dirs(Vec::new());
    CmdLine::new(Box::new(provider), 100)
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// The outcome of a turn that was opened the ordinary way.
pub fn done(action: Action) -> Outcome {
    Outcome::Done { origin: Origin::Normal, action }
}

/// Type `text` one interactive key at a time.
pub fn type_text(cmdline: &mut CmdLine, text: &str) {
    for c in text.chars() {
        cmdline.dispatch_key(key(KeyCode::Char(c)));
    }
}

/// The active buffer, or panic if no turn is open.
pub fn buffer(cmdline: &CmdLine) -> String {
    cmdline.session().map(|s| s.text().to_owned()).expect("no active turn")
}

struct WordList(Vec<String>);

impl CompletionProvider for WordList {
    fn complete(&mut self, before_cursor: &str) -> Completion {
        let offset = token_start(before_cursor);
        let token: String = before_cursor.chars().skip(offset).collect();
        let mut candidates: Vec<String> =
            self.0.iter().filter(|w| w.starts_with(&token)).cloned().collect();
        candidates.sort_unstable();
        candidates.push(token);
        Completion { candidates, replace_offset: offset }
    }
}
