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

//! The built-in completion provider: filenames relative to a base directory
//! and executables found on `$PATH`. All scanning addresses entries by full
//! path; the process working directory is never changed.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::app::completion::{Completion, CompletionProvider, token_start, unescape};

/// Which directory entries a filename scan yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryFilter {
    #[default]
    All,
    DirectoriesOnly,
    ExecutablesOnly,
    DirectoriesAndExecutables,
}

/// Filename and executable completion over the real filesystem.
///
/// `base_dir` anchors relative tokens, `home` expands a leading `~/`, and
/// `search_dirs` is the executable search list. All three are plain data so
/// tests point them at temp directories.
#[derive(Debug)]
pub struct FsCompleter {
    base_dir: PathBuf,
    home: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
    filter: EntryFilter,
}

impl FsCompleter {
    /// A completer rooted at `base_dir`, with home and `$PATH` taken from the
    /// environment.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let home = dirs::home_dir();
        let search_dirs = searchable_dirs(
            env::var("PATH").unwrap_or_default().as_str(),
            home.as_deref(),
        );
        Self {
            base_dir: base_dir.into(),
            home,
            search_dirs,
            filter: EntryFilter::All,
        }
    }

    #[must_use]
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    #[must_use]
    pub fn with_search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_dirs = dirs;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Candidates for a filename token, each the full replacement text for
    /// the token: the directory part as typed, the matched name escaped, and
    /// a trailing `/` on directories. The last element is always the escaped
    /// token itself.
    #[must_use]
    pub fn filename_candidates(&self, token: &str, filter: EntryFilter) -> Vec<String> {
        if token == "~" {
            if let Some(home) = &self.home {
                let expanded = format!("{}/", home.display());
                return vec![shell_escape(&expanded), "~".to_owned()];
            }
        }

        let (dirname, fragment_raw) = split_token(token);
        let fragment = unescape(fragment_raw);
        let dir = self.resolve_dir(&unescape(dirname));
        trace!(dir = %dir.display(), fragment = %fragment, "filename scan");

        let mut names: Vec<(String, bool)> = Vec::new();
        if let Ok(entries) = fs::read_dir(&dir) {
            for entry in entries.flatten() {
                let Ok(name) = entry.file_name().into_string() else {
                    continue;
                };
                if !name.starts_with(&fragment) {
                    continue;
                }
                if name.starts_with('.') && !fragment.starts_with('.') {
                    continue;
                }
                let path = dir.join(&name);
                let is_dir = fs::metadata(&path).is_ok_and(|m| m.is_dir());
                let keep = match filter {
                    EntryFilter::All => true,
                    EntryFilter::DirectoriesOnly => is_dir,
                    EntryFilter::ExecutablesOnly => !is_dir && is_executable(&path),
                    EntryFilter::DirectoriesAndExecutables => is_dir || is_executable(&path),
                };
                if keep {
                    names.push((name, is_dir));
                }
            }
        }
        names.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let mut candidates: Vec<String> = names
            .into_iter()
            .map(|(name, is_dir)| {
                let mut text = format!("{dirname}{}", shell_escape(&name));
                if is_dir {
                    text.push('/');
                }
                text
            })
            .collect();
        // The escaped fragment closes the cycle; executables-only scans are
        // aggregated by the caller, which appends its own closing entry.
        if candidates.is_empty() || filter != EntryFilter::ExecutablesOnly {
            candidates.push(format!("{dirname}{}", shell_escape(&fragment)));
        }
        candidates
    }

    /// Candidates for an executable name, scanned across `search_dirs`.
    /// Matches are deduplicated by name; earlier search directories win.
    #[must_use]
    pub fn executable_candidates(&self, token: &str) -> Vec<String> {
        let fragment = unescape(token);
        let mut names: Vec<String> = Vec::new();
        for dir in &self.search_dirs {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let Ok(name) = entry.file_name().into_string() else {
                    continue;
                };
                if !name.starts_with(&fragment) || names.contains(&name) {
                    continue;
                }
                let path = dir.join(&name);
                let is_file = fs::metadata(&path).is_ok_and(|m| m.is_file());
                if is_file && is_executable(&path) {
                    names.push(name);
                }
            }
        }
        names.sort_unstable();

        let mut candidates: Vec<String> = names.iter().map(|n| shell_escape(n)).collect();
        candidates.push(shell_escape(&fragment));
        candidates
    }

    fn resolve_dir(&self, dirname: &str) -> PathBuf {
        if dirname.is_empty() {
            return self.base_dir.clone();
        }
        if let Some(rest) = dirname.strip_prefix("~/")
            && let Some(home) = &self.home
        {
            return home.join(rest);
        }
        let path = Path::new(dirname);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl CompletionProvider for FsCompleter {
    fn complete(&mut self, before_cursor: &str) -> Completion {
        let offset = token_start(before_cursor);
        let token: String = before_cursor.chars().skip(offset).collect();

        // A line like `!gre` completes program names for the first word;
        // with a slash in the token it is a path to run instead.
        if offset == 0
            && let Some(command) = token.strip_prefix('!')
        {
            let candidates = if command.contains('/') {
                self.filename_candidates(command, EntryFilter::DirectoriesAndExecutables)
            } else {
                self.executable_candidates(command)
            };
            return Completion {
                candidates,
                replace_offset: 1,
            };
        }

        Completion {
            candidates: self.filename_candidates(&token, self.filter),
            replace_offset: offset,
        }
    }
}

/// Split a raw token at its last `/`; the directory half keeps the slash and
/// the typed (still escaped) spelling.
fn split_token(token: &str) -> (&str, &str) {
    match token.rfind('/') {
        Some(pos) => token.split_at(pos + 1),
        None => ("", token),
    }
}

/// The directories worth scanning for executables: `path` split on `:`, a
/// leading `~/` expanded, non-directories and repeats dropped.
#[must_use]
pub fn searchable_dirs(path: &str, home: Option<&Path>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    for part in path.split(':') {
        if part.is_empty() {
            continue;
        }
        let dir = match (part.strip_prefix("~/"), home) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(part),
        };
        if dir.is_dir() && !out.contains(&dir) {
            out.push(dir);
        }
    }
    out
}

/// Backslash-escape the characters the command parser treats specially.
#[must_use]
pub fn shell_escape(name: &str) -> String {
    const SPECIAL: &str = " \t\\\"'|;&<>()[]{}*?!$#";
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if SPECIAL.contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).is_ok_and(|m| m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
