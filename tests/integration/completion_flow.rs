// =====
// TESTS: 9
// =====
//
// Completion integration tests over a real (temporary) filesystem: token
// splicing, cycling, the wild-menu view and the `!` program completion.

use cmdbar::{Action, Origin, Submode};
use crossterm::event::KeyCode;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::helpers::{buffer, fs_cmdline, key, type_text};

fn touch(dir: &Path, name: &str) {
    drop(fs::File::create(dir.join(name)).unwrap());
}

/// A scratch directory with one subdirectory and one file sharing a prefix.
fn scratch() -> TempDir {
    let root = TempDir::new().unwrap();
    fs::create_dir(root.path().join("docs")).unwrap();
    touch(root.path(), "dot");
    root
}

#[test]
fn tab_completes_the_token_under_the_cursor() {
    let root = scratch();
    let mut cl = fs_cmdline(root.path());
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "edit do");
    cl.dispatch_key(key(KeyCode::Tab));
    assert_eq!(buffer(&cl), "edit docs/");
}

#[test]
fn completion_preserves_text_right_of_the_cursor() {
    let root = scratch();
    let mut cl = fs_cmdline(root.path());
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "edit do --force");
    for _ in 0.." --force".len() {
        cl.dispatch_key(key(KeyCode::Left));
    }
    cl.dispatch_key(key(KeyCode::Tab));
    assert_eq!(buffer(&cl), "edit docs/ --force");
}

#[test]
fn repeated_tab_cycles_and_returns_to_typed_text() {
    let root = scratch();
    let mut cl = fs_cmdline(root.path());
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "edit do");
    cl.dispatch_key(key(KeyCode::Tab));
    assert_eq!(buffer(&cl), "edit docs/");
    cl.dispatch_key(key(KeyCode::Tab));
    assert_eq!(buffer(&cl), "edit dot");
    cl.dispatch_key(key(KeyCode::Tab));
    assert_eq!(buffer(&cl), "edit do");
    cl.dispatch_key(key(KeyCode::Tab));
    assert_eq!(buffer(&cl), "edit docs/");
}

#[test]
fn back_tab_cycles_in_reverse() {
    let root = scratch();
    let mut cl = fs_cmdline(root.path());
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "edit do");
    cl.dispatch_key(key(KeyCode::BackTab));
    assert_eq!(buffer(&cl), "edit dot");
    cl.dispatch_key(key(KeyCode::BackTab));
    assert_eq!(buffer(&cl), "edit docs/");
}

#[test]
fn wild_menu_view_tracks_the_cycle() {
    let root = scratch();
    let mut cl = fs_cmdline(root.path());
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "edit do");
    assert!(cl.completion_view().is_none());
    cl.dispatch_key(key(KeyCode::Tab));
    let view = cl.completion_view().expect("cycle is active");
    assert_eq!(view.candidates, ["docs/", "dot"]);
    assert_eq!(view.selected, Some(0));
}

#[test]
fn slash_after_a_completed_directory_only_closes_the_cycle() {
    let root = scratch();
    let mut cl = fs_cmdline(root.path());
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "edit do");
    cl.dispatch_key(key(KeyCode::Tab));
    assert_eq!(buffer(&cl), "edit docs/");
    cl.dispatch_key(key(KeyCode::Char('/')));
    assert_eq!(buffer(&cl), "edit docs/");
    assert!(cl.completion_view().is_none());
}

#[test]
fn names_needing_escapes_complete_escaped_and_confirm_intact() {
    let root = TempDir::new().unwrap();
    touch(root.path(), "My Notes");
    let mut cl = fs_cmdline(root.path());
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "edit My");
    cl.dispatch_key(key(KeyCode::Tab));
    assert_eq!(buffer(&cl), r"edit My\ Notes");
    let actions = cl.dispatch_script("<cr>");
    assert_eq!(actions, vec![Action::Command { line: r"edit My\ Notes".to_owned() }]);
}

#[test]
fn search_turns_do_not_complete() {
    let root = scratch();
    let mut cl = fs_cmdline(root.path());
    cl.enter(Submode::SearchForward, "", Origin::Normal);
    type_text(&mut cl, "do");
    cl.dispatch_key(key(KeyCode::Tab));
    assert_eq!(buffer(&cl), "do");
    assert!(cl.completion_view().is_none());
}

#[cfg(unix)]
#[test]
fn bang_completes_programs_from_the_search_path() {
    use cmdbar::CmdLine;
    use cmdbar::app::provider::FsCompleter;
    use std::os::unix::fs::PermissionsExt;

    let bin = TempDir::new().unwrap();
    let program = bin.path().join("magnify");
    drop(fs::File::create(&program).unwrap());
    fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();

    let root = TempDir::new().unwrap();
    let provider = FsCompleter::new(root.path())
        .with_home(None)
        .with_search_dirs(vec![bin.path().to_path_buf()]);
    let mut cl = CmdLine::new(Box::new(provider), 100);
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "!mag");
    cl.dispatch_key(key(KeyCode::Tab));
    assert_eq!(buffer(&cl), "!magnify");
}
