// =====
// TESTS: 9
// =====
//
// History integration tests: confirms feed the per-submode logs, and
// navigation keys replay them across turns.

use cmdbar::{Origin, Submode};
use crossterm::event::KeyCode;
use pretty_assertions::assert_eq;

use crate::helpers::{buffer, ctrl, key, type_text, word_list_cmdline};

fn confirm_command(cl: &mut cmdbar::CmdLine, line: &str) {
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(cl, line);
    cl.dispatch_key(key(KeyCode::Enter));
}

#[test]
fn ctrl_p_walks_back_through_confirmed_commands() {
    let mut cl = word_list_cmdline(&[]);
    confirm_command(&mut cl, "first");
    confirm_command(&mut cl, "second");
    cl.enter(Submode::Command, "", Origin::Normal);
    cl.dispatch_key(ctrl('p'));
    assert_eq!(buffer(&cl), "second");
    cl.dispatch_key(ctrl('p'));
    assert_eq!(buffer(&cl), "first");
    // Already at the oldest entry.
    cl.dispatch_key(ctrl('p'));
    assert_eq!(buffer(&cl), "first");
}

#[test]
fn ctrl_n_returns_to_the_typed_line() {
    let mut cl = word_list_cmdline(&[]);
    confirm_command(&mut cl, "remembered");
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "in progress");
    cl.dispatch_key(ctrl('p'));
    assert_eq!(buffer(&cl), "remembered");
    cl.dispatch_key(ctrl('n'));
    assert_eq!(buffer(&cl), "in progress");
}

#[test]
fn reconfirming_a_command_moves_it_to_the_front() {
    let mut cl = word_list_cmdline(&[]);
    confirm_command(&mut cl, "alpha");
    confirm_command(&mut cl, "beta");
    confirm_command(&mut cl, "alpha");
    cl.enter(Submode::Command, "", Origin::Normal);
    cl.dispatch_key(ctrl('p'));
    assert_eq!(buffer(&cl), "alpha");
    cl.dispatch_key(ctrl('p'));
    assert_eq!(buffer(&cl), "beta");
    cl.dispatch_key(ctrl('p'));
    // Only two distinct entries exist.
    assert_eq!(buffer(&cl), "beta");
}

#[test]
fn up_matches_only_the_typed_prefix() {
    let mut cl = word_list_cmdline(&[]);
    confirm_command(&mut cl, "edit plan");
    confirm_command(&mut cl, "sort name");
    confirm_command(&mut cl, "edit notes");
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "edit");
    cl.dispatch_key(key(KeyCode::Up));
    assert_eq!(buffer(&cl), "edit notes");
    cl.dispatch_key(key(KeyCode::Up));
    assert_eq!(buffer(&cl), "edit plan");
    // No older match: stay put.
    cl.dispatch_key(key(KeyCode::Up));
    assert_eq!(buffer(&cl), "edit plan");
}

#[test]
fn down_past_the_newest_match_restores_the_prefix() {
    let mut cl = word_list_cmdline(&[]);
    confirm_command(&mut cl, "edit plan");
    confirm_command(&mut cl, "edit notes");
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "edit");
    cl.dispatch_key(key(KeyCode::Up));
    cl.dispatch_key(key(KeyCode::Up));
    assert_eq!(buffer(&cl), "edit plan");
    cl.dispatch_key(key(KeyCode::Down));
    assert_eq!(buffer(&cl), "edit notes");
    cl.dispatch_key(key(KeyCode::Down));
    assert_eq!(buffer(&cl), "edit");
}

#[test]
fn search_and_command_histories_do_not_mix() {
    let mut cl = word_list_cmdline(&[]);
    confirm_command(&mut cl, "a command");
    cl.enter(Submode::SearchForward, "", Origin::Normal);
    type_text(&mut cl, "a pattern");
    cl.dispatch_key(key(KeyCode::Enter));

    cl.enter(Submode::SearchForward, "", Origin::Normal);
    cl.dispatch_key(ctrl('p'));
    assert_eq!(buffer(&cl), "a pattern");
    cl.dispatch_key(ctrl('p'));
    assert_eq!(buffer(&cl), "a pattern");
}

#[test]
fn cancelled_turns_leave_no_history() {
    let mut cl = word_list_cmdline(&[]);
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "never ran");
    cl.dispatch_key(key(KeyCode::Esc));
    cl.enter(Submode::Command, "", Origin::Normal);
    cl.dispatch_key(ctrl('p'));
    assert_eq!(buffer(&cl), "");
}

#[test]
fn prompt_and_menu_turns_recall_nothing() {
    let mut cl = word_list_cmdline(&[]);
    confirm_command(&mut cl, "real command");
    cl.enter_prompt("Rename: ", "", Origin::Normal, Box::new(|_| {}));
    cl.dispatch_key(ctrl('p'));
    assert_eq!(buffer(&cl), "");
    cl.dispatch_key(key(KeyCode::Esc));
    cl.enter(Submode::MenuCommand, "", Origin::Normal);
    cl.dispatch_key(key(KeyCode::Up));
    assert_eq!(buffer(&cl), "");
}

#[test]
fn scripted_confirms_stay_out_of_history() {
    let mut cl = word_list_cmdline(&[]);
    cl.enter(Submode::Command, "", Origin::Normal);
    cl.dispatch_script("from a mapping<cr>");
    confirm_command(&mut cl, "typed by hand");
    cl.enter(Submode::Command, "", Origin::Normal);
    cl.dispatch_key(ctrl('p'));
    assert_eq!(buffer(&cl), "typed by hand");
    cl.dispatch_key(ctrl('p'));
    assert_eq!(buffer(&cl), "typed by hand");
}
