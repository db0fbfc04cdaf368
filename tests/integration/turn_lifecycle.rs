// =====
// TESTS: 11
// =====
//
// Turn lifecycle integration tests.
// Validates full enter -> edit -> confirm/cancel sequences through the
// public dispatcher, including scripted input.

use cmdbar::{Action, Origin, Outcome, Submode};
use crossterm::event::KeyCode;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

use crate::helpers::{buffer, ctrl, done, key, type_text, word_list_cmdline};

// --- Interactive turns ---

#[test]
fn command_turn_types_edits_and_confirms() {
    let mut cl = word_list_cmdline(&[]);
    cl.enter(Submode::Command, "", Origin::Normal);
    type_text(&mut cl, "edit notesx");
    cl.dispatch_key(key(KeyCode::Backspace));
    let outcome = cl.dispatch_key(key(KeyCode::Enter));
    assert_eq!(outcome, done(Action::Command { line: "edit notes".to_owned() }));
    assert!(!cl.is_active());
}

#[test]
fn kill_and_word_keys_edit_the_line() {
    let mut cl = word_list_cmdline(&[]);
    cl.enter(Submode::Command, "move one two", Origin::Normal);
    cl.dispatch_key(ctrl('w')); // drop "two"
    assert_eq!(buffer(&cl), "move one ");
    cl.dispatch_key(ctrl('u')); // drop everything before the cursor
    assert_eq!(buffer(&cl), "");
}

#[test]
fn cursor_motion_round_trips() {
    let mut cl = word_list_cmdline(&[]);
    cl.enter(Submode::Command, "abc", Origin::Normal);
    cl.dispatch_key(ctrl('a'));
    cl.dispatch_key(key(KeyCode::Delete));
    assert_eq!(buffer(&cl), "bc");
    cl.dispatch_key(ctrl('e'));
    cl.dispatch_key(key(KeyCode::Backspace));
    assert_eq!(buffer(&cl), "b");
}

#[test]
fn cancel_discards_the_line() {
    let mut cl = word_list_cmdline(&[]);
    cl.enter(Submode::SearchForward, "", Origin::Normal);
    type_text(&mut cl, "half a patt");
    let outcome = cl.dispatch_key(ctrl('c'));
    assert_eq!(outcome, done(Action::Cancelled { submode: Submode::SearchForward }));
    assert!(cl.session().is_none());
}

#[test]
fn backspacing_through_the_line_cancels_the_turn() {
    let mut cl = word_list_cmdline(&[]);
    cl.enter(Submode::Command, "ab", Origin::Normal);
    cl.dispatch_key(key(KeyCode::Backspace));
    cl.dispatch_key(key(KeyCode::Backspace));
    let outcome = cl.dispatch_key(key(KeyCode::Backspace));
    assert_eq!(outcome, done(Action::Cancelled { submode: Submode::Command }));
}

#[test]
fn prompt_turn_feeds_the_callback_and_reports_the_response() {
    let captured = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&captured);
    let mut cl = word_list_cmdline(&[]);
    cl.enter_prompt(
        "Rename to: ",
        "draft.txt",
        Origin::Normal,
        Box::new(move |response| *sink.borrow_mut() = Some(response.to_owned())),
    );
    cl.dispatch_key(ctrl('a'));
    type_text(&mut cl, "final-");
    let outcome = cl.dispatch_key(key(KeyCode::Enter));
    assert_eq!(outcome, done(Action::Prompt { response: "final-draft.txt".to_owned() }));
    assert_eq!(captured.borrow().as_deref(), Some("final-draft.txt"));
}

#[test]
fn turns_opened_from_a_selection_hand_the_origin_back() {
    let mut cl = word_list_cmdline(&[]);
    cl.enter(Submode::SearchForward, "", Origin::Selection);
    type_text(&mut cl, "needle");
    let outcome = cl.dispatch_key(key(KeyCode::Enter));
    // The host leaves its selection mode on confirm and on cancel alike.
    assert_eq!(
        outcome,
        Outcome::Done {
            origin: Origin::Selection,
            action: Action::Search { pattern: "needle".to_owned(), forward: true },
        }
    );

    cl.enter(Submode::Command, "", Origin::Selection);
    let outcome = cl.dispatch_key(key(KeyCode::Esc));
    assert_eq!(
        outcome,
        Outcome::Done {
            origin: Origin::Selection,
            action: Action::Cancelled { submode: Submode::Command },
        }
    );
}

// --- Scripted turns ---

#[test]
fn script_with_notation_edits_and_confirms() {
    let mut cl = word_list_cmdline(&[]);
    cl.enter(Submode::Command, "", Origin::Normal);
    let actions = cl.dispatch_script("edit notes<c-w>journal<cr>");
    assert_eq!(actions, vec![Action::Command { line: "edit journal".to_owned() }]);
}

#[test]
fn script_cancel_reports_the_cancellation() {
    let mut cl = word_list_cmdline(&[]);
    cl.enter(Submode::Command, "", Origin::Normal);
    let actions = cl.dispatch_script("junk<esc>");
    assert_eq!(actions, vec![Action::Cancelled { submode: Submode::Command }]);
    assert!(!cl.is_active());
}

#[test]
fn script_home_end_notation_moves_the_cursor() {
    let mut cl = word_list_cmdline(&[]);
    cl.enter(Submode::Command, "", Origin::Normal);
    let actions = cl.dispatch_script("world<home>hello-<end>!<cr>");
    assert_eq!(actions, vec![Action::Command { line: "hello-world!".to_owned() }]);
}

#[test]
fn unknown_notation_is_typed_literally() {
    let mut cl = word_list_cmdline(&[]);
    cl.enter(Submode::Command, "", Origin::Normal);
    let actions = cl.dispatch_script("a<nope>b<cr>");
    assert_eq!(actions, vec![Action::Command { line: "a<nope>b".to_owned() }]);
}
