//! End-to-end settle scenarios.
//!
//! Drives the built-in text field the way a terminal app does:
//! crossterm event → input routing → keyboard/focus → text field → input.
//!
//! Run with: cargo test --test settle_scenarios -- --nocapture

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use spark_signals::signal;

use spark_debounced_input::state::input::{convert_event, route_event};
use spark_debounced_input::{
    allocate_index, debounced_input, get_index, reset_focus_state, reset_keyboard_state,
    reset_registry, DebouncedInput, DebouncedInputProps, Phase,
};

// =============================================================================
// HARNESS
// =============================================================================

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("spark_debounced_input=debug")
        .with_test_writer()
        .try_init();
    reset_registry();
    reset_focus_state();
    reset_keyboard_state();
}

fn send(code: KeyCode) {
    route_event(convert_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))));
}

fn send_release(code: KeyCode) {
    let event = KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    route_event(convert_event(Event::Key(event)));
}

fn type_str(text: &str) {
    for ch in text.chars() {
        send(KeyCode::Char(ch));
    }
}

type Log = Rc<RefCell<Vec<String>>>;

/// Mount a text input whose caller ignores commits.
fn mount_ignoring(value: &str) -> (DebouncedInput<String>, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let input = debounced_input(
        DebouncedInputProps::new(value, move |v| sink.borrow_mut().push(v)).id("field"),
    );
    (input, log)
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn typing_then_enter_commits_once() {
    setup();
    let (input, log) = mount_ignoring("");
    input.focus();

    type_str("a");
    type_str("b");
    assert!(log.borrow().is_empty());

    send(KeyCode::Enter);
    assert_eq!(*log.borrow(), vec!["ab".to_string()]);
}

#[test]
fn blur_after_edit_commits() {
    setup();
    let (input, log) = mount_ignoring("x");
    input.focus();

    send(KeyCode::Backspace);
    type_str("y");
    input.blur();

    assert_eq!(*log.borrow(), vec!["y".to_string()]);
}

#[test]
fn focus_without_edit_does_not_commit() {
    setup();
    let (input, log) = mount_ignoring("x");

    input.focus();
    input.blur();
    input.focus();
    send(KeyCode::Esc);

    assert!(log.borrow().is_empty());
}

#[test]
fn caller_update_overwrites_pending_edit() {
    setup();
    let (input, log) = mount_ignoring("x");
    input.focus();

    type_str("y");
    input.set_value("z".to_string());
    assert_eq!(input.draft(), "z");

    input.blur();
    assert!(log.borrow().is_empty());
}

#[test]
fn ignored_commit_keeps_draft_and_recommits() {
    setup();
    let (input, log) = mount_ignoring("");
    input.focus();

    type_str("keep");
    send(KeyCode::Enter);
    assert_eq!(input.draft(), "keep");
    assert_eq!(input.phase(), Phase::Dirty);

    input.focus();
    send(KeyCode::Esc);
    assert_eq!(*log.borrow(), vec!["keep".to_string(), "keep".to_string()]);
}

#[test]
fn same_value_outside_commit_keeps_draft() {
    setup();
    let (input, _log) = mount_ignoring("x");
    input.focus();

    type_str("y");
    input.set_value("x".to_string());

    assert_eq!(input.draft(), "xy");
    assert!(input.is_dirty());
}

#[test]
fn resupplying_original_inside_commit_resets() {
    setup();
    let slot: Rc<RefCell<Option<Rc<DebouncedInput<String>>>>> = Rc::new(RefCell::new(None));
    let sent: Log = Rc::new(RefCell::new(Vec::new()));

    let parent = slot.clone();
    let outbox = sent.clone();
    let input = Rc::new(debounced_input(DebouncedInputProps::new(
        "",
        move |message: String| {
            outbox.borrow_mut().push(message);
            if let Some(input) = parent.borrow().as_ref() {
                input.set_value(String::new());
            }
        },
    )));
    *slot.borrow_mut() = Some(input.clone());

    input.focus();
    type_str("hello");
    send(KeyCode::Enter);

    assert_eq!(*sent.borrow(), vec!["hello".to_string()]);
    assert_eq!(input.draft(), "");
    assert_eq!(input.draft_signal().get(), "");
    assert!(!input.is_dirty());

    slot.borrow_mut().take();
}

#[test]
fn bound_signal_round_trip() {
    setup();
    let name = signal("ada".to_string());
    let setter = name.clone();
    let input = debounced_input(
        DebouncedInputProps::new(name.clone(), move |value| { setter.set(value); }).id("name"),
    );
    input.focus();

    send(KeyCode::End);
    type_str("m");
    assert_eq!(name.get(), "ada");

    send(KeyCode::Enter);
    assert_eq!(name.get(), "adam");
    assert_eq!(input.value(), "adam");
    assert!(!input.is_dirty());

    input.unmount();
}

#[test]
fn moving_focus_between_inputs_commits_the_first() {
    setup();
    let (first, log) = mount_ignoring("");
    let second = debounced_input(DebouncedInputProps::new("", |_| {}).id("second"));

    first.focus();
    type_str("1");
    second.focus();

    assert_eq!(*log.borrow(), vec!["1".to_string()]);
    type_str("2");
    assert_eq!(first.draft(), "1");
    assert_eq!(second.draft(), "2");
}

#[test]
fn terminal_focus_loss_settles() {
    setup();
    let (input, log) = mount_ignoring("");
    input.focus();

    type_str("away");
    route_event(convert_event(Event::FocusLost));

    assert_eq!(*log.borrow(), vec!["away".to_string()]);
}

#[test]
fn key_releases_are_ignored() {
    setup();
    let (input, log) = mount_ignoring("");
    input.focus();

    send_release(KeyCode::Char('q'));
    send_release(KeyCode::Enter);

    assert_eq!(input.draft(), "");
    assert!(log.borrow().is_empty());
}

#[test]
fn unmount_releases_id_without_committing() {
    setup();
    let (input, log) = mount_ignoring("");
    let index = get_index("field").expect("field registered");
    input.focus();
    type_str("lost");

    input.unmount();

    assert_eq!(get_index("field"), None);
    // The freed index is handed out again
    assert_eq!(allocate_index(None), index);
    assert!(log.borrow().is_empty());
}
