//! Text Field - Built-in single-line host control.
//!
//! The default component rendered by a text debounced input. It owns no value
//! of its own: it displays the draft signal it is given and reports every edit
//! as a [`ChangeEvent`].
//!
//! # Keys (when focused)
//!
//! - Printable characters insert at the cursor, replacing any selection
//! - `Backspace` / `Delete` remove the selection or one character
//! - `ArrowLeft` / `ArrowRight` / `Home` / `End` move the cursor
//! - `Ctrl+A` selects everything
//!
//! Every key is first offered to the input's `on_key_down` handler; if that
//! marks the event as handled, the field leaves it alone.
//!
//! Focus goes through the focus module, so `blur()` and focus moving to another
//! component raise the same `on_blur`.

use std::cell::Cell;
use std::rc::Rc;

use crate::engine::{allocate_index, on_destroy, release_index};
use crate::state::focus::{self, FocusCallbacks, FocusEvent};
use crate::state::keyboard::{self, KeyboardEvent, Modifiers};
use crate::types::ChangeEvent;
use super::host::{HostControl, InputComponent};
use super::types::{Cleanup, HostProps};

/// Ref prop name the text field reads.
pub const TEXT_FIELD_REF_PROP: &str = "ref";

// =============================================================================
// Text Editing Helpers
// =============================================================================

/// Replace the character range `start..end` with `insert`.
fn splice(text: &str, start: usize, end: usize, insert: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let start = start.min(chars.len());
    let end = end.clamp(start, chars.len());

    let mut out: String = chars[..start].iter().collect();
    out.push_str(insert);
    out.extend(&chars[end..]);
    out
}

// =============================================================================
// Text Field
// =============================================================================

/// A mounted text field.
pub struct TextField {
    index: usize,
    props: HostProps<String>,
    cursor: Cell<usize>,
    selection: Cell<Option<(usize, usize)>>,
}

impl TextField {
    /// Text currently displayed.
    pub fn text(&self) -> String {
        self.props.value.get()
    }

    /// Cursor position in characters, clamped to the current text.
    pub fn cursor(&self) -> usize {
        self.cursor.get().min(self.text().chars().count())
    }

    fn len(&self) -> usize {
        self.text().chars().count()
    }

    /// Report an edit; the cursor only moves if the input accepted it.
    fn edit(&self, text: &str, start: usize, end: usize, insert: &str) {
        let next = splice(text, start, end, insert);
        self.selection.set(None);
        if (self.props.on_change)(ChangeEvent::new(next).into()).is_ok() {
            self.cursor.set(start + insert.chars().count());
        }
    }

    fn handle_key(&self, event: &KeyboardEvent) {
        (self.props.on_key_down)(event);
        if event.default_prevented() || event.is_settle_key() {
            return;
        }

        let text = self.text();
        let len = text.chars().count();
        let pos = self.cursor();
        let selection = self.selection.get();

        match event.key.as_str() {
            "a" if event.modifiers.contains(Modifiers::CTRL) => self.select(),
            "Backspace" => match selection {
                Some((start, end)) => self.edit(&text, start, end, ""),
                None if pos > 0 => self.edit(&text, pos - 1, pos, ""),
                None => return,
            },
            "Delete" => match selection {
                Some((start, end)) => self.edit(&text, start, end, ""),
                None if pos < len => self.edit(&text, pos, pos + 1, ""),
                None => return,
            },
            "ArrowLeft" => {
                self.selection.set(None);
                self.cursor.set(pos.saturating_sub(1));
            }
            "ArrowRight" => {
                self.selection.set(None);
                self.cursor.set((pos + 1).min(len));
            }
            "Home" => {
                self.selection.set(None);
                self.cursor.set(0);
            }
            "End" => {
                self.selection.set(None);
                self.cursor.set(len);
            }
            _ => {
                let Some(ch) = event.printable_char() else { return };
                let (start, end) = selection.unwrap_or((pos, pos));
                self.edit(&text, start, end, ch.encode_utf8(&mut [0; 4]));
            }
        }

        event.prevent_default();
    }

    fn handle_focus_loss(&self) {
        self.selection.set(None);
        (self.props.on_blur)(&FocusEvent::blur(self.index));
    }
}

impl HostControl for TextField {
    fn focus(&self) {
        focus::focus(self.index);
    }

    fn blur(&self) {
        focus::blur_index(self.index);
    }

    fn select(&self) {
        let len = self.len();
        self.selection.set((len > 0).then_some((0, len)));
        self.cursor.set(len);
    }
}

// =============================================================================
// Component
// =============================================================================

/// Renders a [`TextField`]. The default component of text debounced inputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextFieldComponent;

impl InputComponent<String> for TextFieldComponent {
    fn render(&self, props: HostProps<String>) -> Cleanup {
        let index = allocate_index(props.id.as_deref());
        let cursor = props.value.get().chars().count();

        let field = Rc::new(TextField {
            index,
            props,
            cursor: Cell::new(cursor),
            selection: Cell::new(None),
        });

        let control: Rc<dyn HostControl> = field.clone();
        let attached = field.props.attach(TEXT_FIELD_REF_PROP, control);

        let on_focus_field = field.clone();
        let on_blur_field = field.clone();
        let focus_cleanup = focus::register_callbacks(
            index,
            FocusCallbacks {
                on_focus: Some(Rc::new(move || {
                    on_focus_field.cursor.set(on_focus_field.len());
                })),
                on_blur: Some(Rc::new(move || on_blur_field.handle_focus_loss())),
            },
        );

        let key_field = field.clone();
        let key_cleanup = keyboard::on_focused(index, move |event| key_field.handle_key(event));

        on_destroy(index, move || {
            key_cleanup();
            focus_cleanup();
            keyboard::cleanup_index(index);
            focus::cleanup_index(index);
            if attached {
                field.props.detach();
            }
        });

        Box::new(move || release_index(index))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{get_index, is_allocated, reset_registry};
    use crate::primitives::{debounced_input, DebouncedInput, DebouncedInputProps};
    use crate::state::focus::reset_focus_state;
    use crate::state::keyboard::reset_keyboard_state;
    use std::cell::RefCell;

    fn setup() {
        reset_registry();
        reset_focus_state();
        reset_keyboard_state();
    }

    fn mount(value: &str) -> (DebouncedInput<String>, usize, Rc<RefCell<Vec<String>>>) {
        setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let input = debounced_input(
            DebouncedInputProps::new(value, move |v| sink.borrow_mut().push(v)).id("field"),
        );
        let index = get_index("field").expect("text field allocated");
        (input, index, log)
    }

    fn type_str(text: &str) {
        for ch in text.chars() {
            keyboard::dispatch(KeyboardEvent::new(ch.to_string()));
        }
    }

    #[test]
    fn test_splice() {
        assert_eq!(splice("hello", 1, 3, "EY"), "hEYlo");
        assert_eq!(splice("héllo", 5, 5, "!"), "héllo!");
        assert_eq!(splice("ab", 9, 9, "c"), "abc");
        assert_eq!(splice("abc", 2, 1, "X"), "abXc");
    }

    #[test]
    fn test_render_registers_and_attaches() {
        let (input, index, _log) = mount("hi");

        assert!(is_allocated(index));
        assert!(input.host_ref().is_some_and(|slot| slot.is_attached()));

        input.focus();
        assert!(focus::is_focused(index));
    }

    #[test]
    fn test_typing_edits_draft_without_commit() {
        let (input, _index, log) = mount("");
        input.focus();

        type_str("ab");

        assert_eq!(input.draft(), "ab");
        assert!(input.is_dirty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_enter_commits_through_blur() {
        let (input, index, log) = mount("x");
        input.focus();

        keyboard::dispatch(KeyboardEvent::new("Backspace"));
        type_str("y");
        keyboard::dispatch(KeyboardEvent::new("Enter"));

        assert_eq!(*log.borrow(), vec!["y".to_string()]);
        assert!(!focus::is_focused(index));
        assert!(!focus::has_focus());
    }

    #[test]
    fn test_focus_moving_away_commits() {
        let (input, _index, log) = mount("");
        let other = allocate_index(None);
        input.focus();

        type_str("ab");
        focus::focus(other);

        assert_eq!(*log.borrow(), vec!["ab".to_string()]);
    }

    #[test]
    fn test_cursor_navigation_and_delete() {
        let (input, _index, _log) = mount("abc");
        input.focus();

        keyboard::dispatch(KeyboardEvent::new("Home"));
        keyboard::dispatch(KeyboardEvent::new("Delete"));
        assert_eq!(input.draft(), "bc");

        keyboard::dispatch(KeyboardEvent::new("End"));
        keyboard::dispatch(KeyboardEvent::new("ArrowLeft"));
        type_str("X");
        assert_eq!(input.draft(), "bXc");

        keyboard::dispatch(KeyboardEvent::new("ArrowRight"));
        keyboard::dispatch(KeyboardEvent::new("ArrowRight"));
        keyboard::dispatch(KeyboardEvent::new("Backspace"));
        assert_eq!(input.draft(), "bX");
    }

    #[test]
    fn test_select_then_type_replaces() {
        let (input, _index, _log) = mount("old");
        input.focus();
        input.select();

        type_str("n");
        assert_eq!(input.draft(), "n");
    }

    #[test]
    fn test_ctrl_a_then_backspace_clears() {
        let (input, _index, _log) = mount("old");
        input.focus();

        keyboard::dispatch(KeyboardEvent::with_modifiers("a", Modifiers::CTRL));
        keyboard::dispatch(KeyboardEvent::new("Backspace"));

        assert_eq!(input.draft(), "");
    }

    #[test]
    fn test_external_value_moves_display() {
        let (input, _index, _log) = mount("one");
        input.focus();
        type_str("!");

        input.set_value("two".to_string());

        assert_eq!(input.draft(), "two");
        assert_eq!(input.draft_signal().get(), "two");
    }

    #[test]
    fn test_dropping_handle_keeps_field_mounted() {
        let (input, index, log) = mount("");
        input.focus();
        drop(input);

        // Without `unmount` the field stays registered and keeps committing
        assert!(is_allocated(index));
        type_str("still");
        keyboard::dispatch(KeyboardEvent::new("Enter"));
        assert_eq!(*log.borrow(), vec!["still".to_string()]);

        release_index(index);
        assert!(!is_allocated(index));
    }

    #[test]
    fn test_unmount_releases_index() {
        let (input, index, log) = mount("");
        input.focus();
        type_str("z");

        input.unmount();

        assert!(!is_allocated(index));
        assert!(!focus::has_focus());
        assert!(!input.host_ref().is_some_and(|slot| slot.is_attached()));
        // Unmounting drops the pending edit
        assert!(log.borrow().is_empty());
    }
}
