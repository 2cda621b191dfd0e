//! Input Module - Event conversion and polling
//!
//! Bridges crossterm's event system with the keyboard and focus modules.
//!
//! # API
//!
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `route_event` - Dispatch event to the keyboard / focus modules
//! - `enable_focus_reporting` / `disable_focus_reporting` - Terminal focus events
//!
//! Losing terminal focus blurs the focused component, which settles any
//! pending edit exactly like moving focus inside the app.
//!
//! # Example
//!
//! ```ignore
//! use spark_debounced_input::state::input::{poll_event, route_event};
//! use std::time::Duration;
//!
//! loop {
//!     if let Ok(Some(event)) = poll_event(Duration::from_millis(16)) {
//!         route_event(event);
//!     }
//! }
//! ```

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    poll, read, DisableFocusChange, EnableFocusChange, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;

use super::focus;
use super::keyboard::{self, KeyState, KeyboardEvent, Modifiers};

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified event type
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Keyboard event (key press, release, etc.)
    Key(KeyboardEvent),
    /// The terminal window gained focus
    FocusGained,
    /// The terminal window lost focus
    FocusLost,
    /// No event or unhandled event type
    None,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab | KeyCode::BackTab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        KeyCode::Insert => "Insert".to_string(),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    let mut modifiers = convert_modifiers(event.modifiers);
    if event.code == KeyCode::BackTab {
        modifiers |= Modifiers::SHIFT;
    }

    KeyboardEvent::with_modifiers(key, modifiers).with_state(state)
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    let mut modifiers = Modifiers::NONE;
    if mods.contains(KeyModifiers::CONTROL) {
        modifiers |= Modifiers::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        modifiers |= Modifiers::ALT;
    }
    if mods.contains(KeyModifiers::SHIFT) {
        modifiers |= Modifiers::SHIFT;
    }
    if mods.intersects(KeyModifiers::SUPER | KeyModifiers::META) {
        modifiers |= Modifiers::META;
    }
    modifiers
}

/// Convert any crossterm event we care about.
pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Key(key) => InputEvent::Key(convert_key_event(key)),
        CrosstermEvent::FocusGained => InputEvent::FocusGained,
        CrosstermEvent::FocusLost => InputEvent::FocusLost,
        _ => InputEvent::None,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    Ok(convert_event(read()?))
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Route an event to the appropriate module.
/// Returns true if the event was handled.
pub fn route_event(event: InputEvent) -> bool {
    match event {
        InputEvent::Key(key) => keyboard::dispatch(key),
        InputEvent::FocusLost => {
            let had_focus = focus::has_focus();
            focus::blur();
            had_focus
        }
        InputEvent::FocusGained | InputEvent::None => false,
    }
}

// =============================================================================
// FOCUS REPORTING
// =============================================================================

/// Ask the terminal to report window focus changes.
pub fn enable_focus_reporting() -> std::io::Result<()> {
    execute!(stdout(), EnableFocusChange)
}

/// Stop terminal focus reporting.
pub fn disable_focus_reporting() -> std::io::Result<()> {
    execute!(stdout(), DisableFocusChange)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_index, reset_registry};
    use crate::state::focus::reset_focus_state;
    use crate::state::keyboard::reset_keyboard_state;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_convert_named_keys() {
        assert_eq!(convert_key_event(key(KeyCode::Enter, KeyModifiers::NONE)).key, "Enter");
        assert_eq!(convert_key_event(key(KeyCode::Esc, KeyModifiers::NONE)).key, "Escape");
        assert_eq!(convert_key_event(key(KeyCode::Left, KeyModifiers::NONE)).key, "ArrowLeft");
        assert_eq!(convert_key_event(key(KeyCode::F(5), KeyModifiers::NONE)).key, "F5");
    }

    #[test]
    fn test_convert_settle_keys_have_codes() {
        assert_eq!(
            convert_key_event(key(KeyCode::Enter, KeyModifiers::NONE)).key_code(),
            Some(13)
        );
        assert_eq!(
            convert_key_event(key(KeyCode::Esc, KeyModifiers::NONE)).key_code(),
            Some(27)
        );
    }

    #[test]
    fn test_convert_char_with_modifiers() {
        let event = convert_key_event(key(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(event.key, "a");
        assert!(event.modifiers.contains(Modifiers::CTRL));
        assert!(!event.modifiers.contains(Modifiers::ALT));
        assert!(event.is_press());
    }

    #[test]
    fn test_convert_back_tab_is_shift_tab() {
        let event = convert_key_event(key(KeyCode::BackTab, KeyModifiers::NONE));
        assert_eq!(event.key, "Tab");
        assert!(event.modifiers.contains(Modifiers::SHIFT));
    }

    #[test]
    fn test_convert_release() {
        let mut raw = key(KeyCode::Char('x'), KeyModifiers::NONE);
        raw.kind = KeyEventKind::Release;
        assert_eq!(convert_key_event(raw).state, KeyState::Release);
    }

    #[test]
    fn test_convert_event_variants() {
        assert!(matches!(convert_event(CrosstermEvent::FocusLost), InputEvent::FocusLost));
        assert!(matches!(convert_event(CrosstermEvent::FocusGained), InputEvent::FocusGained));
        assert!(matches!(convert_event(CrosstermEvent::Resize(80, 24)), InputEvent::None));
    }

    #[test]
    fn test_route_key_to_focused() {
        reset_registry();
        reset_focus_state();
        reset_keyboard_state();

        let index = allocate_index(None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _cleanup = keyboard::on_focused(index, move |e| {
            seen_clone.borrow_mut().push(e.key.clone())
        });
        focus::focus(index);

        route_event(convert_event(CrosstermEvent::Key(key(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
        ))));

        assert_eq!(*seen.borrow(), vec!["q".to_string()]);
    }

    #[test]
    fn test_route_focus_lost_blurs() {
        reset_registry();
        reset_focus_state();

        let index = allocate_index(None);
        focus::focus(index);

        assert!(route_event(InputEvent::FocusLost));
        assert!(!focus::has_focus());
        assert!(!route_event(InputEvent::FocusLost));
    }
}
