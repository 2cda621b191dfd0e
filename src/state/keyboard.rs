//! Keyboard Module - Keyboard event type and focused-handler registry
//!
//! Does NOT own stdin (see the input module for crossterm conversion).
//!
//! # API
//!
//! - `KeyboardEvent` - Key press with modifiers and a "default prevented" flag
//! - `on_focused(i, fn)` - Subscribe when component i has focus
//! - `dispatch(event)` - Route a press to the focused component
//!
//! # Example
//!
//! ```ignore
//! use spark_debounced_input::state::keyboard;
//!
//! let cleanup = keyboard::on_focused(component_index, |event| {
//!     if event.key == "Enter" {
//!         event.prevent_default();
//!     }
//! });
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::focus;
use crate::types::{KEY_BACKSPACE, KEY_DELETE, KEY_ENTER, KEY_ESCAPE, KEY_TAB};

// =============================================================================
// TYPES
// =============================================================================

bitflags::bitflags! {
    /// Keyboard modifier state.
    ///
    /// Combine with bitwise OR: `Modifiers::CTRL | Modifiers::SHIFT`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const NONE = 0;
        const CTRL = 1 << 0;
        const ALT = 1 << 1;
        const SHIFT = 1 << 2;
        const META = 1 << 3;
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "ArrowUp")
    pub key: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
    /// Raw escape sequence (if available)
    pub raw: Option<String>,
    default_prevented: Cell<bool>,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_modifiers(key, Modifiers::NONE)
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
            raw: None,
            default_prevented: Cell::new(false),
        }
    }

    /// Same key with a different press state
    pub fn with_state(mut self, state: KeyState) -> Self {
        self.state = state;
        self
    }

    /// Check if this is a press event
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }

    /// Legacy numeric key code, when the key has one.
    ///
    /// Printable ASCII characters map to their uppercase code point.
    pub fn key_code(&self) -> Option<u32> {
        match self.key.as_str() {
            "Enter" => Some(KEY_ENTER),
            "Escape" => Some(KEY_ESCAPE),
            "Tab" => Some(KEY_TAB),
            "Backspace" => Some(KEY_BACKSPACE),
            "Delete" => Some(KEY_DELETE),
            " " => Some(32),
            key => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_graphic() => {
                        Some(c.to_ascii_uppercase() as u32)
                    }
                    _ => None,
                }
            }
        }
    }

    /// Enter or Escape: keys that settle a pending edit.
    pub fn is_settle_key(&self) -> bool {
        matches!(self.key_code(), Some(KEY_ENTER) | Some(KEY_ESCAPE))
    }

    /// Single printable character without ctrl/alt/meta.
    pub fn printable_char(&self) -> Option<char> {
        if self
            .modifiers
            .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META)
        {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }

    /// Mark the event as handled; suppresses default behavior downstream.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Handler for keyboard events delivered to a focused component.
pub type KeyHandler = Rc<dyn Fn(&KeyboardEvent)>;

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    focused_handlers: HashMap<usize, Vec<(usize, KeyHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            focused_handlers: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Dispatch a keyboard event to the focused component.
/// Returns true if a handler marked the event as handled.
pub fn dispatch(event: KeyboardEvent) -> bool {
    match focus::get_focused_index() {
        Some(index) => dispatch_focused(index, &event),
        None => false,
    }
}

/// Dispatch to the handlers of one component.
/// Returns true if a handler marked the event as handled.
pub fn dispatch_focused(index: usize, event: &KeyboardEvent) -> bool {
    if event.state == KeyState::Release {
        return false;
    }

    // Handlers may blur or unmount the component; never call them under a borrow
    let handlers: Vec<KeyHandler> = REGISTRY.with(|reg| {
        reg.borrow()
            .focused_handlers
            .get(&index)
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    });

    for handler in handlers {
        handler(event);
        if event.default_prevented() {
            return true;
        }
    }
    event.default_prevented()
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to events when a specific component has focus.
/// Returns cleanup function.
pub fn on_focused<F>(index: usize, handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.focused_handlers
            .entry(index)
            .or_default()
            .push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(handlers) = reg.focused_handlers.get_mut(&index) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
                if handlers.is_empty() {
                    reg.focused_handlers.remove(&index);
                }
            }
        });
    }
}

/// Clean up all handlers for a component index.
pub fn cleanup_index(index: usize) {
    REGISTRY.with(|reg| {
        reg.borrow_mut().focused_handlers.remove(&index);
    });
}

/// Reset keyboard state (for testing)
pub fn reset_keyboard_state() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.focused_handlers.clear();
        reg.next_id = 0;
    });
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_index, reset_registry};
    use crate::state::focus::{self, reset_focus_state};

    fn setup() {
        reset_registry();
        reset_focus_state();
        reset_keyboard_state();
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(KeyboardEvent::new("Enter").key_code(), Some(13));
        assert_eq!(KeyboardEvent::new("Escape").key_code(), Some(27));
        assert_eq!(KeyboardEvent::new("a").key_code(), Some(65));
        assert_eq!(KeyboardEvent::new("ArrowUp").key_code(), None);

        assert!(KeyboardEvent::new("Enter").is_settle_key());
        assert!(KeyboardEvent::new("Escape").is_settle_key());
        assert!(!KeyboardEvent::new("Tab").is_settle_key());
    }

    #[test]
    fn test_printable_char() {
        assert_eq!(KeyboardEvent::new("x").printable_char(), Some('x'));
        assert_eq!(KeyboardEvent::new("é").printable_char(), Some('é'));
        assert_eq!(KeyboardEvent::new("Enter").printable_char(), None);
        assert_eq!(
            KeyboardEvent::with_modifiers("a", Modifiers::CTRL).printable_char(),
            None
        );
        assert_eq!(
            KeyboardEvent::with_modifiers("A", Modifiers::SHIFT).printable_char(),
            Some('A')
        );
    }

    #[test]
    fn test_prevent_default() {
        let event = KeyboardEvent::new("Enter");
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }

    #[test]
    fn test_dispatch_routes_to_focused() {
        setup();
        let a = allocate_index(None);
        let b = allocate_index(None);

        let hits = Rc::new(RefCell::new(Vec::new()));
        let hits_a = hits.clone();
        let _ca = on_focused(a, move |e| hits_a.borrow_mut().push(("a", e.key.clone())));
        let hits_b = hits.clone();
        let _cb = on_focused(b, move |e| hits_b.borrow_mut().push(("b", e.key.clone())));

        // Nothing focused - nobody receives it
        assert!(!dispatch(KeyboardEvent::new("x")));
        assert!(hits.borrow().is_empty());

        focus::focus(b);
        dispatch(KeyboardEvent::new("y"));

        assert_eq!(*hits.borrow(), vec![("b", "y".to_string())]);
    }

    #[test]
    fn test_dispatch_reports_prevent_default() {
        setup();
        let index = allocate_index(None);
        let _cleanup = on_focused(index, |e| {
            if e.key == "Enter" {
                e.prevent_default();
            }
        });
        focus::focus(index);

        assert!(dispatch(KeyboardEvent::new("Enter")));
        assert!(!dispatch(KeyboardEvent::new("a")));
    }

    #[test]
    fn test_release_not_dispatched() {
        setup();
        let index = allocate_index(None);
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let _cleanup = on_focused(index, move |_| count_clone.set(count_clone.get() + 1));
        focus::focus(index);

        dispatch(KeyboardEvent::new("a"));
        dispatch(KeyboardEvent::new("a").with_state(KeyState::Repeat));
        dispatch(KeyboardEvent::new("a").with_state(KeyState::Release));

        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_cleanup_unsubscribes() {
        setup();
        let index = allocate_index(None);
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let cleanup = on_focused(index, move |_| count_clone.set(count_clone.get() + 1));

        dispatch_focused(index, &KeyboardEvent::new("a"));
        cleanup();
        dispatch_focused(index, &KeyboardEvent::new("a"));

        assert_eq!(count.get(), 1);
    }
}
