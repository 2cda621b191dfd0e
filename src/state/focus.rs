//! Focus System - Focus state and focus-change callbacks
//!
//! Manages focus state:
//! - `focused_index` signal (currently focused component)
//! - Focus callbacks (on_focus/on_blur), fired at the source
//! - `FocusEvent` handed to blur hooks, with a "default prevented" flag
//!
//! Programmatic blur (`blur()`) and focus moving to another component fire the
//! same `on_blur` callbacks, so everything downstream sees one code path.
//!
//! # Example
//!
//! ```ignore
//! use spark_debounced_input::state::focus;
//!
//! let cleanup = focus::register_callbacks(index, FocusCallbacks {
//!     on_focus: Some(Rc::new(|| println!("Focused!"))),
//!     on_blur: Some(Rc::new(|| println!("Blurred!"))),
//! });
//!
//! focus::focus(index);
//! focus::blur();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::engine::is_allocated;

// =============================================================================
// FOCUS EVENT
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusKind {
    Focus,
    Blur,
}

/// Focus change delivered to component hooks.
#[derive(Clone, Debug, PartialEq)]
pub struct FocusEvent {
    pub kind: FocusKind,
    /// Component gaining or losing focus.
    pub index: usize,
    default_prevented: Cell<bool>,
}

impl FocusEvent {
    pub fn focus(index: usize) -> Self {
        Self {
            kind: FocusKind::Focus,
            index,
            default_prevented: Cell::new(false),
        }
    }

    pub fn blur(index: usize) -> Self {
        Self {
            kind: FocusKind::Blur,
            index,
            default_prevented: Cell::new(false),
        }
    }

    /// Mark the event as handled; suppresses default behavior downstream.
    ///
    /// Focus still moves; only reactions to the change are skipped.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

// =============================================================================
// FOCUSED INDEX SIGNAL
// =============================================================================

thread_local! {
    static FOCUSED_INDEX: Signal<Option<usize>> = signal(None);
}

/// Get the currently focused component index
pub fn get_focused_index() -> Option<usize> {
    FOCUSED_INDEX.with(|s| s.get())
}

/// Check if any component is focused
pub fn has_focus() -> bool {
    get_focused_index().is_some()
}

/// Check if specific component is focused
pub fn is_focused(index: usize) -> bool {
    get_focused_index() == Some(index)
}

// =============================================================================
// FOCUS CALLBACKS
// =============================================================================

/// Callbacks fired when focus changes
#[derive(Clone, Default)]
pub struct FocusCallbacks {
    pub on_focus: Option<Rc<dyn Fn()>>,
    pub on_blur: Option<Rc<dyn Fn()>>,
}

thread_local! {
    // Multiple callbacks per index supported (host control + user callback)
    static FOCUS_CALLBACK_REGISTRY: RefCell<HashMap<usize, Vec<(usize, FocusCallbacks)>>> =
        RefCell::new(HashMap::new());
    static NEXT_CALLBACK_ID: Cell<usize> = const { Cell::new(0) };
}

/// Register focus callbacks for a component.
/// Returns cleanup function to unregister.
pub fn register_callbacks(index: usize, callbacks: FocusCallbacks) -> impl FnOnce() {
    let callback_id = NEXT_CALLBACK_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });

    FOCUS_CALLBACK_REGISTRY.with(|reg| {
        reg.borrow_mut()
            .entry(index)
            .or_default()
            .push((callback_id, callbacks));
    });

    move || {
        FOCUS_CALLBACK_REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(list) = reg.get_mut(&index) {
                list.retain(|(id, _)| *id != callback_id);
                if list.is_empty() {
                    reg.remove(&index);
                }
            }
        });
    }
}

fn callbacks_for(index: usize) -> Vec<FocusCallbacks> {
    FOCUS_CALLBACK_REGISTRY.with(|reg| {
        reg.borrow()
            .get(&index)
            .map(|list| list.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default()
    })
}

/// Internal: Set focus and fire callbacks at the source.
///
/// Callbacks run after the registry borrow is released, so they may move
/// focus again or (un)register callbacks.
fn set_focus_with_callbacks(new_index: Option<usize>) {
    let old_index = get_focused_index();

    // No change, no callbacks
    if old_index == new_index {
        return;
    }

    // Update reactive state first: blur handlers observe the new focus
    FOCUSED_INDEX.with(|s| s.set(new_index));

    if let Some(old) = old_index {
        for cb in callbacks_for(old) {
            if let Some(on_blur) = cb.on_blur {
                on_blur();
            }
        }
    }

    if let Some(new) = new_index {
        // A blur handler may already have moved focus elsewhere
        if get_focused_index() != Some(new) {
            return;
        }
        for cb in callbacks_for(new) {
            if let Some(on_focus) = cb.on_focus {
                on_focus();
            }
        }
    }
}

// =============================================================================
// FOCUS API
// =============================================================================

/// Focus a specific component by index.
/// Returns false if the index is not allocated.
pub fn focus(index: usize) -> bool {
    if !is_allocated(index) {
        return false;
    }
    set_focus_with_callbacks(Some(index));
    true
}

/// Clear focus (no component focused)
pub fn blur() {
    set_focus_with_callbacks(None);
}

/// Clear focus only if `index` currently holds it.
pub fn blur_index(index: usize) -> bool {
    if is_focused(index) {
        blur();
        return true;
    }
    false
}

/// Drop a released component's focus and callbacks.
pub fn cleanup_index(index: usize) {
    FOCUS_CALLBACK_REGISTRY.with(|reg| {
        reg.borrow_mut().remove(&index);
    });
    if is_focused(index) {
        FOCUSED_INDEX.with(|s| s.set(None));
    }
}

// =============================================================================
// RESET (for testing)
// =============================================================================

/// Reset all focus state (for testing)
pub fn reset_focus_state() {
    FOCUS_CALLBACK_REGISTRY.with(|reg| reg.borrow_mut().clear());
    FOCUSED_INDEX.with(|s| s.set(None));
}

// =============================================================================
// TESTS
// =============================================================================
