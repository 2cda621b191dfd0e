//! Host controls - the widgets a debounced input renders through.
//!
//! A host control is anything input-like that can take focus, lose it and
//! select its content. The debounced input never talks to a concrete widget:
//! it hands [`HostProps`](super::HostProps) to an [`InputComponent`] and reaches
//! the rendered instance through a [`ComponentRef`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::types::{Cleanup, HostProps};

// =============================================================================
// Host Control
// =============================================================================

/// Imperative surface of a rendered input-like widget.
pub trait HostControl {
    fn focus(&self);
    fn blur(&self);
    fn select(&self);
}

/// Renders a host control for a debounced input.
///
/// Returns the cleanup that unmounts the rendered control.
pub trait InputComponent<V> {
    fn render(&self, props: HostProps<V>) -> Cleanup;
}

impl<V, F> InputComponent<V> for F
where
    F: Fn(HostProps<V>) -> Cleanup,
{
    fn render(&self, props: HostProps<V>) -> Cleanup {
        self(props)
    }
}

// =============================================================================
// Host Ref
// =============================================================================

/// Stable slot holding the rendered host control, if any.
///
/// Clones share the slot.
#[derive(Clone, Default)]
pub struct HostRef(Rc<RefCell<Option<Rc<dyn HostControl>>>>);

impl HostRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, control: Rc<dyn HostControl>) {
        *self.0.borrow_mut() = Some(control);
    }

    pub fn detach(&self) {
        self.0.borrow_mut().take();
    }

    pub fn get(&self) -> Option<Rc<dyn HostControl>> {
        self.0.borrow().clone()
    }

    pub fn is_attached(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Focus the attached control. Returns false when nothing is attached.
    pub fn focus(&self) -> bool {
        self.with_control(|control| control.focus())
    }

    /// Blur the attached control. Returns false when nothing is attached.
    pub fn blur(&self) -> bool {
        self.with_control(|control| control.blur())
    }

    /// Select the attached control's content. Returns false when nothing is attached.
    pub fn select(&self) -> bool {
        self.with_control(|control| control.select())
    }

    // The slot borrow is released before calling into the control: blurring
    // may re-enter the debounced input, which may re-render into this slot.
    fn with_control(&self, f: impl FnOnce(&dyn HostControl)) -> bool {
        match self.get() {
            Some(control) => {
                f(control.as_ref());
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HostRef")
            .field(&if self.is_attached() { "attached" } else { "empty" })
            .finish()
    }
}

// =============================================================================
// Component Ref
// =============================================================================

/// Callback notified when a host control is attached (`Some`) or detached (`None`).
pub type RefCallback = Rc<dyn Fn(Option<Rc<dyn HostControl>>)>;

/// How the rendered host control is exposed to the debounced input.
#[derive(Clone)]
pub enum ComponentRef {
    /// Stable slot; required for Enter/Escape to blur the control.
    Slot(HostRef),
    /// Attach/detach notifications only. The input cannot reach the control.
    Callback(RefCallback),
}

impl ComponentRef {
    /// Store (or clear) the rendered control.
    pub fn set(&self, control: Option<Rc<dyn HostControl>>) {
        match self {
            ComponentRef::Slot(slot) => match control {
                Some(control) => slot.attach(control),
                None => slot.detach(),
            },
            ComponentRef::Callback(callback) => callback(control),
        }
    }

    pub fn slot(&self) -> Option<&HostRef> {
        match self {
            ComponentRef::Slot(slot) => Some(slot),
            ComponentRef::Callback(_) => None,
        }
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, ComponentRef::Callback(_))
    }
}

impl Default for ComponentRef {
    fn default() -> Self {
        ComponentRef::Slot(HostRef::new())
    }
}

impl From<HostRef> for ComponentRef {
    fn from(slot: HostRef) -> Self {
        ComponentRef::Slot(slot)
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentRef::Slot(slot) => f.debug_tuple("Slot").field(slot).finish(),
            ComponentRef::Callback(_) => f.write_str("Callback"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
