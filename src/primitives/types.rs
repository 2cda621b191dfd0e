//! Primitive types - Props, callbacks and cleanup.
//!
//! These types define the interface between the debounced input, its caller
//! and the host control it renders through.
//! Props support static values, signals, and getters for reactivity.

use std::fmt::Debug;
use std::rc::Rc;

use spark_signals::Signal;
use tracing::warn;

use super::defaults::{
    default_on_before_change, default_on_blur, default_on_key_down, DEFAULT_COMPONENT_REF_PROP,
};
use super::host::{ComponentRef, HostControl, InputComponent};
use super::text_field::TextFieldComponent;
use crate::error::InputResult;
use crate::state::focus::FocusEvent;
use crate::state::keyboard::KeyboardEvent;
use crate::types::InputUpdate;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by components.
///
/// Call this to unmount the component and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Commit callback: receives the settled draft.
pub type CommitCallback<V> = Rc<dyn Fn(V)>;

/// Turns a raw edit payload into a value.
pub type NormalizeCallback<V> = Rc<dyn Fn(InputUpdate) -> InputResult<V>>;

/// Caller hook run before the blur settles; may `prevent_default`.
pub type BlurHook = Rc<dyn Fn(&FocusEvent)>;

/// Caller hook run before Enter/Escape settle; may `prevent_default`.
pub type KeyDownHook = Rc<dyn Fn(&KeyboardEvent)>;

/// Edit handler handed to host controls.
pub type EditHandler = Rc<dyn Fn(InputUpdate) -> InputResult<()>>;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// Signals and getters stay connected: the component observes them in an
/// effect and reacts to every change.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    ///
    /// Setting the signal to the value it already holds does not notify, so
    /// the input never sees it. Re-supplying an unchanged value (resetting a
    /// field to its original value from `on_change`) must go through
    /// `DebouncedInput::set_value`.
    Signal(Signal<T>),
    /// Getter function (re-run whenever the signals it reads change).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }

    /// Whether the value can change after construction.
    pub fn is_reactive(&self) -> bool {
        !matches!(self, PropValue::Static(_))
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

impl From<&str> for PropValue<String> {
    fn from(value: &str) -> Self {
        PropValue::Static(value.to_string())
    }
}

// =============================================================================
// Debounced Input Props
// =============================================================================

/// Props for [`debounced_input`](super::debounced_input).
pub struct DebouncedInputProps<V: Clone + PartialEq + 'static> {
    /// Optional component ID, forwarded to the host control.
    pub id: Option<String>,

    /// Authoritative value owned by the caller.
    ///
    /// Signal and getter sources are only observed when they change. A
    /// same-value `Signal::set` from `on_change` is not seen; reset with
    /// `DebouncedInput::set_value` instead.
    pub value: PropValue<V>,

    /// Called with the draft when an edit settles (blur, Enter, Escape).
    pub on_change: CommitCallback<V>,

    /// Normalizes raw edit payloads before they become the draft.
    pub on_before_change: NormalizeCallback<V>,

    /// Runs before a blur settles; `prevent_default` skips the commit.
    pub on_blur: BlurHook,

    /// Runs before Enter/Escape blur the control; `prevent_default` skips it.
    pub on_key_down: KeyDownHook,

    /// Host control to render.
    pub component: Rc<dyn InputComponent<V>>,

    /// Name under which the host control expects its ref (default: `"ref"`).
    pub component_ref_prop: String,

    /// Where the rendered host control is exposed.
    pub component_ref: ComponentRef,
}

impl<V: Clone + PartialEq + 'static> DebouncedInputProps<V> {
    /// Props for an arbitrary value type; the normalizer and host are required.
    pub fn with_normalizer(
        value: impl Into<PropValue<V>>,
        on_change: impl Fn(V) + 'static,
        on_before_change: impl Fn(InputUpdate) -> InputResult<V> + 'static,
        component: impl InputComponent<V> + 'static,
    ) -> Self {
        Self {
            id: None,
            value: value.into(),
            on_change: Rc::new(on_change),
            on_before_change: Rc::new(on_before_change),
            on_blur: Rc::new(default_on_blur),
            on_key_down: Rc::new(default_on_key_down),
            component: Rc::new(component),
            component_ref_prop: DEFAULT_COMPONENT_REF_PROP.to_string(),
            component_ref: ComponentRef::default(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn on_before_change(
        mut self,
        normalize: impl Fn(InputUpdate) -> InputResult<V> + 'static,
    ) -> Self {
        self.on_before_change = Rc::new(normalize);
        self
    }

    pub fn on_blur(mut self, hook: impl Fn(&FocusEvent) + 'static) -> Self {
        self.on_blur = Rc::new(hook);
        self
    }

    pub fn on_key_down(mut self, hook: impl Fn(&KeyboardEvent) + 'static) -> Self {
        self.on_key_down = Rc::new(hook);
        self
    }

    pub fn component(mut self, component: impl InputComponent<V> + 'static) -> Self {
        self.component = Rc::new(component);
        self
    }

    pub fn component_ref_prop(mut self, name: impl Into<String>) -> Self {
        self.component_ref_prop = name.into();
        self
    }

    pub fn component_ref(mut self, component_ref: impl Into<ComponentRef>) -> Self {
        self.component_ref = component_ref.into();
        self
    }
}

impl DebouncedInputProps<String> {
    /// Text props rendered through the built-in text field.
    ///
    /// This is the recommended way to create props since value and
    /// on_change are required.
    pub fn new(value: impl Into<PropValue<String>>, on_change: impl Fn(String) + 'static) -> Self {
        Self::with_normalizer(value, on_change, default_on_before_change, TextFieldComponent)
    }
}

// =============================================================================
// Host Props
// =============================================================================

/// Everything a host control receives on render.
#[derive(Clone)]
pub struct HostProps<V> {
    /// Component ID, if the caller set one.
    pub id: Option<String>,

    /// Draft to display. Read-only for hosts: edits go through `on_change`.
    pub value: Signal<V>,

    /// Report a raw edit. Errors mean the edit was discarded.
    pub on_change: EditHandler,

    /// Report a focus loss.
    pub on_blur: BlurHook,

    /// Report a key press before acting on it.
    pub on_key_down: KeyDownHook,

    /// Name the caller configured for the ref prop.
    pub ref_prop: String,

    /// Ref target the rendered control must attach to.
    pub component_ref: ComponentRef,
}

impl<V: Clone + PartialEq + Debug + 'static> HostProps<V> {
    /// The ref target, if the host's ref prop convention matches the
    /// configured one.
    pub fn ref_for(&self, name: &str) -> Option<&ComponentRef> {
        (self.ref_prop == name).then_some(&self.component_ref)
    }

    /// Attach `control` under the host's ref prop `name`.
    ///
    /// Returns false (and warns) when `name` is not the configured ref prop:
    /// the control then stays unreachable for the imperative API.
    pub fn attach(&self, name: &str, control: Rc<dyn HostControl>) -> bool {
        match self.ref_for(name) {
            Some(component_ref) => {
                component_ref.set(Some(control));
                true
            }
            None => {
                warn!(
                    host_ref_prop = name,
                    configured = %self.ref_prop,
                    "host control ref prop does not match; focus/blur/select will be no-ops"
                );
                false
            }
        }
    }

    /// Clear the ref target set by a successful `attach`.
    pub fn detach(&self) {
        self.component_ref.set(None);
    }
}

// =============================================================================
// Tests
// =============================================================================
