//! Debounced Input - Text input that commits on settle.
//!
//! Edits stay local to the input until it settles: the control loses focus or
//! the user presses Enter or Escape. Only then is `on_change` called, and only
//! if the draft differs from the caller's value.
//!
//! # Features
//!
//! - Controlled: the caller owns the committed value (`value` prop)
//! - Caller wins: a new authoritative value overwrites any pending edit
//! - Pluggable host control (`component`) and ref prop convention
//! - Cancellable settle through the `on_blur` / `on_key_down` hooks
//! - Imperative `focus` / `blur` / `select`
//!
//! # Example
//!
//! ```ignore
//! use spark_debounced_input::primitives::{debounced_input, DebouncedInputProps};
//! use spark_signals::signal;
//!
//! let name = signal(String::new());
//! let name_setter = name.clone();
//!
//! let input = debounced_input(
//!     DebouncedInputProps::new(name.clone(), move |value| name_setter.set(value))
//!         .id("name"),
//! );
//!
//! input.focus();
//! // ... user types, presses Enter: `name` is set once
//! input.unmount();
//! ```

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use spark_signals::{effect, signal, Signal};
use tracing::{debug, error, warn};

use super::host::{ComponentRef, HostRef};
use super::types::{
    BlurHook, Cleanup, CommitCallback, DebouncedInputProps, HostProps, KeyDownHook,
    NormalizeCallback,
};
use crate::error::InputResult;
use crate::state::focus::FocusEvent;
use crate::state::keyboard::KeyboardEvent;
use crate::state::settle::{Phase, SettleState};
use crate::types::InputUpdate;

// =============================================================================
// Controller
// =============================================================================

/// Shared state behind a debounced input and the handlers given to its host.
///
/// No method calls a user callback while `state` is borrowed: callbacks may
/// re-enter through `receive` or the imperative API.
struct Controller<V> {
    state: RefCell<SettleState<V>>,
    draft: Signal<V>,
    on_change: CommitCallback<V>,
    on_before_change: NormalizeCallback<V>,
    on_blur: BlurHook,
    on_key_down: KeyDownHook,
    component_ref: ComponentRef,
}

impl<V: Clone + PartialEq + Debug + 'static> Controller<V> {
    fn publish(&self) {
        let draft = self.state.borrow().draft().clone();
        self.draft.set(draft);
    }

    /// The caller supplies its authoritative value.
    fn receive(&self, value: V) {
        let outcome = self.state.borrow_mut().receive(value);
        if outcome.touched_draft() {
            self.publish();
        }
    }

    /// Raw edit from the host control.
    fn handle_change(&self, update: InputUpdate) -> InputResult<()> {
        let value = (self.on_before_change)(update).inspect_err(|err| {
            warn!(%err, "edit discarded by normalizer");
        })?;

        self.state.borrow_mut().edit(value);
        self.publish();
        Ok(())
    }

    /// Commit the draft if it differs from the authoritative value.
    fn dispatch_change(&self) {
        let committed = self.state.borrow_mut().begin_settle();
        let Some(value) = committed else { return };

        debug!(?value, "committing draft");
        (self.on_change)(value);

        // A re-supplied value during the callback has already been applied
        self.state.borrow_mut().finish_settle();
        self.publish();
    }

    /// Focus loss, unless the caller's hook prevents it.
    fn handle_blur(&self, event: &FocusEvent) {
        (self.on_blur)(event);
        if event.default_prevented() {
            debug!(index = event.index, "blur settle prevented by hook");
            return;
        }

        self.dispatch_change();
    }

    /// Enter/Escape blur the host so the commit runs through `handle_blur`.
    fn handle_key_down(&self, event: &KeyboardEvent) {
        (self.on_key_down)(event);
        if event.default_prevented() {
            return;
        }

        if !event.is_press() || !event.is_settle_key() {
            return;
        }

        match &self.component_ref {
            ComponentRef::Slot(slot) => {
                if !slot.blur() {
                    debug!(key = %event.key, "no host control attached; settle key ignored");
                }
            }
            ComponentRef::Callback(_) => {
                debug!(key = %event.key, "callback ref cannot blur; settle key ignored");
            }
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Handle to a mounted debounced input.
///
/// The input stays mounted until `unmount` is called. Dropping the handle does
/// not unmount: the value effect keeps the controller alive and the host
/// control stays registered, still receiving keys and committing. Always call
/// `unmount`.
pub struct DebouncedInput<V> {
    controller: Rc<Controller<V>>,
    id: Option<String>,
    ref_prop: String,
    cleanup: RefCell<Option<Cleanup>>,
}

impl<V: Clone + PartialEq + Debug + 'static> DebouncedInput<V> {
    /// Build the controller without rendering a host control.
    ///
    /// Use [`host_props`](Self::host_props) to drive a host yourself.
    pub fn new(props: DebouncedInputProps<V>) -> Self {
        let initial = props.value.get();

        let controller = Rc::new(Controller {
            state: RefCell::new(SettleState::new(initial.clone())),
            draft: signal(initial),
            on_change: props.on_change,
            on_before_change: props.on_before_change,
            on_blur: props.on_blur,
            on_key_down: props.on_key_down,
            component_ref: props.component_ref,
        });

        if controller.component_ref.is_callback() {
            error!(
                "debounced input received a callback ref; Enter/Escape will not settle and focus/blur/select are no-ops"
            );
        }
        if props.component_ref_prop.is_empty() {
            warn!("debounced input configured with an empty ref prop name");
        }

        // Observe reactive authoritative values; the first run sees the initial value
        let stop_source: Option<Cleanup> = if props.value.is_reactive() {
            let source = props.value;
            let observer = controller.clone();
            Some(Box::new(effect(move || {
                let value = source.get();
                observer.receive(value);
            })))
        } else {
            None
        };

        Self {
            controller,
            id: props.id,
            ref_prop: props.component_ref_prop,
            cleanup: RefCell::new(stop_source),
        }
    }

    /// Props to hand to a host control.
    pub fn host_props(&self) -> HostProps<V> {
        let on_change = self.controller.clone();
        let on_blur = self.controller.clone();
        let on_key_down = self.controller.clone();

        HostProps {
            id: self.id.clone(),
            value: self.controller.draft.clone(),
            on_change: Rc::new(move |update| on_change.handle_change(update)),
            on_blur: Rc::new(move |event: &FocusEvent| on_blur.handle_blur(event)),
            on_key_down: Rc::new(move |event: &KeyboardEvent| on_key_down.handle_key_down(event)),
            ref_prop: self.ref_prop.clone(),
            component_ref: self.controller.component_ref.clone(),
        }
    }

    // =========================================================================
    // Imperative API
    // =========================================================================

    /// Focus the host control. No-op when none is attached.
    pub fn focus(&self) {
        if let Some(slot) = self.host_ref() {
            slot.focus();
        }
    }

    /// Blur the host control, settling any pending edit.
    pub fn blur(&self) {
        if let Some(slot) = self.host_ref() {
            slot.blur();
        }
    }

    /// Select the host control's content.
    pub fn select(&self) {
        if let Some(slot) = self.host_ref() {
            slot.select();
        }
    }

    /// Re-supply the authoritative value (the caller "re-renders" the input).
    ///
    /// A different value overwrites the draft. The same value only resets the
    /// draft when supplied from inside `on_change`.
    pub fn set_value(&self, value: V) {
        self.controller.receive(value);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Last authoritative value observed.
    pub fn value(&self) -> V {
        self.controller.state.borrow().authoritative().clone()
    }

    /// Value currently displayed.
    pub fn draft(&self) -> V {
        self.controller.state.borrow().draft().clone()
    }

    /// Reactive view of the draft.
    pub fn draft_signal(&self) -> Signal<V> {
        self.controller.draft.clone()
    }

    pub fn phase(&self) -> Phase {
        self.controller.state.borrow().phase()
    }

    pub fn is_dirty(&self) -> bool {
        self.phase() == Phase::Dirty
    }

    /// Slot holding the host control, unless a callback ref was configured.
    pub fn host_ref(&self) -> Option<&HostRef> {
        self.controller.component_ref.slot()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    fn add_cleanup(&self, next: Cleanup) {
        let mut cleanup = self.cleanup.borrow_mut();
        *cleanup = Some(match cleanup.take() {
            Some(previous) => Box::new(move || {
                next();
                previous();
            }),
            None => next,
        });
    }

    /// Unmount the host control and stop observing the value source.
    ///
    /// Pending edits are dropped without committing.
    pub fn unmount(&self) {
        let cleanup = self.cleanup.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
        self.controller.component_ref.set(None);
    }
}

// =============================================================================
// Component
// =============================================================================

/// Create a debounced input and render its host control.
///
/// Returns the handle that exposes the imperative API and unmounts the input.
pub fn debounced_input<V>(props: DebouncedInputProps<V>) -> DebouncedInput<V>
where
    V: Clone + PartialEq + Debug + 'static,
{
    let component = props.component.clone();
    let input = DebouncedInput::new(props);

    let render_cleanup = component.render(input.host_props());
    input.add_cleanup(render_cleanup);

    input
}

// =============================================================================
// Tests
// =============================================================================
