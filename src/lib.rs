//! # spark-debounced-input
//!
//! Commit-on-settle text input for reactive terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Behavior
//!
//! The input keeps a local draft while the user types and only calls the
//! caller's `on_change` when the edit *settles*: the control loses focus, or the
//! user presses Enter or Escape. The caller stays the owner of the committed
//! value:
//!
//! - a new value from the caller always replaces the draft
//! - a commit the caller ignores leaves the draft on screen
//! - re-supplying the original value from inside `on_change` resets the draft
//!
//! The reset needs [`DebouncedInput::set_value`]. A bound `Signal` that is
//! set to the value it already holds does not notify, so the input never
//! sees that re-supply and keeps the draft.
//!
//! ```text
//! keystroke ──▶ draft (local)          blur / Enter / Escape
//!                  │                            │
//!                  └──── draft ≠ value ? ◀──────┘
//!                              │
//!                              ▼
//!                      on_change(draft)
//! ```
//!
//! ## Modules
//!
//! - [`state`] - Settle state machine, focus, keyboard, crossterm input
//! - [`primitives`] - The debounced input, host control traits, text field
//! - [`engine`] - Component index registry
//! - [`types`] - Edit payloads and key codes
//! - [`error`] - Normalizer errors

pub mod engine;
pub mod error;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{InputError, InputResult};

pub use engine::{allocate_index, get_id, get_index, is_allocated, release_index, reset_registry};

pub use primitives::{
    debounced_input, ComponentRef, DebouncedInput, DebouncedInputProps, HostControl, HostProps,
    HostRef, InputComponent, PropValue, TextField, TextFieldComponent,
    Cleanup, CommitCallback, NormalizeCallback, BlurHook, KeyDownHook, EditHandler,
};

pub use state::{
    // Settle
    Phase, Reconcile, SettleState,
    // Focus
    FocusCallbacks, FocusEvent, FocusKind,
    // Keyboard
    KeyState, KeyboardEvent, Modifiers,
};

pub use state::focus::{blur, focus, get_focused_index, has_focus, is_focused, reset_focus_state};
pub use state::keyboard::{dispatch as dispatch_keyboard, reset_keyboard_state};
pub use state::input::{convert_key_event, route_event, InputEvent};
