//! State Module - Runtime state management systems
//!
//! - **Settle** - Draft/authoritative state machine behind the debounced input
//! - **Focus** - Focused index, focus callbacks, focus events
//! - **Keyboard** - Event type, focused-handler registry
//! - **Input** - crossterm event conversion and routing

pub mod focus;
pub mod input;
pub mod keyboard;
pub mod settle;

pub use focus::{FocusCallbacks, FocusEvent, FocusKind};
pub use keyboard::{KeyState, KeyboardEvent, Modifiers};
pub use settle::{Phase, Reconcile, SettleState};
