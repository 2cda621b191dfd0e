//! Stateless defaults for debounced input props.

use crate::error::{InputError, InputResult};
use crate::state::focus::FocusEvent;
use crate::state::keyboard::KeyboardEvent;
use crate::types::InputUpdate;

/// Default name of the prop a host control reads its ref from.
pub const DEFAULT_COMPONENT_REF_PROP: &str = "ref";

/// Default normalizer for text.
///
/// Text passes through unchanged; events yield their current target's value,
/// falling back to the originating target. An event with neither is an error.
pub fn default_on_before_change(update: InputUpdate) -> InputResult<String> {
    match update {
        InputUpdate::Text(text) => Ok(text),
        InputUpdate::Event(event) => event
            .value()
            .map(str::to_string)
            .ok_or(InputError::MissingValue),
    }
}

/// Default key-down hook. No-op.
pub fn default_on_key_down(_event: &KeyboardEvent) {}

/// Default blur hook. No-op.
pub fn default_on_blur(_event: &FocusEvent) {}
