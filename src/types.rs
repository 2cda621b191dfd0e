//! Core types shared between the controller, host controls and props.
//!
//! - [`InputUpdate`] - Raw edit payload raised by a host control
//! - [`ChangeEvent`] - Event-shaped edit payload (target / current target values)
//! - Key code constants used by the settle logic

// =============================================================================
// Key Codes
// =============================================================================

/// Key code of the Backspace key.
pub const KEY_BACKSPACE: u32 = 8;

/// Key code of the Tab key.
pub const KEY_TAB: u32 = 9;

/// Key code of the Enter key.
pub const KEY_ENTER: u32 = 13;

/// Key code of the Escape key.
pub const KEY_ESCAPE: u32 = 27;

/// Key code of the Delete key.
pub const KEY_DELETE: u32 = 46;

// =============================================================================
// Change Event
// =============================================================================

/// An edit event as raised by an input-like host control.
///
/// `current_target` is the element the handler is attached to, `target` the
/// element that originated the event. For a plain text field both carry the
/// same value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Value of the element that originated the event.
    pub target: Option<String>,
    /// Value of the element the handler is attached to.
    pub current_target: Option<String>,
}

impl ChangeEvent {
    /// Create an event where both targets report `value`.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            target: Some(value.clone()),
            current_target: Some(value),
        }
    }

    /// Create an event that only carries a value on its originating target.
    pub fn from_target(value: impl Into<String>) -> Self {
        Self {
            target: Some(value.into()),
            current_target: None,
        }
    }

    /// Value on the current target, falling back to the originating target.
    pub fn value(&self) -> Option<&str> {
        self.current_target
            .as_deref()
            .or(self.target.as_deref())
    }
}

// =============================================================================
// Input Update
// =============================================================================

/// Raw payload handed to the edit handler.
///
/// Host controls either report the new text directly or raise an event that
/// the normalizer reads the value from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputUpdate {
    /// Already-normalized text.
    Text(String),
    /// Event-shaped payload.
    Event(ChangeEvent),
}

impl From<String> for InputUpdate {
    fn from(value: String) -> Self {
        InputUpdate::Text(value)
    }
}

impl From<&str> for InputUpdate {
    fn from(value: &str) -> Self {
        InputUpdate::Text(value.to_string())
    }
}

impl From<ChangeEvent> for InputUpdate {
    fn from(event: ChangeEvent) -> Self {
        InputUpdate::Event(event)
    }
}

// =============================================================================
// Tests
// =============================================================================
