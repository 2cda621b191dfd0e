//! Primitives - The debounced input and the host controls it renders through.
//!
//! - [`debounced_input`] - Input that commits on blur / Enter / Escape
//! - [`TextFieldComponent`] - Built-in single-line host control
//! - [`host`] - Host control traits and ref targets
//!
//! # Architecture
//!
//! The debounced input owns no widget. It builds [`HostProps`] (draft signal,
//! edit / blur / key-down handlers, ref target) and hands them to an
//! [`InputComponent`]. The rendered control attaches itself to the ref target
//! under its ref prop name; the input reaches it only through that target.
//!
//! ```text
//! host edit ──▶ on_before_change ──▶ draft ──▶ value signal ──▶ host
//! blur / Enter / Escape ──▶ draft ≠ value ? ──▶ on_change
//! ```

mod debounced_input;
pub mod defaults;
pub mod host;
mod text_field;
mod types;

pub use debounced_input::{debounced_input, DebouncedInput};
pub use host::{ComponentRef, HostControl, HostRef, InputComponent, RefCallback};
pub use text_field::{TextField, TextFieldComponent, TEXT_FIELD_REF_PROP};
pub use types::*;
