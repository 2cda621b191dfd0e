//! Engine - Component index registry.
//!
//! Host controls are indices, not objects: focus and keyboard state are keyed
//! by the index the registry hands out.

mod registry;

pub use registry::*;
