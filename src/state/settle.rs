//! Settle Module - Commit-on-settle state machine
//!
//! Tracks the draft shown by an input against the authoritative value owned
//! by the caller, and decides when a pending edit must be committed.
//!
//! The phase is implicit in the relation between the two values:
//! - **Synced** - `draft == authoritative`
//! - **Dirty** - the user typed something not yet committed
//!
//! # Settling
//!
//! A settle trigger (focus loss, Enter, Escape) is split in two steps so the
//! caller's commit callback can run between them without any borrow held:
//!
//! ```ignore
//! if let Some(value) = state.borrow_mut().begin_settle() {
//!     on_change(value); // may call back into `receive`
//! }
//! state.borrow_mut().finish_settle();
//! ```
//!
//! Between the two calls the state is *awaiting a reply*: if the caller
//! re-supplies its authoritative value during that window, even an unchanged
//! one, the draft reverts to it.

use std::fmt::Debug;

use tracing::{debug, trace};

// =============================================================================
// TYPES
// =============================================================================

/// Relation between draft and authoritative value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Synced,
    Dirty,
}

/// Outcome of supplying an authoritative value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconcile {
    /// The value changed; draft overwritten (caller wins).
    Replaced,
    /// Same value re-supplied while a commit awaited a reply; draft reverted.
    Reverted,
    /// Same value as before; local edits kept.
    Kept,
}

impl Reconcile {
    /// Whether the draft may have changed.
    pub fn touched_draft(self) -> bool {
        !matches!(self, Reconcile::Kept)
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Draft/authoritative pair for one input.
#[derive(Clone, Debug)]
pub struct SettleState<V> {
    draft: V,
    authoritative: V,
    awaiting_reply: bool,
}

impl<V: Clone + PartialEq + Debug> SettleState<V> {
    /// Seed both values from the caller's initial value.
    pub fn new(value: V) -> Self {
        Self {
            draft: value.clone(),
            authoritative: value,
            awaiting_reply: false,
        }
    }

    pub fn draft(&self) -> &V {
        &self.draft
    }

    pub fn authoritative(&self) -> &V {
        &self.authoritative
    }

    pub fn phase(&self) -> Phase {
        if self.draft == self.authoritative {
            Phase::Synced
        } else {
            Phase::Dirty
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.phase() == Phase::Dirty
    }

    /// True between `begin_settle` returning a value and `finish_settle`.
    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// The caller supplies its authoritative value.
    pub fn receive(&mut self, value: V) -> Reconcile {
        let outcome = if value != self.authoritative {
            Reconcile::Replaced
        } else if self.awaiting_reply {
            Reconcile::Reverted
        } else {
            return Reconcile::Kept;
        };

        debug!(?value, ?outcome, discarded = ?self.draft, "authoritative value received");
        self.draft = value.clone();
        self.authoritative = value;
        self.awaiting_reply = false;
        outcome
    }

    /// Replace the draft with a normalized edit.
    pub fn edit(&mut self, value: V) -> Phase {
        trace!(?value, "draft edited");
        self.draft = value;
        self.phase()
    }

    /// Start settling. Returns the value to commit, or `None` when synced.
    pub fn begin_settle(&mut self) -> Option<V> {
        if !self.is_dirty() {
            return None;
        }

        self.awaiting_reply = true;
        Some(self.draft.clone())
    }

    /// Close the reply window opened by `begin_settle`.
    ///
    /// A caller that did not answer keeps seeing the draft.
    pub fn finish_settle(&mut self) {
        self.awaiting_reply = false;
    }
}

impl<V: Clone + PartialEq + Debug + Default> Default for SettleState<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

// =============================================================================
// TESTS
// =============================================================================
