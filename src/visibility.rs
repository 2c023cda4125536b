// src/visibility.rs
// Hide/show suppression and single-selection semantics. Hiding preserves
// content (unlike merge/split); there is no unhide primitive, only a bulk
// reset brings hidden slots back.

use tracing::{debug, info};

use crate::state_mod::GridEngine;

impl GridEngine {
    /// Suppress `slot` from view and interaction. Content is preserved.
    /// No-op on merged slots (head or absorbed partner): the sets stay
    /// pairwise disjoint, a merged pair must be split before hiding.
    pub fn hide(&mut self, slot: usize) -> bool {
        if !self.in_range(slot)
            || self.removed.contains(&slot)
            || self.expanded.contains(&slot)
        {
            debug!(slot, "hide ignored: slot out of range or merged");
            return false;
        }
        if !self.hidden.insert(slot) {
            return false;
        }
        if self.selection == Some(slot) {
            self.selection = None;
        }
        info!(slot, "slot hidden");
        self.debug_check_invariants();
        true
    }

    /// Select `slot`, silently replacing any previous selection. No-op on
    /// hidden or removed slots.
    pub fn select(&mut self, slot: usize) -> bool {
        if !self.is_interactable(slot) {
            debug!(slot, "select ignored: slot not interactable");
            return false;
        }
        self.selection = Some(slot);
        true
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selection = None;
    }
}
