// src/merge_split.rs
// Merge/split controller: fuses a pair into one double-wide cell or splits
// it back. Both directions are destructive (content of both slots is reset
// to baseline); the dispatch layer obtains user confirmation before calling
// in here, these methods trust their caller.

use tracing::{debug, info};

use crate::pair;
use crate::state_mod::GridEngine;

impl GridEngine {
    /// Fuse pair `(first, second)` into a double-wide cell headed at
    /// `first`. Returns `false` (state untouched) unless `(first, second)`
    /// is a valid pair with both slots active.
    pub fn expand(&mut self, first: usize, second: usize) -> bool {
        // Range checks must come first: pair math is only defined for
        // in-range indices, and stale host payloads can carry index 0.
        if !self.is_interactable(first)
            || !self.is_interactable(second)
            || !pair::is_pair(first, second)
        {
            debug!(first, second, "expand ignored: precondition not met");
            return false;
        }

        self.removed.insert(second);
        self.expanded.insert(first);
        self.clear_slot_content(first);
        self.clear_slot_content(second);
        // Baseline for a fresh double-wide cell; the user may change the
        // head's count afterwards (it is not forced to stay 2).
        self.set_image_count_raw(first, 2);
        self.set_image_count_raw(second, 1);
        if self.selection == Some(second) {
            self.selection = None;
        }

        info!(first, second, "pair merged");
        self.debug_check_invariants();
        true
    }

    /// Split the merged pair headed at `first` back into two single cells.
    /// Returns `false` (state untouched) unless the pair is currently
    /// merged.
    pub fn split(&mut self, first: usize, second: usize) -> bool {
        if !self.in_range(first)
            || !self.in_range(second)
            || !pair::is_pair(first, second)
            || !self.expanded.contains(&first)
            || !self.removed.contains(&second)
        {
            debug!(first, second, "split ignored: pair not merged");
            return false;
        }

        self.removed.remove(&second);
        self.expanded.remove(&first);
        self.hidden.remove(&first);
        self.hidden.remove(&second);
        self.clear_slot_content(first);
        self.clear_slot_content(second);
        self.set_image_count_raw(first, 1);
        self.set_image_count_raw(second, 1);
        if self.selection == Some(first) || self.selection == Some(second) {
            self.selection = None;
        }

        info!(first, second, "pair split");
        self.debug_check_invariants();
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::state_mod::{GridEngine, SlotStatus};

    #[test]
    fn expand_sets_pair_topology_and_baseline_counts() {
        let mut engine = GridEngine::new(12);
        assert!(engine.expand(1, 2));
        assert_eq!(engine.status_of(1), Some(SlotStatus::ActiveBigHead));
        assert_eq!(engine.status_of(2), Some(SlotStatus::MergedAway));
        assert_eq!(engine.item_at(1).unwrap().image_count, 2);
        assert_eq!(engine.item_at(2).unwrap().image_count, 1);
    }

    #[test]
    fn expand_clears_both_slots_content() {
        let mut engine = GridEngine::new(12);
        engine.set_caption(3, "before");
        engine.set_image(3, 0, "keep.jpg".into());
        engine.set_caption(4, "partner");
        assert!(engine.expand(3, 4));
        assert!(engine.item_at(3).unwrap().is_empty());
        assert!(engine.item_at(4).unwrap().is_empty());
    }

    #[test]
    fn expand_rejects_non_pairs_and_suppressed_slots() {
        let mut engine = GridEngine::new(12);
        assert!(!engine.expand(2, 3), "not a pair");
        assert!(!engine.expand(2, 1), "reversed order");
        assert!(!engine.expand(1, 4), "not adjacent");

        engine.hide(5);
        assert!(!engine.expand(5, 6), "hidden first slot");
        engine.hide(8);
        assert!(!engine.expand(7, 8), "hidden second slot");

        engine.expand(1, 2);
        assert!(!engine.expand(1, 2), "already merged: second is removed");
    }

    #[test]
    fn out_of_range_indices_are_ignored_not_a_panic() {
        let mut engine = GridEngine::new(12);
        assert!(!engine.expand(0, 1));
        assert!(!engine.split(0, 1));
        assert!(!engine.expand(13, 14));
        assert!(!engine.split(13, 14));
        assert_eq!(engine.status_of(1), Some(SlotStatus::ActiveSmall));
        assert!(engine.expanded.is_empty());
        assert!(engine.removed.is_empty());
    }

    #[test]
    fn expand_drops_selection_of_absorbed_slot() {
        let mut engine = GridEngine::new(12);
        engine.select(2);
        engine.expand(1, 2);
        assert_eq!(engine.current_selection(), None);
    }

    #[test]
    fn split_restores_two_empty_small_cells() {
        let mut engine = GridEngine::new(12);
        engine.expand(1, 2);
        engine.set_caption(1, "on the big cell");
        engine.set_image_count(1, 4);
        assert!(engine.split(1, 2));
        assert_eq!(engine.status_of(1), Some(SlotStatus::ActiveSmall));
        assert_eq!(engine.status_of(2), Some(SlotStatus::ActiveSmall));
        assert!(engine.item_at(1).unwrap().is_empty());
        assert_eq!(engine.item_at(1).unwrap().image_count, 1);
        assert_eq!(engine.item_at(2).unwrap().image_count, 1);
    }

    #[test]
    fn split_is_noop_on_unmerged_pair() {
        let mut engine = GridEngine::new(12);
        assert!(!engine.split(1, 2));
        assert_eq!(engine.status_of(1), Some(SlotStatus::ActiveSmall));
    }

    #[test]
    fn split_clears_selection_of_either_slot() {
        let mut engine = GridEngine::new(12);
        engine.expand(1, 2);
        engine.select(1);
        engine.split(1, 2);
        assert_eq!(engine.current_selection(), None);
    }

    #[test]
    fn merge_split_round_trip_matches_baseline_topology() {
        let mut engine = GridEngine::new(12);
        engine.expand(1, 2);
        engine.split(1, 2);
        assert!(engine.expanded.is_empty());
        assert!(engine.removed.is_empty());
        assert!(engine.item_at(1).unwrap().is_empty());
        assert!(engine.item_at(2).unwrap().is_empty());
        assert_eq!(engine.item_at(1).unwrap().image_count, 1);
        assert_eq!(engine.item_at(2).unwrap().image_count, 1);
    }

    #[test]
    fn big_head_image_count_stays_user_settable() {
        let mut engine = GridEngine::new(12);
        engine.expand(1, 2);
        assert!(engine.set_image_count(1, 6));
        assert_eq!(engine.item_at(1).unwrap().image_count, 6);
    }
}
