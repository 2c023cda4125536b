// src/reset.rs
// Bulk reinitialization to the baseline layout: first `visible_count` slots
// active and empty, the rest hidden. The only operation that re-activates a
// hidden slot.

use tracing::info;

use crate::state_mod::GridEngine;

impl GridEngine {
    /// Reset the whole grid: unmerge everything, clear the selection and
    /// every item's content, and hide all slots past `visible_count`
    /// (clamped to the grid size).
    pub fn reset_to_baseline(&mut self, visible_count: usize) {
        let visible_count = visible_count.min(self.slot_count());

        self.drag_cancel();
        self.expanded.clear();
        self.removed.clear();
        self.selection = None;
        self.hidden = ((visible_count + 1)..=self.slot_count()).collect();

        for slot in 1..=self.slot_count() {
            self.clear_slot_content(slot);
            self.set_image_count_raw(slot, 1);
        }

        info!(visible_count, "grid reset to baseline");
        self.debug_check_invariants();
    }
}

#[cfg(test)]
mod tests {
    use crate::state_mod::{GridEngine, SlotStatus};

    #[test]
    fn reset_hides_everything_past_visible_count() {
        let mut engine = GridEngine::new(12);
        engine.expand(1, 2);
        engine.set_caption(5, "gone after reset");
        engine.select(5);
        engine.hide(11);

        engine.reset_to_baseline(2);

        for slot in 1..=2 {
            assert_eq!(engine.status_of(slot), Some(SlotStatus::ActiveSmall));
        }
        for slot in 3..=12 {
            assert_eq!(engine.status_of(slot), Some(SlotStatus::Hidden), "slot {slot}");
        }
        assert_eq!(engine.current_selection(), None);
        for slot in 1..=12 {
            let item = engine.item_at(slot).unwrap();
            assert!(item.is_empty());
            assert_eq!(item.image_count, 1);
        }
    }

    #[test]
    fn reset_reactivates_previously_hidden_slots() {
        let mut engine = GridEngine::new(12);
        engine.hide(3);
        engine.reset_to_baseline(12);
        assert_eq!(engine.status_of(3), Some(SlotStatus::ActiveSmall));
        assert!(engine.hidden.is_empty());
    }

    #[test]
    fn reset_clamps_visible_count() {
        let mut engine = GridEngine::new(8);
        engine.reset_to_baseline(50);
        assert!(engine.hidden.is_empty());
        engine.reset_to_baseline(0);
        assert_eq!(engine.hidden.len(), 8);
    }

    #[test]
    fn reset_aborts_an_inflight_drag() {
        let mut engine = GridEngine::new(12);
        engine.drag_begin(1);
        engine.reset_to_baseline(12);
        assert!(!engine.drag_in_progress());
    }
}
