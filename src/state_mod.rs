// src/state_mod.rs
// Grid state - the single owned state object behind every controller.
//
// Slots are fixed identities 1..=slot_count; Items are the movable content
// bound to them. All mutation goes through the controller methods in the
// sibling modules (merge_split, drag_reorder, visibility, reset), each of
// which applies its change as one synchronous batch.

use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::drag_reorder::DragSession;
use crate::hooks::{EngineHooks, NullHooks};

/// Hard cap on the grid size; hosts configure 1..=MAX_SLOTS at init.
pub const MAX_SLOTS: usize = 12;

/// Image-slot counts a cell may be configured with.
pub const ALLOWED_IMAGE_COUNTS: [u8; 6] = [1, 2, 3, 4, 6, 9];

/// Movable content bound to a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Slot this item was created in. Never changes; encodes the reorder
    /// permutation for persistence (`orderIndices`).
    pub origin: usize,
    /// Image references, positional, at most `image_count` entries. `None`
    /// marks an empty position the user has not filled yet.
    pub images: Vec<Option<String>>,
    /// How many image positions the cell renders (1, 2, 3, 4, 6 or 9).
    pub image_count: u8,
    /// Caption / category text under the cell.
    pub caption: String,
}

impl Item {
    /// An item with no content, as created at grid initialization.
    pub fn empty(origin: usize) -> Self {
        Self {
            origin,
            images: Vec::new(),
            image_count: 1,
            caption: String::new(),
        }
    }

    /// Whether the item carries no user content.
    pub fn is_empty(&self) -> bool {
        self.caption.is_empty() && self.images.iter().all(|i| i.is_none())
    }

    fn clear_content(&mut self) {
        self.images.clear();
        self.caption.clear();
    }
}

/// Derived occupancy status of a slot.
///
/// Derivation precedence is `removed > hidden > expanded > active-small`: a
/// merged-away slot reports `MergedAway` even if a malformed persisted record
/// also listed it as hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// Ordinary single-width cell.
    ActiveSmall,
    /// Visible head of a merged pair (double width).
    ActiveBigHead,
    /// Absorbed into its pair's head; not rendered, not a drag target.
    MergedAway,
    /// Suppressed from view and interaction; content preserved.
    Hidden,
}

/// The grid composition engine.
///
/// Owns the slot→item bindings, the three status sets, the selection pointer
/// and the in-flight drag session. Single-threaded by contract: every public
/// method completes synchronously and leaves the invariants intact.
pub struct GridEngine {
    slot_count: usize,
    items: Vec<Item>,
    pub(crate) expanded: FnvHashSet<usize>,
    pub(crate) removed: FnvHashSet<usize>,
    pub(crate) hidden: FnvHashSet<usize>,
    pub(crate) selection: Option<usize>,
    pub(crate) drag: Option<DragSession>,
    pub(crate) hooks: Box<dyn EngineHooks>,
}

impl std::fmt::Debug for GridEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridEngine")
            .field("slot_count", &self.slot_count)
            .field("expanded", &self.expanded)
            .field("removed", &self.removed)
            .field("hidden", &self.hidden)
            .field("selection", &self.selection)
            .field("dragging", &self.drag.is_some())
            .finish()
    }
}

impl GridEngine {
    /// Create an engine with `slot_count` empty slots (clamped to
    /// 1..=[`MAX_SLOTS`]) and no-op host hooks.
    pub fn new(slot_count: usize) -> Self {
        Self::with_hooks(slot_count, Box::new(NullHooks))
    }

    /// Create an engine wired to host callbacks.
    pub fn with_hooks(slot_count: usize, hooks: Box<dyn EngineHooks>) -> Self {
        let slot_count = slot_count.clamp(1, MAX_SLOTS);
        Self {
            slot_count,
            items: (1..=slot_count).map(Item::empty).collect(),
            expanded: FnvHashSet::default(),
            removed: FnvHashSet::default(),
            hidden: FnvHashSet::default(),
            selection: None,
            drag: None,
            hooks,
        }
    }

    /// Number of slots in the grid.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Whether `slot` is a valid index for this grid.
    pub fn in_range(&self, slot: usize) -> bool {
        (1..=self.slot_count).contains(&slot)
    }

    /// Whether `slot` can be a gesture endpoint: in range and neither hidden
    /// nor merged away.
    pub fn is_interactable(&self, slot: usize) -> bool {
        self.in_range(slot) && !self.hidden.contains(&slot) && !self.removed.contains(&slot)
    }

    /// The item bound to `slot`, or `None` for an out-of-range index.
    pub fn item_at(&self, slot: usize) -> Option<&Item> {
        self.in_range(slot).then(|| &self.items[slot - 1])
    }

    /// Derived status of `slot`, or `None` for an out-of-range index.
    pub fn status_of(&self, slot: usize) -> Option<SlotStatus> {
        if !self.in_range(slot) {
            return None;
        }
        Some(if self.removed.contains(&slot) {
            SlotStatus::MergedAway
        } else if self.hidden.contains(&slot) {
            SlotStatus::Hidden
        } else if self.expanded.contains(&slot) {
            SlotStatus::ActiveBigHead
        } else {
            SlotStatus::ActiveSmall
        })
    }

    /// Currently selected slot, if any.
    pub fn current_selection(&self) -> Option<usize> {
        self.selection
    }

    // -- content operations (driven by upload / caption-edit collaborators) --

    /// Set the caption of an active slot. Ignored for hidden/removed slots.
    pub fn set_caption(&mut self, slot: usize, caption: &str) -> bool {
        if !self.is_interactable(slot) {
            debug!(slot, "set_caption ignored: slot not interactable");
            return false;
        }
        self.items[slot - 1].caption = caption.to_string();
        true
    }

    /// Bind an image reference to `position` of an active slot. Positions at
    /// or beyond the slot's image count are ignored.
    pub fn set_image(&mut self, slot: usize, position: usize, image: String) -> bool {
        if !self.is_interactable(slot) {
            debug!(slot, "set_image ignored: slot not interactable");
            return false;
        }
        let item = &mut self.items[slot - 1];
        if position >= item.image_count as usize {
            debug!(
                slot,
                position,
                image_count = item.image_count,
                "set_image ignored: position out of range"
            );
            return false;
        }
        if item.images.len() <= position {
            item.images.resize(position + 1, None);
        }
        item.images[position] = Some(image);
        true
    }

    /// Empty one image position of an active slot.
    pub fn clear_image(&mut self, slot: usize, position: usize) -> bool {
        if !self.is_interactable(slot) {
            return false;
        }
        let item = &mut self.items[slot - 1];
        match item.images.get_mut(position) {
            Some(entry) => {
                *entry = None;
                true
            }
            None => false,
        }
    }

    /// Change how many image positions an active slot renders. Only the
    /// counts in [`ALLOWED_IMAGE_COUNTS`] are accepted; shrinking truncates
    /// the image sequence.
    pub fn set_image_count(&mut self, slot: usize, count: u8) -> bool {
        if !self.is_interactable(slot) {
            debug!(slot, "set_image_count ignored: slot not interactable");
            return false;
        }
        if !ALLOWED_IMAGE_COUNTS.contains(&count) {
            debug!(slot, count, "set_image_count ignored: count not allowed");
            return false;
        }
        let item = &mut self.items[slot - 1];
        item.image_count = count;
        item.images.truncate(count as usize);
        true
    }

    /// Clear one slot's images and caption (the per-cell "delete" gesture).
    /// Image count is untouched. Notifies the content-reset hook.
    pub fn delete_content(&mut self, slot: usize) -> bool {
        if !self.is_interactable(slot) {
            debug!(slot, "delete_content ignored: slot not interactable");
            return false;
        }
        self.clear_slot_content(slot);
        debug!(slot, "slot content deleted");
        true
    }

    /// Explicit flush signal replacing the host's former broadcast event: any
    /// in-flight drag session is cancelled so committed state is quiescent,
    /// then collaborators are told to commit their edit buffers.
    pub fn commit_pending_edits(&mut self) {
        self.drag_cancel();
        self.hooks.flush_pending_edits();
        debug!("pending edits committed");
    }

    // -- primitives shared by the controllers --

    /// Clear a slot's content and notify the content-reset hook.
    pub(crate) fn clear_slot_content(&mut self, slot: usize) {
        self.items[slot - 1].clear_content();
        self.hooks.reset_content_for(slot);
    }

    pub(crate) fn set_image_count_raw(&mut self, slot: usize, count: u8) {
        let item = &mut self.items[slot - 1];
        item.image_count = count;
        item.images.truncate(count as usize);
    }

    /// Exchange the items bound to two slots.
    pub(crate) fn swap_items(&mut self, a: usize, b: usize) {
        self.items.swap(a - 1, b - 1);
    }

    /// Reorder items so slot `k` holds the item whose origin is `order[k-1]`.
    /// Origins absent from `order` keep their relative default order at the
    /// tail; origins listed but unknown are skipped.
    pub(crate) fn apply_order(&mut self, order: &[usize]) {
        let mut reordered = Vec::with_capacity(self.items.len());
        for &origin in order {
            if let Some(pos) = self.items.iter().position(|it| it.origin == origin) {
                reordered.push(self.items.remove(pos));
            }
        }
        reordered.append(&mut self.items);
        self.items = reordered;
    }

    /// Items in slot order; used by the snapshot exporter.
    pub(crate) fn items(&self) -> &[Item] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }

    /// Invariant audit, run after mutations in debug builds.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_check_invariants(&self) {
        use crate::pair;

        for &head in &self.expanded {
            debug_assert_eq!(head, pair::pair_first(head), "expanded slot must be pair-first");
            debug_assert!(
                self.removed.contains(&pair::pair_second(head)),
                "expanded head {head} must have its partner removed"
            );
        }
        for &gone in &self.removed {
            let first = pair::pair_first(gone);
            debug_assert_eq!(gone, pair::pair_second(first), "removed slot must be pair-second");
            debug_assert!(
                self.expanded.contains(&first),
                "removed slot {gone} must have an expanded head"
            );
        }
        debug_assert!(self.expanded.is_disjoint(&self.removed));
        debug_assert!(self.expanded.is_disjoint(&self.hidden));
        debug_assert!(self.removed.is_disjoint(&self.hidden));
        if let Some(sel) = self.selection {
            debug_assert!(
                self.is_interactable(sel),
                "selection {sel} must not be hidden or removed"
            );
        }
    }

    #[cfg(not(debug_assertions))]
    pub(crate) fn debug_check_invariants(&self) {}
}
