// src/snapshot.rs
// Layout persistence record. The engine owns no transport or format
// versioning; it only exports this record on demand and reconstructs state
// from one at startup, sanitizing anything a stale or hand-edited record
// could contain. Hydration never fails: offending entries are dropped and
// the remainder rebuilt.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::pair;
use crate::state_mod::{GridEngine, Item, ALLOWED_IMAGE_COUNTS};

/// Persisted layout shape, camelCase on the wire to match the host's
/// existing records. Slot content (images, captions) is persisted by the
/// content collaborators, not by this engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutRecord {
    /// Heads of merged pairs.
    pub expanded: Vec<usize>,
    /// Slots absorbed by a merge.
    pub removed: Vec<usize>,
    /// Suppressed-but-intact slots.
    pub hidden: Vec<usize>,
    /// Image count per slot position.
    pub image_count_by_index: HashMap<usize, u8>,
    /// Item origins in current slot order; encodes the drag permutation.
    pub order_indices: Vec<usize>,
    /// Opaque to the engine; written on export, ignored on hydration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl GridEngine {
    /// Export the current layout for persistence.
    pub fn snapshot(&self) -> LayoutRecord {
        let mut expanded: Vec<usize> = self.expanded.iter().copied().collect();
        let mut removed: Vec<usize> = self.removed.iter().copied().collect();
        let mut hidden: Vec<usize> = self.hidden.iter().copied().collect();
        expanded.sort_unstable();
        removed.sort_unstable();
        hidden.sort_unstable();

        LayoutRecord {
            expanded,
            removed,
            hidden,
            image_count_by_index: (1..=self.slot_count())
                .map(|slot| (slot, self.items()[slot - 1].image_count))
                .collect(),
            order_indices: self.items().iter().map(|item| item.origin).collect(),
            metadata: Some(serde_json::json!({
                "savedAt": Utc::now().to_rfc3339(),
                "engineVersion": env!("CARGO_PKG_VERSION"),
            })),
        }
    }

    /// Rebuild layout state from a persisted record, sanitizing it first.
    ///
    /// Sanitization rules:
    /// - indices outside `1..=slot_count` and duplicates are dropped;
    /// - a merge survives only as a complete pair (head listed in
    ///   `expanded`, its partner in `removed`), stragglers are dropped;
    /// - hidden entries overlapping a surviving merge lose to it
    ///   (`removed > hidden` precedence);
    /// - the order permutation keeps its first valid occurrence of each
    ///   origin and appends missing origins in default order;
    /// - image counts not in [`ALLOWED_IMAGE_COUNTS`] are dropped.
    ///
    /// Selection and any drag session are cleared; items are re-created
    /// empty (content is re-populated by the content collaborators).
    pub fn hydrate(&mut self, record: &LayoutRecord) {
        let n = self.slot_count();

        // Surviving merges: head must be pair-first, partner present.
        let mut expanded = Vec::new();
        let mut removed = Vec::new();
        for &head in &record.expanded {
            if !self.in_range(head) || head != pair::pair_first(head) {
                warn!(head, "hydrate: dropped invalid expanded entry");
                continue;
            }
            let partner = pair::pair_second(head);
            if !record.removed.contains(&partner) || !self.in_range(partner) {
                warn!(head, partner, "hydrate: dropped expanded head without removed partner");
                continue;
            }
            if !expanded.contains(&head) {
                expanded.push(head);
                removed.push(partner);
            }
        }
        for &gone in &record.removed {
            if !removed.contains(&gone) {
                warn!(gone, "hydrate: dropped removed entry without expanded head");
            }
        }

        let mut hidden = Vec::new();
        for &slot in &record.hidden {
            if !self.in_range(slot) {
                warn!(slot, "hydrate: dropped out-of-range hidden entry");
                continue;
            }
            if expanded.contains(&slot) || removed.contains(&slot) {
                warn!(slot, "hydrate: hidden entry overlaps a merge, merge wins");
                continue;
            }
            if !hidden.contains(&slot) {
                hidden.push(slot);
            }
        }

        // Rebuild the permutation: first valid occurrence of each origin,
        // missing origins appended in default order.
        let mut order = Vec::with_capacity(n);
        for &origin in &record.order_indices {
            if (1..=n).contains(&origin) && !order.contains(&origin) {
                order.push(origin);
            } else {
                warn!(origin, "hydrate: dropped invalid order entry");
            }
        }
        for origin in 1..=n {
            if !order.contains(&origin) {
                order.push(origin);
            }
        }

        self.expanded = expanded.into_iter().collect();
        self.removed = removed.into_iter().collect();
        self.hidden = hidden.into_iter().collect();
        self.selection = None;
        self.drag = None;
        *self.items_mut() = (1..=n).map(Item::empty).collect();
        self.apply_order(&order);

        for (&slot, &count) in &record.image_count_by_index {
            if !self.in_range(slot) || !ALLOWED_IMAGE_COUNTS.contains(&count) {
                warn!(slot, count, "hydrate: dropped invalid image count");
                continue;
            }
            self.set_image_count_raw(slot, count);
        }

        self.debug_check_invariants();
    }
}
