// src/drag_reorder.rs
// Drag/reorder controller. One session at a time: begin -> hover* ->
// commit | cancel. Hover is purely advisory (drives highlighting); only
// commit touches committed grid state, so cancel is always a true no-op.

use tracing::{debug, info};
use uuid::Uuid;

use crate::pair;
use crate::state_mod::GridEngine;

/// Runtime-only state of one drag gesture. Never persisted.
#[derive(Debug, Clone)]
pub(crate) struct DragSession {
    pub(crate) id: Uuid,
    pub(crate) source: usize,
    pub(crate) hover: Option<usize>,
}

impl GridEngine {
    /// Start a drag from `source`. Fails silently (no session) when the slot
    /// is hidden or merged away; a stale earlier session is discarded.
    pub fn drag_begin(&mut self, source: usize) -> bool {
        if self.drag.is_some() {
            debug!("drag_begin superseding an unfinished session");
            self.drag = None;
        }
        if !self.is_interactable(source) {
            debug!(source, "drag_begin ignored: slot not interactable");
            return false;
        }
        let session = DragSession {
            id: Uuid::new_v4(),
            source,
            hover: None,
        };
        debug!(session = %session.id, source, "drag session started");
        self.drag = Some(session);
        true
    }

    /// Advisory hover update: records whether `candidate` would accept the
    /// drop so the presentation layer can highlight it. Commits nothing.
    pub fn drag_hover(&mut self, candidate: usize) -> bool {
        let source = match &self.drag {
            Some(session) => session.source,
            None => return false,
        };
        let would_accept = self.would_accept_drop(source, candidate);
        if let Some(session) = &mut self.drag {
            session.hover = would_accept.then_some(candidate);
        }
        would_accept
    }

    /// End the session, dropping the source item onto `target`. Returns
    /// whether committed state changed.
    pub fn drag_commit(&mut self, target: usize) -> bool {
        let session = match self.drag.take() {
            Some(session) => session,
            None => {
                debug!(target, "drag_commit ignored: no session");
                return false;
            }
        };
        let source = session.source;
        if target == source || !self.is_interactable(target) || !self.is_interactable(source) {
            debug!(session = %session.id, source, target, "drag ended without effect");
            return false;
        }

        let active_big = self.expanded.contains(&source);
        let over_big = self.expanded.contains(&target);
        let applied = match (active_big, over_big) {
            // A small item may never displace a merged head.
            (false, true) => {
                debug!(source, target, "drop rejected: small item over merged head");
                false
            }
            (true, false) => self.transfer_big_to_small(source, target),
            // Big-over-big and small-over-small both plain-swap content.
            _ => {
                self.swap_items(source, target);
                match self.selection {
                    Some(sel) if sel == source => self.selection = Some(target),
                    Some(sel) if sel == target => self.selection = Some(source),
                    _ => {}
                }
                info!(session = %session.id, source, target, "items swapped");
                true
            }
        };

        self.debug_check_invariants();
        applied
    }

    /// Abort the session. Committed state is untouched under any
    /// circumstance (drop outside a target, Escape, pointer lost).
    pub fn drag_cancel(&mut self) {
        if let Some(session) = self.drag.take() {
            debug!(session = %session.id, source = session.source, "drag cancelled");
        }
    }

    /// Whether a drag session is in flight.
    pub fn drag_in_progress(&self) -> bool {
        self.drag.is_some()
    }

    /// Source slot of the in-flight session, if any.
    pub fn drag_source(&self) -> Option<usize> {
        self.drag.as_ref().map(|s| s.source)
    }

    /// Last hovered slot that would accept the drop, for highlighting.
    pub fn drag_hover_target(&self) -> Option<usize> {
        self.drag.as_ref().and_then(|s| s.hover)
    }

    fn would_accept_drop(&self, source: usize, target: usize) -> bool {
        if target == source || !self.is_interactable(target) || !self.is_interactable(source) {
            return false;
        }
        if self.expanded.contains(&target) && !self.expanded.contains(&source) {
            return false;
        }
        if self.expanded.contains(&source) && !self.expanded.contains(&target) {
            let target_first = pair::pair_first(target);
            let target_second = pair::pair_second(target_first);
            return self.is_interactable(target_first) && self.is_interactable(target_second);
        }
        true
    }

    /// Move a merged head onto a small slot's pair: the head item lands in
    /// the pair's first slot, merge state follows it, and whatever occupied
    /// that slot travels back to the vacated source.
    fn transfer_big_to_small(&mut self, source: usize, target: usize) -> bool {
        let target_first = pair::pair_first(target);
        let target_second = pair::pair_second(target_first);
        // Both target-pair slots must be plain active cells, or the merge
        // state cannot be retargeted without breaking set disjointness.
        if !self.is_interactable(target_first) || !self.is_interactable(target_second) {
            debug!(
                source,
                target, "drop rejected: target pair partially hidden or merged"
            );
            return false;
        }

        let source_second = pair::pair_second(source);
        self.swap_items(source, target_first);
        self.expanded.remove(&source);
        self.expanded.insert(target_first);
        self.removed.remove(&source_second);
        self.removed.insert(target_second);

        match self.selection {
            Some(sel) if sel == source => self.selection = Some(target_first),
            Some(sel) if sel == target_first => self.selection = Some(source),
            // The slot absorbed by the relocated merge can no longer hold
            // the selection.
            Some(sel) if sel == target_second => self.selection = None,
            _ => {}
        }

        info!(
            source,
            target_first, "merged head transferred, merge state follows the item"
        );
        true
    }
}
