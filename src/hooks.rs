// src/hooks.rs
// Collaborator seam. The engine never renders, uploads, or persists anything
// itself; it notifies the host through this trait and asks it to gate
// destructive actions behind a confirmation dialog.

use tracing::debug;

/// Host callbacks consumed by the engine.
///
/// All methods have conservative defaults so tests and headless hosts can use
/// [`NullHooks`] (or override just one method) without ceremony.
pub trait EngineHooks {
    /// Ask the user to confirm a destructive action. `true` means proceed.
    ///
    /// The default approves everything, which matches a host that has its own
    /// gating upstream of the dispatch layer.
    fn request_confirmation(&self, message: &str) -> bool {
        debug!(message, "confirmation auto-approved (no dialog registered)");
        true
    }

    /// A slot's content (images, caption) was cleared. Hosts that cache
    /// uploaded image URLs or caption drafts must drop them in lockstep.
    fn reset_content_for(&self, slot: usize) {
        let _ = slot;
    }

    /// The host asked the engine to flush pending edits before persisting.
    /// Collaborators holding uncommitted edit buffers should commit them now.
    fn flush_pending_edits(&self) {}
}

/// No-op hook implementation: approves confirmations, ignores notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHooks;

impl EngineHooks for NullHooks {}
