//! Grid composition and drag-reorder engine for photo-report pages.
//!
//! The engine owns the arrangement of a fixed-size grid of content cells:
//! which cells are merged into double-width cells, hidden, or selected, and
//! how per-cell content travels when cells are dragged around. Rendering,
//! image processing, upload, and persistence transport are host concerns;
//! they talk to the engine through [`hooks::EngineHooks`] and the JSON
//! dispatch surface in [`commands_grid`].

pub mod commands_grid;
pub mod drag_reorder;
pub mod hooks;
pub mod merge_split;
pub mod pair;
pub mod reset;
pub mod snapshot;
pub mod state_mod;
pub mod visibility;

pub use commands_grid::{dispatch_action, EngineError};
pub use hooks::{EngineHooks, NullHooks};
pub use snapshot::LayoutRecord;
pub use state_mod::{GridEngine, Item, SlotStatus, ALLOWED_IMAGE_COUNTS, MAX_SLOTS};
