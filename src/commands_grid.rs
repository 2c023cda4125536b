// src/commands_grid.rs
// JSON command dispatch over the engine. Hosts drive every gesture through
// dispatch_action(action_type, payload); destructive actions are gated here
// behind the confirmation hook so the controllers themselves stay ungated.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::snapshot::LayoutRecord;
use crate::state_mod::GridEngine;

/// Errors surfaced to the host by the dispatch layer. Engine-internal
/// precondition failures are not errors (they report `applied: false`);
/// only malformed host input lands here.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Unknown action type: {action_type}")]
    UnknownAction { action_type: String },

    #[error("Invalid payload for {action_type}: {message}")]
    InvalidPayload {
        action_type: String,
        message: String,
    },
}

#[derive(Deserialize)]
struct IndexPayload {
    index: usize,
}

#[derive(Deserialize)]
struct PairPayload {
    first: usize,
    second: usize,
}

#[derive(Deserialize)]
struct CaptionPayload {
    index: usize,
    caption: String,
}

#[derive(Deserialize)]
struct ImageSetPayload {
    index: usize,
    position: usize,
    image: String,
}

#[derive(Deserialize)]
struct ImageClearPayload {
    index: usize,
    position: usize,
}

#[derive(Deserialize)]
struct CountPayload {
    index: usize,
    count: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetPayload {
    visible_count: usize,
}

#[derive(Deserialize)]
struct HydratePayload {
    record: LayoutRecord,
}

fn parse<T: DeserializeOwned>(action_type: &str, payload: Value) -> Result<T, EngineError> {
    serde_json::from_value(payload).map_err(|e| EngineError::InvalidPayload {
        action_type: action_type.to_string(),
        message: e.to_string(),
    })
}

fn applied(applied: bool) -> Value {
    json!({ "success": true, "applied": applied })
}

/// Main dispatch entry point.
///
/// Returns `{"success": true, "applied": bool}` for mutating actions (plus
/// the record for `layout.snapshot`). A declined confirmation reports
/// `applied: false` with the engine byte-identical to before the request.
pub fn dispatch_action(
    engine: &mut GridEngine,
    action_type: &str,
    payload: Value,
) -> Result<Value, EngineError> {
    let operation_id = Uuid::new_v4();
    debug!(%operation_id, action_type, "dispatching action");

    match action_type {
        "cell.merge" => {
            let p: PairPayload = parse(action_type, payload)?;
            let ok = confirm(
                engine,
                &format!(
                    "Merging cells {} and {} clears both cells' content. Continue?",
                    p.first, p.second
                ),
            ) && engine.expand(p.first, p.second);
            Ok(applied(ok))
        }

        "cell.split" => {
            let p: PairPayload = parse(action_type, payload)?;
            let ok = confirm(
                engine,
                &format!(
                    "Splitting cell {} clears both cells' content. Continue?",
                    p.first
                ),
            ) && engine.split(p.first, p.second);
            Ok(applied(ok))
        }

        "cell.hide" => {
            let p: IndexPayload = parse(action_type, payload)?;
            Ok(applied(engine.hide(p.index)))
        }

        "cell.select" => {
            let p: IndexPayload = parse(action_type, payload)?;
            Ok(applied(engine.select(p.index)))
        }

        "cell.deselect" => {
            engine.deselect();
            Ok(applied(true))
        }

        "cell.delete" => {
            let p: IndexPayload = parse(action_type, payload)?;
            let ok = confirm(
                engine,
                &format!("Delete the content of cell {}?", p.index),
            ) && engine.delete_content(p.index);
            Ok(applied(ok))
        }

        "cell.caption.set" => {
            let p: CaptionPayload = parse(action_type, payload)?;
            Ok(applied(engine.set_caption(p.index, &p.caption)))
        }

        "cell.image.set" => {
            let p: ImageSetPayload = parse(action_type, payload)?;
            Ok(applied(engine.set_image(p.index, p.position, p.image)))
        }

        "cell.image.clear" => {
            let p: ImageClearPayload = parse(action_type, payload)?;
            Ok(applied(engine.clear_image(p.index, p.position)))
        }

        "cell.count.set" => {
            let p: CountPayload = parse(action_type, payload)?;
            Ok(applied(engine.set_image_count(p.index, p.count)))
        }

        "drag.begin" => {
            let p: IndexPayload = parse(action_type, payload)?;
            Ok(applied(engine.drag_begin(p.index)))
        }

        "drag.hover" => {
            let p: IndexPayload = parse(action_type, payload)?;
            let accepts = engine.drag_hover(p.index);
            Ok(json!({ "success": true, "applied": false, "wouldAccept": accepts }))
        }

        "drag.commit" => {
            let p: IndexPayload = parse(action_type, payload)?;
            Ok(applied(engine.drag_commit(p.index)))
        }

        "drag.cancel" => {
            engine.drag_cancel();
            Ok(applied(false))
        }

        "layout.reset" => {
            let p: ResetPayload = parse(action_type, payload)?;
            let ok = confirm(
                engine,
                "Resetting the page discards every cell's content. Continue?",
            );
            if ok {
                engine.reset_to_baseline(p.visible_count);
            }
            Ok(applied(ok))
        }

        "layout.snapshot" => {
            let record = engine.snapshot();
            let value = serde_json::to_value(&record).map_err(|e| EngineError::InvalidPayload {
                action_type: action_type.to_string(),
                message: e.to_string(),
            })?;
            Ok(json!({ "success": true, "record": value }))
        }

        "layout.hydrate" => {
            let p: HydratePayload = parse(action_type, payload)?;
            engine.hydrate(&p.record);
            Ok(applied(true))
        }

        "edits.commit" => {
            engine.commit_pending_edits();
            Ok(applied(true))
        }

        _ => {
            warn!(action_type, "unhandled action type");
            Err(EngineError::UnknownAction {
                action_type: action_type.to_string(),
            })
        }
    }
}

fn confirm(engine: &GridEngine, message: &str) -> bool {
    let ok = engine.hooks.request_confirmation(message);
    if !ok {
        debug!(message, "destructive action declined by user");
    }
    ok
}
