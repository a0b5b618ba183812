//! Background persistence: a single debounced timer that saves the draft
//! after five seconds of inactivity, without ever colliding with a manual
//! save.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;

use crate::editor::draft::{Draft, ImageState, Snapshot};
use crate::editor::gateway::{self, SaveJob};
use crate::editor::state::{SaveOrigin, SaveState};
use crate::editor::{with_editor, window, Editor};

pub const AUTOSAVE_DEBOUNCE_TIME: i32 = 5000;

/// Whether a fired timer actually persists anything: only for drafts that
/// already exist server-side, that changed since the last successful save,
/// that have a title, and only while no other save is running.
pub fn should_autosave(draft: &Draft, baseline: &Snapshot, state: SaveState) -> bool {
    draft.id.is_some()
        && state.is_idle()
        && !draft.has_blocking_error()
        && draft.is_dirty(baseline)
}

/// Re-arms the timer. Called on every draft mutation, so a continuously
/// typing user never triggers a save until five seconds of quiet.
pub fn autosave_debounce() {
    with_editor(|ed| {
        if let Some(handle) = ed.autosave_timeout.take() {
            window().clear_timeout_with_handle(handle);
        }
        let tick = wasm_bindgen::closure::Closure::once_into_js(tick);
        ed.autosave_timeout = window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                tick.unchecked_ref(),
                AUTOSAVE_DEBOUNCE_TIME,
            )
            .ok();
    });
}

/// Clears any pending timer; the editor is being torn down.
pub fn cancel() {
    with_editor(|ed| {
        if let Some(handle) = ed.autosave_timeout.take() {
            window().clear_timeout_with_handle(handle);
        }
    });
}

fn tick() {
    let job = with_editor(|ed| {
        ed.autosave_timeout = None;
        if !should_autosave(&ed.draft, &ed.baseline, ed.save_state) {
            return None;
        }
        if !ed.save_state.request(SaveOrigin::Auto) {
            return None;
        }
        Some(SaveJob::new(&ed.draft, ed.selected_file.clone()))
    })
    .and_then(|job| job);

    let job = match job {
        Some(job) => job,
        None => return,
    };
    spawn_local(async move {
        match gateway::persist(&job).await {
            Ok(_) => {
                with_editor(|ed| {
                    ed.save_state.finish();
                    reconcile(ed, &job);
                });
            }
            Err(err) => {
                // never interrupt the writer: log, keep the dirty state, and
                // let the next debounce cycle retry
                with_editor(|ed| ed.save_state.finish());
                web_sys::console::warn_2(&JsValue::from_str("autosave failed"), &err);
            }
        }
    });
}

/// Moves the dirty baseline to what was just persisted. If the cover that
/// was uploaded is still the selected one, it now lives server-side: the
/// attachment collapses to its inline form and the file handle is dropped.
fn reconcile(ed: &mut Editor, job: &SaveJob) {
    if ed.draft.image == job.draft.image {
        if let ImageState::Attachment { base64, mime, .. } = job.draft.image.clone() {
            ed.draft.image = ImageState::Inline { base64, mime };
            ed.selected_file = None;
        }
    }
    let mut baseline = job.snapshot.clone();
    baseline.attachment_pending = false;
    ed.baseline = baseline;
}
