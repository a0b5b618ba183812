//! DOM wiring of the editor screen.
//!
//! The screen itself is plain server-served HTML; this module seeds a
//! [`draft::Draft`] from the post snapshot, funnels every input back into
//! it, and drives the two persistence paths: the debounced autosave and the
//! Save button.

use std::cell::RefCell;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Event, File, FileReader, HtmlImageElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, Response, Window,
};

pub mod autosave;
pub mod draft;
pub mod gateway;
pub mod state;

use self::autosave::autosave_debounce;
use self::draft::{split_data_uri, Draft, Snapshot};
use self::gateway::SaveJob;
use self::state::{SaveOrigin, SaveState};
use prosa_api::posts::PostSnapshot;

pub(crate) struct Editor {
    pub draft: Draft,
    /// Projection of the draft at the last successful save.
    pub baseline: Snapshot,
    pub save_state: SaveState,
    pub autosave_timeout: Option<i32>,
    /// Raw handle of the selected cover file; swapped in and out together
    /// with `ImageState::Attachment`.
    pub selected_file: Option<File>,
}

thread_local! {
    static EDITOR: RefCell<Option<Editor>> = RefCell::new(None);
}

pub(crate) fn with_editor<T>(f: impl FnOnce(&mut Editor) -> T) -> Option<T> {
    EDITOR.with(|cell| cell.borrow_mut().as_mut().map(f))
}

pub(crate) fn window() -> Window {
    web_sys::window().expect("no window available")
}

fn document() -> Document {
    window().document().expect("no document available")
}

fn get_elt_value(id: &str) -> String {
    document()
        .get_element_by_id(id)
        .map(|elt| {
            elt.dyn_ref::<HtmlInputElement>()
                .map(|input| input.value())
                .or_else(|| {
                    elt.dyn_ref::<HtmlTextAreaElement>()
                        .map(|textarea| textarea.value())
                })
                .or_else(|| {
                    elt.dyn_ref::<HtmlSelectElement>()
                        .map(|select| select.value())
                })
                .unwrap_or_default()
        })
        .unwrap_or_default()
}

fn set_value(id: &str, value: &str) {
    if let Some(elt) = document().get_element_by_id(id) {
        elt.dyn_ref::<HtmlInputElement>()
            .map(|input| input.set_value(value))
            .or_else(|| {
                elt.dyn_ref::<HtmlTextAreaElement>()
                    .map(|textarea| textarea.set_value(value))
            })
            .or_else(|| {
                elt.dyn_ref::<HtmlSelectElement>()
                    .map(|select| select.set_value(value))
            })
            .unwrap_or(());
    }
}

pub fn init() -> Result<(), JsValue> {
    let path = window().location().pathname()?;
    match editor_target(&path) {
        Some(Some(id)) => spawn_local(load_and_start(id)),
        Some(None) => start_editor(Draft::new()),
        None => {}
    }
    Ok(())
}

/// What the current URL asks of the editor: `None` when this is not an
/// editor page, `Some(None)` for a new article, `Some(Some(id))` to edit an
/// existing one.
pub fn editor_target(path: &str) -> Option<Option<i32>> {
    if path == "/admin/posts/new" {
        return Some(None);
    }
    let rest = path.strip_prefix("/admin/posts/")?;
    let id = rest.strip_suffix("/edit")?.parse().ok()?;
    Some(Some(id))
}

async fn load_and_start(id: i32) {
    match fetch_snapshot(id).await {
        Ok(snapshot) => {
            let draft = Draft::from_snapshot(&snapshot);
            fill_fields(&draft);
            start_editor(draft);
        }
        Err(err) => {
            web_sys::console::error_2(&JsValue::from_str("couldn't load the post"), &err)
        }
    }
}

async fn fetch_snapshot(id: i32) -> Result<PostSnapshot, JsValue> {
    let response: Response =
        JsFuture::from(window().fetch_with_str(&format!("/api/posts/{}", id)))
            .await?
            .dyn_into()?;
    let text = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .unwrap_or_default();
    serde_json::from_str(&text).map_err(|_| JsValue::from_str("unexpected snapshot shape"))
}

fn fill_fields(draft: &Draft) {
    set_value("name", &draft.name);
    set_value("description", &draft.description);
    set_value("content", &draft.content);
    set_value(
        "author",
        &draft
            .author_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
    );
    if let Ok(boxes) = document().query_selector_all("input.tag-option") {
        for i in 0..boxes.length() {
            if let Some(input) = boxes.get(i).and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
            {
                input.set_checked(draft.tags.contains(&input.value()));
            }
        }
    }
    show_preview(draft.image.display());
}

fn start_editor(draft: Draft) {
    EDITOR.with(|cell| {
        *cell.borrow_mut() = Some(Editor {
            baseline: draft.snapshot(),
            draft,
            save_state: SaveState::Idle,
            autosave_timeout: None,
            selected_file: None,
        });
    });

    for id in &["name", "description", "content", "author"] {
        listen(id, "input", || {
            refresh_draft();
            autosave_debounce();
        });
    }
    if let Ok(boxes) = document().query_selector_all("input.tag-option") {
        for i in 0..boxes.length() {
            if let Some(input) = boxes.get(i) {
                let closure = Closure::wrap(Box::new(move |_: Event| {
                    refresh_draft();
                    autosave_debounce();
                }) as Box<dyn FnMut(Event)>);
                input
                    .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
                    .ok();
                closure.forget();
            }
        }
    }
    listen("cover", "change", file_selected);
    listen("clear-cover", "click", || {
        with_editor(|ed| {
            ed.draft.clear_image();
            ed.selected_file = None;
        });
        set_value("cover", "");
        show_preview(None);
        autosave_debounce();
    });
    listen("save", "click", manual_save);

    // navigating away must not leave a timer behind; an in-flight request is
    // simply abandoned and its result discarded with the page
    let closure = Closure::wrap(Box::new(move |_: Event| autosave::cancel()) as Box<dyn FnMut(Event)>);
    window()
        .add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref())
        .ok();
    closure.forget();
}

fn listen(id: &str, event: &str, handler: impl Fn() + 'static) {
    if let Some(elt) = document().get_element_by_id(id) {
        let closure = Closure::wrap(Box::new(move |_: Event| handler()) as Box<dyn FnMut(Event)>);
        elt.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }
}

fn selected_tags() -> Vec<String> {
    let mut tags = Vec::new();
    if let Ok(boxes) = document().query_selector_all("input.tag-option:checked") {
        for i in 0..boxes.length() {
            if let Some(input) = boxes.get(i).and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
            {
                tags.push(input.value());
            }
        }
    }
    tags
}

fn refresh_draft() {
    let tags = selected_tags();
    with_editor(|ed| {
        ed.draft.name = get_elt_value("name");
        ed.draft.description = get_elt_value("description");
        ed.draft.content = get_elt_value("content");
        ed.draft.author_id = get_elt_value("author").parse().ok();
        ed.draft.tags = tags;
    });
}

/// Reads the picked file into its three derived artifacts (base64 payload,
/// MIME type, preview URI) and installs them as one group. Picking nothing
/// is a no-op, not an error.
fn file_selected() {
    let input = match document()
        .get_element_by_id("cover")
        .and_then(|elt| elt.dyn_into::<HtmlInputElement>().ok())
    {
        Some(input) => input,
        None => return,
    };
    let file = match input.files().and_then(|files| files.get(0)) {
        Some(file) => file,
        None => return,
    };
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(_) => return,
    };

    let reader_in_closure = reader.clone();
    let file_in_closure = file.clone();
    let onloadend = Closure::once_into_js(move || {
        let data_uri = match reader_in_closure
            .result()
            .ok()
            .and_then(|value| value.as_string())
        {
            Some(data_uri) => data_uri,
            None => return,
        };
        if let Some((mime_from_uri, base64)) = split_data_uri(&data_uri) {
            let mime = if file_in_closure.type_().is_empty() {
                mime_from_uri
            } else {
                file_in_closure.type_()
            };
            with_editor(|ed| {
                ed.draft.select_file(base64, mime, data_uri.clone());
                ed.selected_file = Some(file_in_closure.clone());
            });
            show_preview(Some(data_uri));
            autosave_debounce();
        }
    });
    reader.set_onloadend(Some(onloadend.unchecked_ref()));
    reader.read_as_data_url(&file).ok();
}

fn show_preview(src: Option<String>) {
    if let Some(img) = document()
        .get_element_by_id("cover-preview")
        .and_then(|elt| elt.dyn_into::<HtmlImageElement>().ok())
    {
        match src {
            Some(src) => {
                img.set_src(&src);
                img.remove_attribute("hidden").ok();
            }
            None => {
                img.set_src("");
                img.set_attribute("hidden", "hidden").ok();
            }
        }
    }
}

fn show_error(message: Option<&str>) {
    if let Some(elt) = document().get_element_by_id("save-error") {
        match message {
            Some(message) => {
                elt.set_text_content(Some(message));
                elt.remove_attribute("hidden").ok();
            }
            None => {
                elt.set_text_content(None);
                elt.set_attribute("hidden", "hidden").ok();
            }
        }
    }
}

/// The Save button. Unlike the autosave path it surfaces failures, and on
/// success it navigates to the published article.
fn manual_save() {
    refresh_draft();
    let job = with_editor(|ed| {
        if ed.draft.has_blocking_error() {
            return Err("The title is required");
        }
        if !ed.save_state.request(SaveOrigin::Manual) {
            // another save is still in flight; the machine keeps the two
            // paths from racing, the user can click again in a moment
            return Err("A save is already running, try again in a moment");
        }
        Ok(SaveJob::new(&ed.draft, ed.selected_file.clone()))
    });
    let job = match job {
        Some(Ok(job)) => {
            show_error(None);
            job
        }
        Some(Err(message)) => {
            show_error(Some(message));
            return;
        }
        None => return,
    };

    spawn_local(async move {
        match gateway::persist(&job).await {
            Ok(response) => {
                autosave::cancel();
                window()
                    .location()
                    .set_href(&format!("/posts/{}", response.post.id))
                    .ok();
            }
            Err(err) => {
                with_editor(|ed| ed.save_state.finish());
                let message = err
                    .as_string()
                    .unwrap_or_else(|| "Save failed".to_owned());
                show_error(Some(&message));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::editor_target;

    #[test]
    fn editor_target_parses_the_admin_urls() {
        assert_eq!(editor_target("/admin/posts/new"), Some(None));
        assert_eq!(editor_target("/admin/posts/7/edit"), Some(Some(7)));
        assert_eq!(editor_target("/admin/posts/7"), None);
        assert_eq!(editor_target("/admin/posts/abc/edit"), None);
        assert_eq!(editor_target("/posts/7"), None);
        assert_eq!(editor_target("/"), None);
    }
}
