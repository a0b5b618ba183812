#![recursion_limit = "128"]

use wasm_bindgen::prelude::*;

pub mod editor;

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    editor::init()
}
