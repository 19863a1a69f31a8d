//! Scene Guide Web App (Leptos + WASM)

mod app;
mod components;
mod dom;
mod loader;
mod storage;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    // 設定を持つルート要素があればその中に描画
    let root = gloo::utils::document()
        .get_element_by_id(dom::ROOT_ID)
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
    match root {
        Some(root) => leptos::mount::mount_to(root, app::App).forget(),
        None => leptos::mount::mount_to_body(app::App),
    }
}
