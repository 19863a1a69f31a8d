//! ブラウザAPIの薄いラッパー
//!
//! 失敗は呼び出し側で握りつぶせるよう `Result<_, String>` で返す。

use gloo::utils::{document, window};
use scene_guide_common::loader::scene_id_from_search;
use scene_guide_common::PageConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// ページ設定を持つルート要素
pub const ROOT_ID: &str = "scene-guide";

/// `#scene-guide` の data-* 属性からページ設定を読む
pub fn page_config() -> PageConfig {
    let root = document().get_element_by_id(ROOT_ID);
    if root.is_none() {
        log::debug!("#{} not found, using empty page config", ROOT_ID);
    }
    PageConfig::from_attributes(|name| {
        root.as_ref()
            .and_then(|el| el.get_attribute(name))
            .filter(|v| !v.trim().is_empty())
    })
}

/// `?scene=` からシーンID
pub fn scene_id() -> String {
    let search = window().location().search().unwrap_or_default();
    scene_id_from_search(&search)
}

pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

pub fn set_document_title(title: &str) {
    document().set_title(title);
}

pub fn print() {
    if let Err(e) = window().print() {
        log::debug!("print failed: {:?}", e);
    }
}

pub fn alert(message: &str) {
    gloo::dialogs::alert(message);
}

/// `navigator.clipboard.writeText`
pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let navigator = window().navigator();
    let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .map_err(|e| format!("clipboard: {:?}", e))?;
    if clipboard.is_undefined() {
        return Err("clipboard unavailable".to_string());
    }
    let write_text: js_sys::Function = js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .map_err(|e| format!("writeText: {:?}", e))?
        .dyn_into()
        .map_err(|_| "writeText is not a function".to_string())?;
    let promise: js_sys::Promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(|e| format!("writeText: {:?}", e))?
        .dyn_into()
        .map_err(|_| "writeText did not return a promise".to_string())?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| format!("writeText rejected: {:?}", e))
}

/// フォーカスが文字入力中か（input / textarea / contenteditable）
pub fn focus_in_text_input() -> bool {
    let Some(active) = document().active_element() else {
        return false;
    };
    let tag = active.tag_name().to_lowercase();
    if tag == "input" || tag == "textarea" {
        return true;
    }
    active
        .dyn_ref::<web_sys::HtmlElement>()
        .map(|el| el.is_content_editable())
        .unwrap_or(false)
}

pub fn document_hidden() -> bool {
    document().hidden()
}

/// イベントの発生元が `#id` の要素（またはその子孫）か
pub fn event_within(event: &web_sys::Event, id: &str) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.closest(&format!("#{}", id)).ok().flatten())
        .is_some()
}


#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_page_config_reads_root_attributes() {
        let root = document().create_element("div").unwrap();
        root.set_id(ROOT_ID);
        root.set_attribute("data-audio", "a.mp3, b.mp3").unwrap();
        root.set_attribute("data-guion", "  ").unwrap();
        root.set_attribute("data-fallbacks", r#"{"escena2":{"guion":"g2.pdf"}}"#).unwrap();
        document().body().unwrap().append_child(&root).unwrap();

        let page = page_config();
        assert_eq!(page.audio.as_deref(), Some("a.mp3, b.mp3"));
        assert_eq!(page.guion, None);
        assert_eq!(page.script_document("escena2").as_deref(), Some("g2.pdf"));

        root.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_event_within_player() {
        let area = document().create_element("div").unwrap();
        area.set_id("player-area");
        let button = document().create_element("button").unwrap();
        area.append_child(&button).unwrap();
        document().body().unwrap().append_child(&area).unwrap();

        let seen = std::rc::Rc::new(std::cell::Cell::new(None));
        let listener = {
            let seen = seen.clone();
            gloo::events::EventListener::new(&document(), "pointerdown", move |e| {
                seen.set(Some(event_within(e, "player-area")));
            })
        };
        let init = web_sys::EventInit::new();
        init.set_bubbles(true);
        let pointerdown = || web_sys::Event::new_with_event_init_dict("pointerdown", &init).unwrap();

        button.dispatch_event(&pointerdown()).unwrap();
        assert_eq!(seen.get(), Some(true));
        document().body().unwrap().dispatch_event(&pointerdown()).unwrap();
        assert_eq!(seen.get(), Some(false));

        drop(listener);
        area.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_focus_outside_inputs() {
        assert!(!focus_in_text_input());
    }
}
