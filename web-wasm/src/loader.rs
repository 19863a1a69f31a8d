//! ブラウザでのシーン読み込み
//!
//! 候補を順に fetch / `<script>` 挿入で試す。候補の順序と解釈は共通ライブラリと同じ。

use futures::channel::oneshot;
use gloo::events::EventListener;
use gloo::net::http::Request;
use gloo::utils::{document, window};
use scene_guide_common::loader::{
    candidate_locations, parse_scene_json, with_cache_buster, Candidate, CandidateKind,
    LoadedScene, ScriptBindings, LOAD_FAILURE_MESSAGE, SCENE_BINDINGS,
};
use scene_guide_common::{Error, Result, SceneDescription};
use wasm_bindgen::JsValue;

use crate::dom::now_ms;

async fn fetch_data(path: &str) -> Result<String> {
    let url = with_cache_buster(path, now_ms());
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| Error::Script(format!("{}: {}", path, e)))?;
    if !response.ok() {
        return Err(Error::Script(format!("{}: HTTP {}", path, response.status())));
    }
    response
        .text()
        .await
        .map_err(|e| Error::Script(format!("{}: {}", path, e)))
}

/// モジュールとして読み込む `<script type="module">`
fn script_element(path: &str) -> Result<web_sys::Element> {
    let script = document()
        .create_element("script")
        .map_err(|e| Error::Script(format!("{:?}", e)))?;
    for (name, value) in [("type", "module".to_string()), ("src", with_cache_buster(path, now_ms()))] {
        script
            .set_attribute(name, &value)
            .map_err(|e| Error::Script(format!("{:?}", e)))?;
    }
    Ok(script)
}

/// `<script>` を挿入し、load / error まで待つ
async fn inject_script(path: &str) -> Result<()> {
    let script = script_element(path)?;

    let (tx, rx) = oneshot::channel::<bool>();
    let tx = std::rc::Rc::new(std::cell::RefCell::new(Some(tx)));
    let on_load = {
        let tx = tx.clone();
        EventListener::once(&script, "load", move |_| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(true);
            }
        })
    };
    let on_error = EventListener::once(&script, "error", move |_| {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(false);
        }
    });

    let parent: Option<web_sys::Element> = document()
        .head()
        .map(Into::into)
        .or_else(|| document().body().map(Into::into));
    let Some(parent) = parent else {
        return Err(Error::Script("no <head> or <body>".to_string()));
    };
    parent
        .append_child(&script)
        .map_err(|e| Error::Script(format!("{:?}", e)))?;

    let loaded = rx.await.unwrap_or(false);
    drop(on_load);
    drop(on_error);
    if loaded {
        Ok(())
    } else {
        Err(Error::Script(format!("{}: script error", path)))
    }
}

/// グローバル変数の値（undefined / null は None）
fn read_binding(name: &str) -> Option<serde_json::Value> {
    let value = js_sys::Reflect::get(&window(), &JsValue::from_str(name)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    match serde_wasm_bindgen::from_value(value) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("{} is not serializable: {}", name, e);
            None
        }
    }
}

async fn run_script(path: &str) -> Result<ScriptBindings> {
    inject_script(path).await?;
    Ok(ScriptBindings {
        scene: read_binding(SCENE_BINDINGS[0]),
        config_escena: read_binding(SCENE_BINDINGS[1]),
    })
}

async fn try_candidate(candidate: &Candidate) -> Result<SceneDescription> {
    match candidate.kind {
        CandidateKind::Data => parse_scene_json(&fetch_data(&candidate.path).await?),
        CandidateKind::Script => run_script(&candidate.path).await?.into_scene(),
    }
}

/// 候補を順に試す。全滅なら `Error::LoadFailed`
pub async fn load_scene(id: &str) -> Result<LoadedScene> {
    for candidate in candidate_locations(id) {
        match try_candidate(&candidate).await {
            Ok(scene) => {
                log::info!("scene '{}' loaded from {}", id, candidate.path);
                return Ok(LoadedScene {
                    id: id.to_string(),
                    candidate,
                    scene,
                });
            }
            Err(e) => log::debug!("candidate {} skipped: {}", candidate.path, e),
        }
    }
    Err(Error::LoadFailed(LOAD_FAILURE_MESSAGE.to_string()))
}

/// PDF の到達確認（HEAD）
pub async fn probe(url: &str) -> bool {
    use gloo::net::http::{Method, RequestBuilder};

    match RequestBuilder::new(url).method(Method::HEAD).send().await {
        Ok(response) => response.ok(),
        Err(e) => {
            log::debug!("probe failed for {}: {}", url, e);
            false
        }
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_read_binding_from_window() {
        let value = js_sys::JSON::parse(r#"{"pasos":["Entrar"]}"#).unwrap();
        js_sys::Reflect::set(&window(), &JsValue::from_str("CONFIG_ESCENA"), &value).unwrap();

        let json = read_binding("CONFIG_ESCENA").expect("binding");
        assert_eq!(json["pasos"][0], "Entrar");
        assert!(read_binding("__SCENE__").is_none());

        let target: js_sys::Object = window().into();
        js_sys::Reflect::delete_property(&target, &JsValue::from_str("CONFIG_ESCENA")).unwrap();
    }

    #[wasm_bindgen_test]
    fn wasm_script_candidate_is_module() {
        let script = script_element("escenas/e1.js").unwrap();
        assert_eq!(script.get_attribute("type").as_deref(), Some("module"));
        let src = script.get_attribute("src").unwrap();
        assert!(src.starts_with("escenas/e1.js?v="));
    }

    #[wasm_bindgen_test]
    async fn wasm_missing_scene_fails_with_message() {
        let err = load_scene("no-existe-escena").await.unwrap_err();
        assert_eq!(err.to_string(), LOAD_FAILURE_MESSAGE);
    }
}
