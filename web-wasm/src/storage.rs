//! フィルタ状態の永続化（localStorage）

use gloo::storage::{LocalStorage, Storage};
use scene_guide_common::{storage_key, FilterState};

/// 保存済みの状態。未保存・破損・ストレージ不可なら None
pub fn load_filters(scene_id: &str) -> Option<FilterState> {
    match LocalStorage::get::<FilterState>(storage_key(scene_id)) {
        Ok(state) => Some(state),
        Err(e) => {
            log::debug!("stored filters ignored: {}", e);
            None
        }
    }
}

pub fn save_filters(scene_id: &str, state: &FilterState) {
    if let Err(e) = LocalStorage::set(storage_key(scene_id), state) {
        log::warn!("filters not saved: {}", e);
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_filters_round_trip() {
        let mut state = FilterState::default();
        state.areas.insert("musica".to_string());
        state.q = "tambor".to_string();

        save_filters("test-escena", &state);
        assert_eq!(load_filters("test-escena"), Some(state));
        LocalStorage::delete(storage_key("test-escena"));
    }

    #[wasm_bindgen_test]
    fn wasm_corrupt_state_is_ignored() {
        LocalStorage::raw()
            .set_item(&storage_key("rota"), "{no json")
            .unwrap();
        assert_eq!(load_filters("rota"), None);
        LocalStorage::delete(storage_key("rota"));
    }
}
