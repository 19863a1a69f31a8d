//! フィルタ適用（`filter` コマンド）

use scene_guide_common::filter::{apply_filters, FilterState};
use scene_guide_common::{
    build_cards, refresh_resource_card, resolve_resources, Card, LoadedScene, PageConfig, Region,
};

/// フィルタ後に表示されるメイン列のカード（表示順）
///
/// 資料カードはページ設定の資料（guion / partituras / fondo）も含めて作る。
pub fn visible_main_cards(loaded: &LoadedScene, page: &PageConfig, state: &FilterState) -> Vec<Card> {
    let mut cards = build_cards(&loaded.scene);
    let entries = resolve_resources(page, &loaded.id, &loaded.scene);
    refresh_resource_card(&mut cards, &entries, &state.areas);
    let shown = apply_filters(&mut cards, state);
    log::debug!("{} main cards shown for '{}'", shown, loaded.id);

    cards
        .into_iter()
        .filter(|c| c.region == Region::Main && c.visible)
        .collect()
}
