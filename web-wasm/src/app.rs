//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use scene_guide_common::loader::status_message;
use scene_guide_common::playlist::DEFAULT_AUDIO_LABEL;
use scene_guide_common::{
    apply_filters, build_cards, refresh_resource_card, resolve_resources, Card, ChipBoard,
    FilterState, LoadedScene, PageConfig, Playlist, Region,
};

use crate::components::{
    audio_player::AudioPlayer,
    card::CardView,
    chips::ChipRows,
    top::{FooterNote, SceneTop},
};
use crate::{dom, loader, storage};

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let page = dom::page_config();
    let scene_id = dom::scene_id();

    let (loaded, set_loaded) = signal(None::<LoadedScene>);
    let (status, set_status) = signal(String::new());

    spawn_local(async move {
        let result = loader::load_scene(&scene_id).await;
        set_status.set(status_message(&result));
        match result {
            Ok(scene) => set_loaded.set(Some(scene)),
            Err(e) => log::warn!("scene '{}' not loaded: {}", scene_id, e),
        }
    });

    view! {
        <div class="wrap">
            {move || match loaded.get() {
                Some(scene) => view! { <SceneView loaded=scene page=page.clone() /> }.into_any(),
                None => view! {
                    <SceneTop title=String::new() subtitle=status hero=None hero_alt=None />
                    <FooterNote text=status />
                }
                .into_any(),
            }}
        </div>
    }
}

/// 保存済みの状態でチップと検索語を戻す（提供されていない値は捨てる）
fn restore_filters(scene_id: &str, board: &mut ChipBoard) -> String {
    match storage::load_filters(scene_id) {
        Some(state) => {
            board.restore(&state);
            state.q
        }
        None => String::new(),
    }
}

/// 読み込んだシーンの全体
#[component]
fn SceneView(loaded: LoadedScene, page: PageConfig) -> impl IntoView {
    let LoadedScene { id, scene, .. } = loaded;
    dom::set_document_title(scene.title());

    let entries = resolve_resources(&page, &id, &scene);

    let mut initial_board = ChipBoard::from_filters(scene.filters.as_ref());
    let initial_query = restore_filters(&id, &mut initial_board);
    let mut initial_cards = build_cards(&scene);
    {
        let state = FilterState::from_board(&initial_board, &initial_query);
        refresh_resource_card(&mut initial_cards, &entries, &state.areas);
        apply_filters(&mut initial_cards, &state);
    }

    let board = RwSignal::new(initial_board);
    let query = RwSignal::new(initial_query);
    let cards = RwSignal::new(initial_cards);

    // チップ・検索語が変わるたびに再計算して保存
    {
        let id = id.clone();
        Effect::new(move |_| {
            let state = board.with(|b| query.with(|q| FilterState::from_board(b, q)));
            cards.update(|cs| {
                refresh_resource_card(cs, &entries, &state.areas);
                apply_filters(cs, &state);
            });
            storage::save_filters(&id, &state);
        });
    }

    let column = move |region: Region| {
        move || {
            cards.with(|cs| {
                cs.iter()
                    .filter(|c| c.region == region)
                    .cloned()
                    .collect::<Vec<Card>>()
            })
        }
    };

    let meta = scene.meta.clone().unwrap_or_default();
    let images = meta.images.clone().unwrap_or_default();
    let hero = page.hero_image(images.hero.as_deref());
    let subtitle = meta.subtitle.clone().unwrap_or_default();
    let footer = meta.footer.clone().unwrap_or_default();

    let fallback = page.fallback_for(&id);
    let playlist = Playlist::resolve(page.audio.as_deref(), scene.audio.as_ref(), &fallback.audio);
    let audio_label = scene
        .audio
        .as_ref()
        .and_then(|a| a.label.clone())
        .unwrap_or_else(|| DEFAULT_AUDIO_LABEL.to_string());

    view! {
        <SceneTop
            title=scene.title().to_string()
            subtitle=Signal::derive(move || subtitle.clone())
            hero=hero
            hero_alt=images.hero_alt
        />

        {match playlist {
            Some(playlist) => view! { <AudioPlayer playlist=playlist label=audio_label /> }.into_any(),
            None => view! { <div id="player-area" style="display:none"></div> }.into_any(),
        }}

        <ChipRows board=board />
        <input
            id="q"
            type="search"
            placeholder="Buscar…"
            prop:value=move || query.get()
            on:input=move |ev| query.set(event_target_value(&ev))
        />

        <div class="grid">
            <main id=Region::Main.container_id()>
                <For
                    each=column(Region::Main)
                    key=|c: &Card| (c.id.clone(), c.text_content())
                    children=move |card| view! { <CardView card=card cards=cards /> }
                />
            </main>
            <aside id=Region::Aside.container_id()>
                <For
                    each=column(Region::Aside)
                    key=|c: &Card| (c.id.clone(), c.text_content())
                    children=move |card| view! { <CardView card=card cards=cards /> }
                />
            </aside>
        </div>

        <FooterNote text=Signal::derive(move || footer.clone()) />
    }
}
