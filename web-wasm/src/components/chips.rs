//! フィルタチップの行

use leptos::prelude::*;
use scene_guide_common::{ChipBoard, ChipEvent, Dimension};

#[component]
pub fn ChipRow(dimension: Dimension, board: RwSignal<ChipBoard>) -> impl IntoView {
    let values: Vec<String> = board.with_untracked(|b| b.chips(dimension).map(|c| c.value.clone()).collect());

    let chips = values
        .into_iter()
        .map(|value| {
            let label = value.clone();
            let data = |dim: Dimension| (dimension == dim).then(|| value.clone());
            let (area, centro, log_tag) = (
                data(Dimension::Area),
                data(Dimension::Centro),
                data(Dimension::Log),
            );
            let is_active = {
                let value = value.clone();
                move || board.with(|b| b.chips(dimension).any(|c| c.value == value && c.active))
            };
            let on_click = move |_| {
                board.update(|b| {
                    b.handle(dimension, &value, ChipEvent::Clicked);
                });
            };
            view! {
                <span
                    class="chip"
                    class:active=is_active
                    attr:data-area=area
                    attr:data-centro=centro
                    attr:data-log=log_tag
                    on:click=on_click
                >
                    {label}
                </span>
            }
        })
        .collect_view();

    view! {
        <div class="chips" id=dimension.container_id()>{chips}</div>
    }
}

#[component]
pub fn ChipRows(board: RwSignal<ChipBoard>) -> impl IntoView {
    Dimension::ALL
        .into_iter()
        .map(|dimension| view! { <ChipRow dimension=dimension board=board /> })
        .collect_view()
}
