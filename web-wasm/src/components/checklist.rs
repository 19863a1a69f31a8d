//! チェックリストの印刷・コピー

use leptos::prelude::*;
use leptos::task::spawn_local;
use scene_guide_common::card::{checklist_clipboard_text, Action, COPY_CONFIRMATION};
use scene_guide_common::Card;

use crate::dom;

#[component]
pub fn ActionButtons(actions: Vec<Action>, card_id: String, cards: RwSignal<Vec<Card>>) -> impl IntoView {
    actions
        .into_iter()
        .map(|action| {
            let card_id = card_id.clone();
            let on_click = move |_| match action {
                Action::Print => dom::print(),
                Action::Copy => {
                    let text = cards.with_untracked(|cs| {
                        cs.iter()
                            .find(|c| c.id == card_id)
                            .and_then(|c| c.checklist_items())
                            .map(checklist_clipboard_text)
                            .unwrap_or_default()
                    });
                    spawn_local(async move {
                        match dom::copy_to_clipboard(&text).await {
                            Ok(()) => dom::alert(COPY_CONFIRMATION),
                            Err(e) => log::debug!("copy failed: {}", e),
                        }
                    });
                }
            };
            view! { <button class="btn" on:click=on_click>{action.label()}</button> }
        })
        .collect_view()
}
