//! 上部（タイトル・副題・ヒーロー画像）とフッター

use leptos::prelude::*;
use scene_guide_common::types::{DEFAULT_HERO_ALT, DEFAULT_TITLE};

#[component]
pub fn SceneTop(
    title: String,
    #[prop(into)] subtitle: Signal<String>,
    hero: Option<String>,
    hero_alt: Option<String>,
) -> impl IntoView {
    let title = if title.is_empty() { DEFAULT_TITLE.to_string() } else { title };
    let alt = hero_alt.unwrap_or_else(|| DEFAULT_HERO_ALT.to_string());

    view! {
        <header class="top">
            <h1 id="sc-title">{title}</h1>
            <p id="sc-subtitle" class="muted">{move || subtitle.get()}</p>
            {match hero {
                Some(src) => view! { <img id="hero-img" src=src alt=alt /> }.into_any(),
                None => view! { <img id="hero-img" alt="" style="display:none" /> }.into_any(),
            }}
        </header>
    }
}

#[component]
pub fn FooterNote(#[prop(into)] text: Signal<String>) -> impl IntoView {
    view! {
        <footer id="footer-note" class="muted">{move || text.get()}</footer>
    }
}
