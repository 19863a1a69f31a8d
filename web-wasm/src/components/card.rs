//! カード（見出しクリックで開閉、本文はブロックごとに描画）
//!
//! 開閉・表示状態はカード一覧のシグナル側に持ち、ビューはそれを読むだけ。

use leptos::prelude::*;
use scene_guide_common::card::{Asset, ContentKind, LinkEntry};
use scene_guide_common::{Block, Card, CardEvent};

use crate::components::checklist::ActionButtons;
use crate::components::pdf_viewer::PdfViewer;

fn list_items(items: Vec<String>) -> impl IntoView {
    items
        .into_iter()
        .map(|item| view! { <li inner_html=item></li> })
        .collect_view()
}

fn asset_view(asset: Asset) -> impl IntoView {
    view! {
        <div class="asset">
            <a href=asset.src.clone() target="_blank" rel="noreferrer">
                <img src=asset.src.clone() alt=asset.alt />
            </a>
        </div>
    }
}

fn link_view(link: LinkEntry) -> impl IntoView {
    let anchor = view! {
        <a href=link.href target="_blank" rel="noreferrer">{link.label}</a>
    };
    if link.row {
        view! {
            <li class="link-row">
                {anchor}
                {link.note.map(|n| view! { <span class="teacher-tags">{n}</span> })}
            </li>
        }
        .into_any()
    } else {
        view! {
            <li>
                {anchor}
                {link.note.map(|n| view! { " " <small class="muted">{n}</small> })}
            </li>
        }
        .into_any()
    }
}

fn block_view(block: Block, card_id: &str, cards: RwSignal<Vec<Card>>) -> AnyView {
    match block {
        Block::Paragraph { markup, muted } => {
            view! { <p class:muted=muted inner_html=markup></p> }.into_any()
        }
        Block::Pills(pills) => view! {
            <div class="tools">
                {pills
                    .into_iter()
                    .map(|p| view! { <span class="pill" inner_html=p></span> })
                    .collect_view()}
            </div>
        }
        .into_any(),
        Block::List { id, items } => view! { <ul id=id>{list_items(items)}</ul> }.into_any(),
        Block::OrderedList(items) => view! { <ol>{list_items(items)}</ol> }.into_any(),
        Block::Table { headers, rows } => view! {
            <table>
                <thead>
                    <tr>
                        {headers
                            .into_iter()
                            .map(|h| view! { <th inner_html=h></th> })
                            .collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|row| {
                            view! {
                                <tr>
                                    {row
                                        .into_iter()
                                        .map(|cell| view! { <td inner_html=cell></td> })
                                        .collect_view()}
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any(),
        Block::Assets(assets) => view! {
            <div class="stage-assets">{assets.into_iter().map(asset_view).collect_view()}</div>
        }
        .into_any(),
        Block::Actions(actions) => view! {
            <div class="actions">
                <ActionButtons actions=actions card_id=card_id.to_string() cards=cards />
            </div>
        }
        .into_any(),
        Block::Pdf(pdf) => view! { <PdfViewer pdf=pdf /> }.into_any(),
        Block::Links(links) => view! {
            <ul class="links">{links.into_iter().map(link_view).collect_view()}</ul>
        }
        .into_any(),
        Block::Glossary(entries) => entries
            .into_iter()
            .map(|(term, def)| {
                view! {
                    <p>
                        <span class="kbd">{term}</span>
                        ": "
                        <span inner_html=def></span>
                    </p>
                }
            })
            .collect_view()
            .into_any(),
    }
}

#[component]
pub fn CardView(card: Card, cards: RwSignal<Vec<Card>>) -> impl IntoView {
    let id = card.id.clone();

    let collapse = {
        let id = id.clone();
        Memo::new(move |_| {
            cards.with(|cs| cs.iter().find(|c| c.id == id).map(|c| c.collapse))
                .unwrap_or(card.collapse)
        })
    };
    let visible = {
        let id = id.clone();
        Memo::new(move |_| {
            cards.with(|cs| cs.iter().find(|c| c.id == id).map(|c| c.visible))
                .unwrap_or(true)
        })
    };

    let on_header = {
        let id = id.clone();
        move |_| {
            cards.update(|cs| {
                if let Some(c) = cs.iter_mut().find(|c| c.id == id) {
                    c.handle(CardEvent::HeaderClicked);
                }
            });
        }
    };

    let tags = card.tags().clone();
    let non_empty = |attr: String| (!attr.is_empty()).then_some(attr);
    let body = card
        .body
        .into_iter()
        .map(|block| block_view(block, &id, cards))
        .collect_view();
    let content_display = move || collapse.get().content_display();
    let content = match card.kind {
        ContentKind::Div => {
            view! { <div class="content" style:display=content_display>{body}</div> }.into_any()
        }
        ContentKind::Section => view! {
            <section class="content" style:display=content_display>{body}</section>
        }
        .into_any(),
    };

    view! {
        <div
            class="card"
            id=format!("card-{}", id)
            attr:data-tags=non_empty(tags.areas.to_attr())
            attr:data-centros=non_empty(tags.centros.to_attr())
            attr:data-log=non_empty(tags.log.to_attr())
            style:display=move || if visible.get() { "" } else { "none" }
        >
            <header on:click=on_header>
                <h2>{card.title}</h2>
                <span class="caret">{move || collapse.get().caret_label()}</span>
            </header>
            {content}
        </div>
    }
}
