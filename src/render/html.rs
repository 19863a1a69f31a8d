//! カードモデル → HTML文字列
//!
//! ブラウザ版と同じクラス名・data 属性を出力する。
//! 本文のマークアップ（リスト項目など）はシーン作者のものをそのまま埋め込む。

use scene_guide_common::card::{
    Action, Asset, Block, Card, LinkEntry, PdfEmbed, PdfViewState, PDF_DOWNLOAD_LABEL,
    PDF_FALLBACK_NOTE, PDF_VIEW_LABEL,
};
use scene_guide_common::filter::{Chip, Dimension};
use scene_guide_common::text::escape_html;

fn attr(value: &str) -> String {
    escape_html(value)
}

/// カード1枚
pub fn card_html<F>(card: &Card, pdf_state: &F) -> String
where
    F: Fn(&PdfEmbed) -> PdfViewState,
{
    let tags = card.tags();
    let mut data = String::new();
    for (key, set) in [("tags", &tags.areas), ("centros", &tags.centros), ("log", &tags.log)] {
        if !set.is_empty() {
            data.push_str(&format!(r#" data-{}="{}""#, key, attr(&set.to_attr())));
        }
    }
    let hidden = if card.visible { "" } else { r#" style="display:none""# };
    let content_style = if card.collapse.open { "" } else { r#" style="display:none""# };
    let tag = card.kind.tag_name();

    let mut html = format!(
        r#"<div class="card" id="card-{}"{}{}>"#,
        attr(&card.id),
        data,
        hidden
    );
    html.push_str(&format!(
        r#"<header><h2>{}</h2><span class="caret">{}</span></header>"#,
        escape_html(&card.title),
        card.collapse.caret_label()
    ));
    html.push_str(&format!(r#"<{} class="content"{}>"#, tag, content_style));
    for block in &card.body {
        html.push_str(&block_html(block, pdf_state));
    }
    html.push_str(&format!("</{}></div>\n", tag));
    html
}

fn block_html<F>(block: &Block, pdf_state: &F) -> String
where
    F: Fn(&PdfEmbed) -> PdfViewState,
{
    match block {
        Block::Paragraph { markup, muted } => {
            let class = if *muted { r#" class="muted""# } else { "" };
            format!("<p{}>{}</p>", class, markup)
        }
        Block::Pills(pills) => {
            let inner: String = pills
                .iter()
                .map(|p| format!(r#"<span class="pill">{}</span>"#, p))
                .collect();
            format!(r#"<div class="tools">{}</div>"#, inner)
        }
        Block::List { id, items } => {
            let id_attr = id
                .as_ref()
                .map(|i| format!(r#" id="{}""#, attr(i)))
                .unwrap_or_default();
            format!("<ul{}>{}</ul>", id_attr, list_items(items))
        }
        Block::OrderedList(items) => format!("<ol>{}</ol>", list_items(items)),
        Block::Table { headers, rows } => {
            let head: String = headers.iter().map(|h| format!("<th>{}</th>", h)).collect();
            let body: String = rows
                .iter()
                .map(|row| {
                    let cells: String = row.iter().map(|c| format!("<td>{}</td>", c)).collect();
                    format!("<tr>{}</tr>", cells)
                })
                .collect();
            format!(
                "<table><thead><tr>{}</tr></thead><tbody>{}</tbody></table>",
                head, body
            )
        }
        Block::Assets(assets) => {
            let inner: String = assets.iter().map(asset_html).collect();
            format!(r#"<div class="stage-assets">{}</div>"#, inner)
        }
        Block::Actions(actions) => {
            let inner: String = actions.iter().map(action_html).collect();
            format!(r#"<div class="actions">{}</div>"#, inner)
        }
        Block::Pdf(pdf) => pdf_html(pdf, pdf_state(pdf)),
        Block::Links(links) => {
            let inner: String = links.iter().map(link_html).collect();
            format!(
                r#"<ul style="list-style:none;padding-left:0">{}</ul>"#,
                inner
            )
        }
        Block::Glossary(entries) => entries
            .iter()
            .map(|(term, def)| {
                format!(r#"<p><span class="kbd">{}</span>: {}</p>"#, escape_html(term), def)
            })
            .collect(),
    }
}

fn list_items(items: &[String]) -> String {
    items.iter().map(|i| format!("<li>{}</li>", i)).collect()
}

fn asset_html(asset: &Asset) -> String {
    format!(
        r#"<div class="asset"><a href="{src}" target="_blank" rel="noreferrer"><img src="{src}" alt="{alt}"></a></div>"#,
        src = attr(&asset.src),
        alt = attr(&asset.alt)
    )
}

fn action_html(action: &Action) -> String {
    let handler = match action {
        Action::Print => "window.print()",
        Action::Copy => "sceneGuideCopyChecklist()",
    };
    format!(
        r#"<button class="btn" onclick="{}">{}</button>"#,
        handler,
        action.label()
    )
}

fn pdf_html(pdf: &PdfEmbed, state: PdfViewState) -> String {
    let url = attr(&pdf.url);
    let frame = if state.frame_visible() {
        format!(
            r#"<iframe class="pdf-frame" loading="lazy" title="{}" src="{}"></iframe>"#,
            attr(&pdf.title),
            attr(&pdf.viewer_src())
        )
    } else {
        format!(
            r#"<iframe class="pdf-frame" loading="lazy" title="{}" style="display:none"></iframe>"#,
            attr(&pdf.title)
        )
    };
    let note_style = if state.note_visible() { "display:block" } else { "display:none" };
    format!(
        r#"<div class="actions"><a class="btn" href="{url}" target="_blank" rel="noreferrer">{view}</a><a class="btn" href="{url}" download>{download}</a></div>{frame}<p class="note" id="{id}" style="{style}">{note}</p>"#,
        url = url,
        view = PDF_VIEW_LABEL,
        download = PDF_DOWNLOAD_LABEL,
        frame = frame,
        id = attr(&pdf.fallback_id()),
        style = note_style,
        note = PDF_FALLBACK_NOTE
    )
}

fn link_html(link: &LinkEntry) -> String {
    let anchor = format!(
        r#"<a href="{}" target="_blank" rel="noreferrer">{}</a>"#,
        attr(&link.href),
        escape_html(&link.label)
    );
    if link.row {
        let note = link
            .note
            .as_ref()
            .map(|n| format!(r#"<span class="teacher-tags">{}</span>"#, escape_html(n)))
            .unwrap_or_default();
        format!(
            r#"<li style="display:flex;justify-content:space-between;align-items:center;border-bottom:1px solid #eee;padding:6px 0">{}{}</li>"#,
            anchor, note
        )
    } else {
        let note = link
            .note
            .as_ref()
            .map(|n| format!(r#" <small class="muted">{}</small>"#, escape_html(n)))
            .unwrap_or_default();
        format!("<li>{}{}</li>", anchor, note)
    }
}

/// チップ1個
pub fn chip_html(chip: &Chip) -> String {
    let class = if chip.active { "chip active" } else { "chip" };
    format!(
        r#"<span class="{}" data-{}="{}">{}</span>"#,
        class,
        chip.dimension.data_key(),
        attr(&chip.value),
        escape_html(&chip.value)
    )
}

/// 次元ごとのチップ行
pub fn chip_row_html<'a, I>(dimension: Dimension, chips: I) -> String
where
    I: Iterator<Item = &'a Chip>,
{
    let inner: String = chips.map(chip_html).collect();
    format!(
        r#"<div class="chips" id="{}">{}</div>"#,
        dimension.container_id(),
        inner
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_guide_common::builder::{build_checklist, build_luces, build_pdf, PdfKind};
    use scene_guide_common::types::TableRow;

    fn probing(_: &PdfEmbed) -> PdfViewState {
        PdfViewState::Probing
    }

    #[test]
    fn test_lighting_card_html() {
        let mut row = TableRow::new();
        row.insert("Cue".into(), "1".into());
        row.insert("Estado".into(), "OK".into());
        row.insert("Detalle".into(), "Fade in".into());
        let html = card_html(&build_luces(&[row]), &probing);

        assert!(html.contains(r#"data-log="luces""#));
        assert!(html.contains(r#"data-tags="luces""#));
        assert_eq!(html.matches("<tr>").count(), 2);
        assert!(html.contains("<td>1</td><td>OK</td><td>Fade in</td>"));
        assert!(html.contains(r#"<span class="caret">Contraer</span>"#));
    }

    #[test]
    fn test_hidden_and_collapsed_card() {
        let mut card = build_checklist(&["Revisar micrófonos".to_string()]);
        card.visible = false;
        card.collapse.open = false;
        let html = card_html(&card, &probing);
        assert!(html.starts_with(r#"<div class="card" id="card-checklist-card" data-tags="produccion" style="display:none">"#));
        assert!(html.contains(r#"<span class="caret">Expandir</span>"#));
        assert!(html.contains(r#"<ul id="checklist"><li>Revisar micrófonos</li></ul>"#));
        assert!(html.contains("🖨️ Imprimir"));
    }

    #[test]
    fn test_blocked_pdf_shows_note() {
        let card = build_pdf(PdfKind::Partitura, "pdf/part.pdf");
        let html = card_html(&card, &|_: &PdfEmbed| PdfViewState::Blocked);
        assert!(html.contains(r#"id="fb-part" style="display:block""#));
        assert!(!html.contains("view=FitH"));

        let ready = card_html(&card, &|_: &PdfEmbed| PdfViewState::Ready);
        assert!(ready.contains("pdf/part.pdf#toolbar=1&amp;navpanes=0&amp;statusbar=0&amp;view=FitH"));
        assert!(ready.contains(r#"id="fb-part" style="display:none""#));
    }

    #[test]
    fn test_chip_html() {
        let mut chip = Chip::new(Dimension::Centro, "CEIP Sol");
        assert_eq!(
            chip_html(&chip),
            r#"<span class="chip" data-centro="CEIP Sol">CEIP Sol</span>"#
        );
        chip.active = true;
        assert!(chip_html(&chip).starts_with(r#"<span class="chip active""#));
    }
}
