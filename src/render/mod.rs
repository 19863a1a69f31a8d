pub mod html;

use crate::error::Result;
use scene_guide_common::card::{PdfEmbed, PdfViewState, Region};
use scene_guide_common::filter::{apply_filters, ChipBoard, Dimension, FilterState};
use scene_guide_common::loader::LoadedScene;
use scene_guide_common::playlist::{track_url, Playlist, DEFAULT_AUDIO_LABEL, LABEL_PLAY};
use scene_guide_common::text::escape_html;
use scene_guide_common::types::DEFAULT_HERO_ALT;
use scene_guide_common::{build_cards, refresh_resource_card, resolve_resources, PageConfig};
use std::path::{Path, PathBuf};

const STYLE: &str = r#"
body{font-family:system-ui,sans-serif;margin:0;background:#faf7f2;color:#222}
.wrap{max-width:1100px;margin:0 auto;padding:16px}
.grid{display:grid;grid-template-columns:2fr 1fr;gap:16px}
.card{background:#fff;border-radius:12px;padding:12px 16px;margin-bottom:12px;box-shadow:0 1px 3px #0002}
.card header{display:flex;justify-content:space-between;align-items:center;cursor:pointer}
.chip{display:inline-block;padding:4px 10px;border-radius:999px;border:1px solid #ccc;margin:2px;cursor:pointer}
.chip.active{background:#222;color:#fff}
.pill{display:inline-block;padding:2px 8px;border-radius:6px;background:#eee;margin:2px}
.muted{color:#666}.note{color:#a33}.kbd{font-family:monospace;background:#eee;padding:0 4px}
.stage-assets{display:grid;grid-template-columns:repeat(auto-fill,minmax(140px,1fr));gap:8px}
.stage-assets img{width:100%;border-radius:8px}
.pdf-frame{width:100%;height:480px;border:0}
table{border-collapse:collapse;width:100%}td,th{border-bottom:1px solid #eee;padding:4px;text-align:left}
@media (max-width:800px){.grid{grid-template-columns:1fr}}
"#;

const COPY_SCRIPT: &str = r#"
function sceneGuideCopyChecklist(){
  var items=[].map.call(document.querySelectorAll('#checklist li'),function(li){return li.textContent.trim();});
  navigator.clipboard.writeText(items.join('\n')).then(function(){alert('Checklist copiada.');});
}
"#;

/// 静的ページ生成の入力
pub struct RenderContext<'a> {
    pub loaded: &'a LoadedScene,
    pub page: &'a PageConfig,
    pub state: &'a FilterState,
    /// PDF の存在確認に使うシーンフォルダ
    pub root: &'a Path,
    /// キャッシュバスター用の時刻（ミリ秒）
    pub now_ms: u64,
    /// `<html lang>`
    pub language: &'a str,
}

/// PDF の到達確認（ローカルファイルのみ。外部URLは表示可能とみなす）
pub fn probe_pdf(root: &Path, pdf: &PdfEmbed) -> PdfViewState {
    if pdf.file.starts_with("http://") || pdf.file.starts_with("https://") {
        return PdfViewState::Ready;
    }
    let reachable = root.join(&pdf.file).is_file();
    if !reachable {
        log::warn!("PDF no encontrado: {}", pdf.file);
    }
    PdfViewState::after_probe(reachable)
}

/// シーン全体をHTMLページとして出力する
pub fn render_page(ctx: &RenderContext) -> String {
    let scene = &ctx.loaded.scene;
    let id = ctx.loaded.id.as_str();

    let mut cards = build_cards(scene);
    let entries = resolve_resources(ctx.page, id, scene);
    refresh_resource_card(&mut cards, &entries, &ctx.state.areas);
    let shown = apply_filters(&mut cards, ctx.state);
    log::info!("{}: {} tarjetas, {} visibles", id, cards.len(), shown);

    let mut board = ChipBoard::from_filters(scene.filters.as_ref());
    board.restore(ctx.state);

    let meta = scene.meta.as_ref();
    let subtitle = meta.and_then(|m| m.subtitle.as_deref()).unwrap_or("");
    let footer = meta.and_then(|m| m.footer.as_deref()).unwrap_or("");
    let images = meta.and_then(|m| m.images.as_ref());
    let hero = ctx
        .page
        .hero_image(images.and_then(|i| i.hero.as_deref()));
    let hero_alt = images
        .and_then(|i| i.hero_alt.as_deref())
        .unwrap_or(DEFAULT_HERO_ALT);

    let probe = |pdf: &PdfEmbed| probe_pdf(ctx.root, pdf);
    let column = |region: Region| -> String {
        cards
            .iter()
            .filter(|c| c.region == region)
            .map(|c| html::card_html(c, &probe))
            .collect()
    };

    let mut out = String::new();
    out.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n",
        escape_html(ctx.language)
    ));
    out.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(scene.title())));
    out.push_str(&format!("<style>{}</style>\n</head>\n", STYLE));
    out.push_str(&format!(
        "<body>\n<div class=\"wrap\" id=\"scene-guide\" data-scene=\"{}\">\n",
        escape_html(id)
    ));

    out.push_str(&format!(
        "<h1 id=\"sc-title\">{}</h1>\n<p id=\"sc-subtitle\" class=\"muted\">{}</p>\n",
        escape_html(scene.title()),
        escape_html(subtitle)
    ));
    match hero {
        Some(src) => out.push_str(&format!(
            "<img id=\"hero-img\" src=\"{}\" alt=\"{}\">\n",
            escape_html(&src),
            escape_html(hero_alt)
        )),
        None => out.push_str("<img id=\"hero-img\" alt=\"\" style=\"display:none\">\n"),
    }

    out.push_str(&player_html(ctx));

    for dimension in Dimension::ALL {
        out.push_str(&html::chip_row_html(dimension, board.chips(dimension)));
        out.push('\n');
    }
    out.push_str(&format!(
        "<input id=\"q\" type=\"search\" placeholder=\"Buscar…\" value=\"{}\">\n",
        escape_html(&ctx.state.q)
    ));

    out.push_str("<div class=\"grid\">\n");
    out.push_str(&format!(
        "<main id=\"{}\">\n{}</main>\n",
        Region::Main.container_id(),
        column(Region::Main)
    ));
    out.push_str(&format!(
        "<aside id=\"{}\">\n{}</aside>\n",
        Region::Aside.container_id(),
        column(Region::Aside)
    ));
    out.push_str("</div>\n");

    out.push_str(&format!(
        "<footer id=\"footer-note\" class=\"muted\">{}</footer>\n",
        escape_html(footer)
    ));
    out.push_str(&format!("</div>\n<script>{}</script>\n</body>\n</html>\n", COPY_SCRIPT));
    out
}

fn player_html(ctx: &RenderContext) -> String {
    let scene = &ctx.loaded.scene;
    let fallback = ctx.page.fallback_for(&ctx.loaded.id);
    let playlist = Playlist::resolve(ctx.page.audio.as_deref(), scene.audio.as_ref(), &fallback.audio);

    let Some(playlist) = playlist else {
        return "<div id=\"player-area\" style=\"display:none\"></div>\n".to_string();
    };
    let label = scene
        .audio
        .as_ref()
        .and_then(|a| a.label.as_deref())
        .unwrap_or(DEFAULT_AUDIO_LABEL);
    format!(
        "<div id=\"player-area\"><span id=\"audio-label\">{}</span> <audio id=\"scene-audio\" preload=\"auto\" src=\"{}\"></audio> <button class=\"btn\" id=\"btnPlay\" onclick=\"var a=document.getElementById('scene-audio');a.paused?a.play():a.pause()\">{}</button></div>\n",
        escape_html(label),
        escape_html(&track_url(playlist.current(), ctx.now_ms)),
        LABEL_PLAY
    )
}

/// 出力先の決定（ディレクトリ指定ならシーンIDをファイル名にする）
pub fn output_path(output: &Path, scene_id: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.html", scene_id))
    } else {
        output.to_path_buf()
    }
}

pub fn write_page(html: &str, output: &Path, scene_id: &str) -> Result<PathBuf> {
    let path = output_path(output, scene_id);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, html)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_guide_common::loader::{Candidate, CandidateKind};
    use scene_guide_common::SceneDescription;
    use tempfile::tempdir;

    fn loaded(json: &str) -> LoadedScene {
        LoadedScene {
            id: "e1".to_string(),
            candidate: Candidate {
                path: "escenas/e1.json".to_string(),
                kind: CandidateKind::Data,
            },
            scene: SceneDescription::from_json(json).unwrap(),
        }
    }

    #[test]
    fn test_probe_local_pdf() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("guion.pdf"), b"%PDF-1.4").unwrap();
        let mut pdf = PdfEmbed {
            key: "guion".into(),
            file: "guion.pdf".into(),
            url: "guion.pdf".into(),
            title: "Guion".into(),
        };
        assert_eq!(probe_pdf(dir.path(), &pdf), PdfViewState::Ready);
        pdf.file = "falta.pdf".into();
        assert_eq!(probe_pdf(dir.path(), &pdf), PdfViewState::Blocked);
        pdf.file = "https://example.org/guion.pdf".into();
        assert_eq!(probe_pdf(dir.path(), &pdf), PdfViewState::Ready);
    }

    #[test]
    fn test_render_applies_filters_and_chips() {
        let dir = tempdir().expect("Failed to create temp dir");
        let loaded = loaded(
            r#"{
                "meta": {"title": "Escena 1", "footer": "Pie"},
                "filters": {"areas": ["luces", "teatro"]},
                "pasos": ["Entrar"],
                "luces": [{"Cue": "1", "Estado": "OK", "Detalle": "Fade"}]
            }"#,
        );
        let mut state = FilterState::default();
        state.areas.insert("luces".to_string());

        let html = render_page(&RenderContext {
            loaded: &loaded,
            page: &PageConfig::default(),
            state: &state,
            root: dir.path(),
            now_ms: 42,
            language: "es",
        });

        assert!(html.contains(r#"<h1 id="sc-title">Escena 1</h1>"#));
        assert!(html.contains(r#"<span class="chip active" data-area="luces">luces</span>"#));
        assert!(html.contains(r#"id="card-pasos" data-tags="teatro" style="display:none""#));
        assert!(!html.contains(r#"id="card-luces" data-tags="luces" data-log="luces" style="display:none""#));
        assert!(html.contains(r#"<div id="player-area" style="display:none">"#));
        assert!(html.contains(r#"<footer id="footer-note" class="muted">Pie</footer>"#));
    }

    #[test]
    fn test_render_audio_uses_page_declaration() {
        let dir = tempdir().expect("Failed to create temp dir");
        let loaded = loaded(r#"{"audio": {"src": "escena.mp3", "label": "Canción"}}"#);
        let page = PageConfig {
            audio: Some("a.mp3, b.mp3".to_string()),
            ..PageConfig::default()
        };
        let html = render_page(&RenderContext {
            loaded: &loaded,
            page: &page,
            state: &FilterState::default(),
            root: dir.path(),
            now_ms: 7,
            language: "es",
        });
        assert!(html.contains(r#"src="a.mp3?v=7""#));
        assert!(html.contains(r#"<span id="audio-label">Canción</span>"#));
    }

    #[test]
    fn test_output_path() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert_eq!(output_path(dir.path(), "e1"), dir.path().join("e1.html"));
        let file = dir.path().join("guia.html");
        assert_eq!(output_path(&file, "e1"), file);
    }
}
