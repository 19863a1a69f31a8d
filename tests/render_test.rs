//! 読み込み → フィルタ → HTML出力 の統合テスト

use scene_guide::cli::FilterArgs;
use scene_guide::{filter, loader, render};
use scene_guide_common::filter::ChipBoard;
use scene_guide_common::PageConfig;
use tempfile::tempdir;

const SCENE: &str = r#"{
    "meta": {"title": "El bosque", "subtitle": "3º B", "images": {"hero": "img/hero.jpg"}},
    "filters": {"areas": ["teatro", "musica"], "centros": ["CEIP Sol"], "log": ["sonido"]},
    "resumen": {"text": "Los árboles despiertan.", "duration": "5 min"},
    "pasos": ["Entran los árboles", "Suena el viento"],
    "sonido": ["Micro de ambiente"],
    "checklist": ["Probar micros", "Revisar focos"],
    "pdfs": {"guion": "pdf/guion bosque.pdf"},
    "recursos": [{"title": "Partitura coro", "href": "docs/coro.pdf", "areas": ["musica"]}]
}"#;

fn site() -> tempfile::TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::create_dir_all(dir.path().join("escenas")).unwrap();
    std::fs::write(dir.path().join("escenas/bosque.json"), SCENE).unwrap();
    dir
}

#[test]
fn test_render_full_page() {
    let dir = site();
    let loaded = loader::load_from_dir(dir.path(), "bosque").unwrap();
    let board = ChipBoard::from_filters(loaded.scene.filters.as_ref());
    let state = FilterArgs {
        areas: vec!["musica".into()],
        ..FilterArgs::default()
    }
    .to_state(&board)
    .unwrap();

    let html = render::render_page(&render::RenderContext {
        loaded: &loaded,
        page: &PageConfig::default(),
        state: &state,
        root: dir.path(),
        now_ms: 1,
        language: "es",
    });

    assert!(html.contains("<title>El bosque</title>"));
    assert!(html.contains(r#"<img id="hero-img" src="img/hero.jpg" alt="Imagen de portada">"#));
    // musica のみ: pasos（teatro）は非表示、sonido（musica）は表示
    assert!(html.contains(r#"id="card-pasos" data-tags="teatro" style="display:none""#));
    assert!(html.contains(r#"id="card-sonido" data-tags="musica""#));
    assert!(!html.contains(r#"id="card-sonido" data-tags="musica" style="display:none""#));
    // PDF はファイルがないので案内を表示
    assert!(html.contains(r#"id="fb-guion" style="display:block""#));
    assert!(html.contains("pdf/guion%20bosque.pdf"));
    // 資料カードは area で絞り込まれてメイン列に入る
    assert!(html.contains(r#"id="card-recursos-docs""#));
    assert!(html.contains("Partitura coro"));
}

#[test]
fn test_write_page_to_directory() {
    let dir = site();
    let out = dir.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let path = render::write_page("<html></html>", &out, "bosque").unwrap();
    assert_eq!(path, out.join("bosque.html"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "<html></html>");
}

#[test]
fn test_filter_lists_page_resources() {
    let dir = site();
    let loaded = loader::load_from_dir(dir.path(), "bosque").unwrap();
    let board = ChipBoard::from_filters(loaded.scene.filters.as_ref());
    let page = PageConfig {
        guion: Some("pdf/guion.pdf".to_string()),
        ..PageConfig::default()
    };

    let all = FilterArgs::default().to_state(&board).unwrap();
    let cards = filter::visible_main_cards(&loaded, &page, &all);
    let resources = cards
        .iter()
        .find(|c| c.id == "recursos-docs")
        .expect("資料カードがない");
    assert!(resources.text_content().contains("Guión (PDF)"));
    assert!(resources.text_content().contains("Partitura coro"));

    // ページ設定なしでは guion は出ない
    let cards = filter::visible_main_cards(&loaded, &PageConfig::default(), &all);
    let resources = cards.iter().find(|c| c.id == "recursos-docs").unwrap();
    assert!(!resources.text_content().contains("Guión (PDF)"));

    // musica のみ: teatro の guion と pasos は除外
    let musica = FilterArgs {
        areas: vec!["musica".into()],
        ..FilterArgs::default()
    }
    .to_state(&board)
    .unwrap();
    let cards = filter::visible_main_cards(&loaded, &page, &musica);
    assert!(cards.iter().all(|c| c.id != "pasos"));
    let resources = cards.iter().find(|c| c.id == "recursos-docs").unwrap();
    assert!(!resources.text_content().contains("Guión (PDF)"));
    assert!(resources.text_content().contains("Partitura coro"));
}
