//! シーン記述 → カード列の構築
//!
//! ブロックごとに専用のビルダーがあり、ブロックが存在しなければ何も作らない。
//! 各ビルダーは固定の分類タグを付与し、メイン列かサイド列に配置する。

use serde_json::Value;

use crate::card::{
    make_card, Action, Asset, Block, Card, CardDef, LinkEntry, PdfEmbed, Region,
};
use crate::text::encode_uri;
use crate::types::{
    Centros, Docentes, Gallery, GlossaryItem, ImageRef, LinkItem, Plastica, Resumen,
    SceneDescription, TableRow,
};

/// 照明表の列
pub const LIGHTING_HEADERS: [&str; 3] = ["Cue", "Estado", "Detalle"];

/// スキーマ順にすべてのカードを構築（メイン → サイド）
pub fn build_cards(scene: &SceneDescription) -> Vec<Card> {
    let main = [
        scene.resumen.as_ref().map(build_resumen),
        scene.proposito.as_deref().map(build_proposito),
        scene.pasos.as_deref().map(build_pasos),
        scene.plastica.as_ref().map(build_plastica),
        scene.luces.as_deref().map(build_luces),
        scene.sonido.as_deref().map(build_sonido),
        scene.vestuario.as_ref().map(build_vestuario),
        scene.escenario.as_ref().map(build_escenario),
        scene.checklist.as_deref().map(build_checklist),
    ];

    let pdfs = scene.pdfs.as_ref();
    let pdf_cards = [
        pdfs.and_then(|p| p.guion.as_deref())
            .map(|f| build_pdf(PdfKind::Guion, f)),
        pdfs.and_then(|p| p.partitura.as_deref())
            .map(|f| build_pdf(PdfKind::Partitura, f)),
    ];

    let aside = [
        scene.centros.as_ref().map(build_centros),
        scene.materiales.as_deref().map(build_materiales),
        scene.recursos.as_deref().map(build_recursos),
        scene.docentes.as_ref().map(build_docentes),
        scene.glosario.as_deref().map(build_glosario),
        scene.pistas.as_deref().map(build_pistas),
    ];

    main.into_iter()
        .chain(pdf_cards)
        .chain(aside)
        .flatten()
        .collect()
}

fn main_card(id: &str, title: &str, areas: &str, log: &str) -> Card {
    make_card(CardDef::new(id, title).tags(areas, log), Region::Main)
}

fn aside_card(id: &str, title: &str) -> Card {
    make_card(CardDef::new(id, title), Region::Aside)
}

fn list(items: &[String]) -> Block {
    Block::List {
        id: None,
        items: items.to_vec(),
    }
}

fn asset_grid(images: &[ImageRef], fallback_alt: &str) -> Block {
    Block::Assets(
        images
            .iter()
            .map(|a| Asset {
                src: a.src.clone(),
                alt: a.alt_or(fallback_alt),
            })
            .collect(),
    )
}

pub fn build_resumen(block: &Resumen) -> Card {
    let mut card = main_card("resumen", "Resumen", "teatro musica danza plastica", "");
    if let Some(text) = &block.text {
        card.push(Block::Paragraph {
            markup: text.clone(),
            muted: false,
        });
    }
    let pills = block
        .duration
        .iter()
        .filter(|d| !d.is_empty())
        .map(|d| format!("Duración: {}", d))
        .chain(block.tags.iter().cloned())
        .filter(|p| !p.is_empty())
        .collect();
    card.push(Block::Pills(pills));
    card
}

pub fn build_proposito(items: &[String]) -> Card {
    main_card(
        "proposito",
        "🎯 Propósito pedagógico",
        "teatro musica danza plastica",
        "",
    )
    .with(list(items))
}

pub fn build_pasos(items: &[String]) -> Card {
    main_card("pasos", "🎭 Acción paso a paso", "teatro", "")
        .with(Block::OrderedList(items.to_vec()))
}

pub fn build_plastica(block: &Plastica) -> Card {
    let mut card = main_card(
        "plastica",
        "🎨 Imagen plástica en escena",
        "plastica teatro",
        "materiales",
    );
    if let Some(items) = &block.items {
        card.push(list(items));
    }
    if !block.assets.is_empty() {
        // 造形カードは alt のみ参照する
        let assets = block
            .assets
            .iter()
            .map(|a| Asset {
                src: a.src.clone(),
                alt: a.alt.clone().unwrap_or_default(),
            })
            .collect();
        card.push(Block::Assets(assets));
    }
    card
}

/// セル値を表示文字列に変換（欠損は空、数値はそのまま）
fn cell_text(row: &TableRow, header: &str) -> String {
    match row.get(header) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn table_from(rows: &[TableRow], headers: &[&str]) -> Block {
    Block::Table {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| headers.iter().map(|h| cell_text(row, h)).collect())
            .collect(),
    }
}

pub fn build_luces(rows: &[TableRow]) -> Card {
    main_card("luces", "🎛️ Luces y transiciones", "luces", "luces")
        .with(table_from(rows, &LIGHTING_HEADERS))
}

pub fn build_sonido(items: &[String]) -> Card {
    main_card(
        "sonido",
        "🔊 Requerimientos de sonido",
        "musica",
        "sonido amplificacion-coro diademas orquesta proyeccion",
    )
    .with(list(items))
}

pub fn build_vestuario(block: &Gallery) -> Card {
    let mut card = main_card(
        "vestuario",
        "👗 Vestuario (visual y detalle)",
        "plastica teatro danza",
        "vestuario",
    );
    if !block.images.is_empty() {
        card.push(asset_grid(&block.images, ""));
    }
    card
}

pub fn build_escenario(block: &Gallery) -> Card {
    let mut card = main_card(
        "escenario",
        "🖼️ Escenario (fotos)",
        "teatro produccion",
        "proyeccion materiales",
    );
    if !block.images.is_empty() {
        card.push(asset_grid(&block.images, "Foto de escenario"));
    }
    card
}

pub fn build_checklist(items: &[String]) -> Card {
    main_card(
        "checklist-card",
        "✅ Checklist (pre-ensayo y función)",
        "produccion",
        "",
    )
    .with(Block::List {
        id: Some("checklist".to_string()),
        items: items.to_vec(),
    })
    .with(Block::Actions(vec![Action::Print, Action::Copy]))
}

/// PDFの種類（タグと見出しが異なる）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfKind {
    Guion,
    Partitura,
}

impl PdfKind {
    pub fn key(&self) -> &'static str {
        match self {
            PdfKind::Guion => "guion",
            PdfKind::Partitura => "part",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PdfKind::Guion => "📄 Guión de la escena (PDF)",
            PdfKind::Partitura => "🎼 Partitura (PDF)",
        }
    }

    fn areas(&self) -> &'static str {
        match self {
            PdfKind::Guion => "teatro produccion",
            PdfKind::Partitura => "musica",
        }
    }
}

pub fn build_pdf(kind: PdfKind, file: &str) -> Card {
    main_card(&format!("pdf-{}", kind.key()), kind.title(), kind.areas(), "").with(Block::Pdf(
        PdfEmbed {
            key: kind.key().to_string(),
            file: file.to_string(),
            url: encode_uri(file),
            title: kind.title().to_string(),
        },
    ))
}

pub fn build_centros(block: &Centros) -> Card {
    let mut card = aside_card("centros", "👥 Centros y responsables");
    if let Some(items) = &block.items {
        card.push(list(items));
    }
    if let Some(text) = &block.docentes_text {
        card.push(Block::Paragraph {
            markup: crate::text::escape_html(text),
            muted: true,
        });
    }
    card
}

pub fn build_materiales(items: &[String]) -> Card {
    aside_card("materiales", "📦 Materiales clave").with(list(items))
}

fn link_entry(item: &LinkItem, default_icon: &str, row: bool) -> LinkEntry {
    let icon = item.icon.as_deref().unwrap_or(default_icon);
    LinkEntry {
        href: encode_uri(&item.href),
        label: format!("{} {}", icon, item.title),
        note: item.areas.as_ref().map(|a| a.join(", ")),
        row,
    }
}

pub fn build_recursos(items: &[LinkItem]) -> Card {
    let links = items
        .iter()
        .map(|r| {
            let mut entry = link_entry(r, "🔗", false);
            // 領域表記は常に括弧付きで表示
            entry.note = Some(format!("({})", r.areas.clone().unwrap_or_default().join(", ")));
            entry
        })
        .collect();
    aside_card("recursos", "📂 Recursos por arte").with(Block::Links(links))
}

pub fn build_docentes(block: &Docentes) -> Card {
    let links = block
        .items
        .iter()
        .map(|d| LinkEntry {
            href: d.url.clone(),
            label: d.name.clone(),
            note: Some(d.areas.join(", ")),
            row: true,
        })
        .collect();
    aside_card("docentes", "👩‍🏫 Docentes").with(Block::Links(links))
}

pub fn build_glosario(items: &[GlossaryItem]) -> Card {
    let entries = items
        .iter()
        .map(|g| (g.term.clone(), g.def.clone()))
        .collect();
    aside_card("glosario", "🧠 Glosario breve").with(Block::Glossary(entries))
}

pub fn build_pistas(items: &[LinkItem]) -> Card {
    let links = items.iter().map(|p| link_entry(p, "🎧", true)).collect();
    aside_card("pistas", "🎧 Pistas adicionales").with(Block::Links(links))
}
