//! 補助資料（台本PDF・楽譜フォルダ・背景画像）の解決と絞り込み
//!
//! 資料一覧は area チップのみで絞り込み、フィルタ再計算のたびに
//! メイン列の専用カードへ描き直す。カードは初回に必要になった時点で作る。

use std::collections::BTreeSet;

use crate::card::{make_card, Block, Card, CardDef, LinkEntry, Region, TagSet};
use crate::page_config::PageConfig;
use crate::text::encode_uri;
use crate::types::SceneDescription;

pub const RESOURCE_CARD_ID: &str = "recursos-docs";
pub const RESOURCE_CARD_TITLE: &str = "📚 Recursos y documentos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Document,
    Folder,
    Image,
    Audio,
    Link,
}

impl ResourceKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ResourceKind::Document => "📄",
            ResourceKind::Folder => "📁",
            ResourceKind::Image => "🖼️",
            ResourceKind::Audio => "🎧",
            ResourceKind::Link => "🔗",
        }
    }

    /// リンク先の形から種別を推定
    pub fn infer(href: &str) -> Self {
        let path = href.split(['?', '#']).next().unwrap_or(href).to_lowercase();
        let ext = path.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
        match ext {
            "pdf" | "doc" | "docx" | "odt" => ResourceKind::Document,
            "jpg" | "jpeg" | "png" | "webp" | "gif" | "svg" => ResourceKind::Image,
            "mp3" | "wav" | "ogg" | "m4a" => ResourceKind::Audio,
            _ if path.ends_with('/') => ResourceKind::Folder,
            _ => ResourceKind::Link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub title: String,
    pub href: String,
    pub areas: TagSet,
    pub kind: ResourceKind,
    /// 明示アイコン（種別アイコンより優先）
    pub icon: Option<String>,
}

impl ResourceEntry {
    pub fn icon(&self) -> &str {
        self.icon.as_deref().unwrap_or(self.kind.icon())
    }

    fn to_link(&self) -> LinkEntry {
        let areas: Vec<&str> = self.areas.iter().collect();
        LinkEntry {
            href: encode_uri(&self.href),
            label: format!("{} {}", self.icon(), self.title),
            note: (!areas.is_empty()).then(|| areas.join(", ")),
            row: true,
        }
    }
}

/// 空・未記入の場所か
pub fn is_placeholder(location: &str) -> bool {
    let value = location.trim();
    if value.is_empty() || value == "#" {
        return true;
    }
    if value.starts_with("{{") && value.ends_with("}}") {
        return true;
    }
    matches!(
        value.to_lowercase().as_str(),
        "todo" | "pendiente" | "none" | "null" | "undefined"
    )
}

fn page_entry(
    location: Option<String>,
    title: &str,
    areas: &str,
    kind: ResourceKind,
) -> Option<ResourceEntry> {
    location.filter(|l| !is_placeholder(l)).map(|href| ResourceEntry {
        title: title.to_string(),
        href,
        areas: TagSet::parse(areas),
        kind,
        icon: None,
    })
}

/// ページ設定とシーンの `recursos` から資料一覧を作る
pub fn resolve_resources(
    page: &PageConfig,
    scene_id: &str,
    scene: &SceneDescription,
) -> Vec<ResourceEntry> {
    let fixed = [
        page_entry(
            page.script_document(scene_id),
            "Guión (PDF)",
            "teatro produccion",
            ResourceKind::Document,
        ),
        page_entry(
            page.partituras.clone(),
            "Partituras",
            "musica",
            ResourceKind::Folder,
        ),
        page_entry(
            page.fondo.clone(),
            "Fondo de escena",
            "plastica",
            ResourceKind::Image,
        ),
    ];

    let from_scene = scene
        .recursos
        .iter()
        .flatten()
        .filter(|r| !is_placeholder(&r.href))
        .map(|r| ResourceEntry {
            title: r.title.clone(),
            href: r.href.clone(),
            areas: TagSet::from_values(r.areas.iter().flatten()),
            kind: ResourceKind::infer(&r.href),
            icon: r.icon.clone(),
        });

    fixed.into_iter().flatten().chain(from_scene).collect()
}

/// area チップでの絞り込み（未選択なら全件）
pub fn filter_by_areas<'a>(
    entries: &'a [ResourceEntry],
    active_areas: &BTreeSet<String>,
) -> Vec<&'a ResourceEntry> {
    entries
        .iter()
        .filter(|e| active_areas.is_empty() || e.areas.intersects(active_areas))
        .collect()
}

/// 絞り込み結果から資料カードを作る
pub fn resource_card(entries: &[&ResourceEntry]) -> Card {
    let areas = TagSet::from_values(
        entries
            .iter()
            .flat_map(|e| e.areas.iter().map(str::to_string).collect::<Vec<_>>()),
    );
    let mut def = CardDef::new(RESOURCE_CARD_ID, RESOURCE_CARD_TITLE);
    def.tags.areas = areas;
    make_card(def, Region::Main)
        .with(Block::Links(entries.iter().map(|e| e.to_link()).collect()))
}

/// 資料カードを描き直す（未作成ならメイン列末尾に追加）
///
/// 開閉状態は作り直しても維持する。資料が1件もなく、カードも未作成なら何もしない。
pub fn refresh_resource_card(
    cards: &mut Vec<Card>,
    entries: &[ResourceEntry],
    active_areas: &BTreeSet<String>,
) {
    let filtered = filter_by_areas(entries, active_areas);
    let existing = cards
        .iter()
        .position(|c| c.id == RESOURCE_CARD_ID && c.region == Region::Main);

    match existing {
        Some(index) => {
            let mut card = resource_card(&filtered);
            card.collapse = cards[index].collapse;
            cards[index] = card;
        }
        None if entries.is_empty() => {}
        None => {
            let insert_at = cards
                .iter()
                .rposition(|c| c.region == Region::Main)
                .map(|i| i + 1)
                .unwrap_or(0);
            cards.insert(insert_at, resource_card(&filtered));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LinkItem;

    fn page() -> PageConfig {
        PageConfig {
            guion: Some("pdf/guion.pdf".to_string()),
            partituras: Some("https://drive.example.org/partituras/".to_string()),
            fondo: Some("{{FONDO}}".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_placeholders() {
        for value in ["", " ", "#", "{{X}}", "TODO", "Pendiente", "null"] {
            assert!(is_placeholder(value), "{:?}", value);
        }
        assert!(!is_placeholder("pdf/guion.pdf"));
    }

    #[test]
    fn test_resolve_excludes_placeholder() {
        let entries = resolve_resources(&page(), "escena2", &SceneDescription::default());
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Guión (PDF)", "Partituras"]);
        assert_eq!(entries[0].icon(), "📄");
        assert_eq!(entries[1].kind, ResourceKind::Folder);
    }

    #[test]
    fn test_scene_recursos_appended() {
        let scene = SceneDescription {
            recursos: Some(vec![LinkItem {
                title: "Coreografía".to_string(),
                href: "video/baile.mp4".to_string(),
                icon: Some("🎬".to_string()),
                areas: Some(vec!["danza".to_string()]),
            }]),
            ..Default::default()
        };
        let entries = resolve_resources(&PageConfig::default(), "x", &scene);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].icon(), "🎬");
        assert!(entries[0].areas.contains("danza"));
    }

    #[test]
    fn test_infer_kind() {
        assert_eq!(ResourceKind::infer("a/B.PDF"), ResourceKind::Document);
        assert_eq!(ResourceKind::infer("x.png?v=1"), ResourceKind::Image);
        assert_eq!(ResourceKind::infer("pistas/a.mp3"), ResourceKind::Audio);
        assert_eq!(ResourceKind::infer("https://x.org/carpeta/"), ResourceKind::Folder);
        assert_eq!(ResourceKind::infer("https://x.org/ver"), ResourceKind::Link);
    }

    #[test]
    fn test_filter_by_areas() {
        let entries = resolve_resources(&page(), "escena2", &SceneDescription::default());
        let musica: BTreeSet<String> = ["musica".to_string()].into_iter().collect();
        let filtered = filter_by_areas(&entries, &musica);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Partituras");
        assert_eq!(filter_by_areas(&entries, &BTreeSet::new()).len(), 2);
    }

    #[test]
    fn test_refresh_creates_lazily_and_reuses() {
        let entries = resolve_resources(&page(), "escena2", &SceneDescription::default());
        let aside = make_card(CardDef::new("glosario", "Glosario"), Region::Aside);
        let main = make_card(CardDef::new("pasos", "Pasos"), Region::Main);
        let mut cards = vec![main, aside];

        refresh_resource_card(&mut cards, &entries, &BTreeSet::new());
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[1].id, RESOURCE_CARD_ID);

        cards[1].collapse.open = false;
        let musica: BTreeSet<String> = ["musica".to_string()].into_iter().collect();
        refresh_resource_card(&mut cards, &entries, &musica);
        assert_eq!(cards.len(), 3);
        assert!(!cards[1].collapse.open);
        match &cards[1].body[0] {
            Block::Links(links) => {
                assert_eq!(links.len(), 1);
                assert_eq!(links[0].label, "📁 Partituras");
            }
            other => panic!("想定外のブロック: {:?}", other),
        }
    }

    #[test]
    fn test_refresh_without_entries_creates_nothing() {
        let mut cards = Vec::new();
        refresh_resource_card(&mut cards, &[], &BTreeSet::new());
        assert!(cards.is_empty());
    }
}
