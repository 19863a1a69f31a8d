//! シーンの検査
//!
//! カード構成を数え、シーンが参照するローカルファイル（PDF・画像・音声）の
//! 存在を確認する。外部URLは確認しない。

use scene_guide_common::card::Region;
use scene_guide_common::filter::ChipBoard;
use scene_guide_common::loader::LoadedScene;
use scene_guide_common::resources::is_placeholder;
use scene_guide_common::{build_cards, Playlist, PageConfig};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub scene_id: String,
    pub source: String,
    pub main_cards: usize,
    pub aside_cards: usize,
    pub chips: usize,
    pub tracks: usize,
    /// 見つからないローカルファイル
    pub missing_files: Vec<String>,
    /// href が未設定（`#` や `{{...}}`）の資料
    pub placeholder_links: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.missing_files.is_empty()
    }
}

fn is_remote(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:")
}

/// シーンが参照するローカルパス
fn referenced_files(loaded: &LoadedScene, page: &PageConfig) -> Vec<String> {
    let scene = &loaded.scene;
    let mut files: Vec<String> = Vec::new();

    if let Some(pdfs) = &scene.pdfs {
        files.extend(pdfs.guion.iter().cloned());
        files.extend(pdfs.partitura.iter().cloned());
    }
    let images = scene.meta.as_ref().and_then(|m| m.images.as_ref());
    files.extend(page.hero_image(images.and_then(|i| i.hero.as_deref())));

    let galleries = [scene.vestuario.as_ref(), scene.escenario.as_ref()];
    for gallery in galleries.into_iter().flatten() {
        files.extend(gallery.images.iter().map(|i| i.src.clone()));
    }
    if let Some(plastica) = &scene.plastica {
        files.extend(plastica.assets.iter().map(|a| a.src.clone()));
    }

    let fallback = page.fallback_for(&loaded.id);
    if let Some(playlist) = Playlist::resolve(page.audio.as_deref(), scene.audio.as_ref(), &fallback.audio) {
        files.extend(playlist.tracks().iter().cloned());
    }

    files
        .into_iter()
        .filter(|f| !f.is_empty() && !is_remote(f) && !is_placeholder(f))
        .collect()
}

pub fn validate_scene(root: &Path, loaded: &LoadedScene, page: &PageConfig) -> ValidationReport {
    let scene = &loaded.scene;
    let cards = build_cards(scene);
    let board = ChipBoard::from_filters(scene.filters.as_ref());
    let fallback = page.fallback_for(&loaded.id);

    let missing_files = referenced_files(loaded, page)
        .into_iter()
        .filter(|f| !root.join(f).exists())
        .collect::<Vec<_>>();
    for file in &missing_files {
        log::warn!("{}: archivo no encontrado: {}", loaded.id, file);
    }

    let placeholder_links = [scene.recursos.as_ref(), scene.pistas.as_ref()]
        .into_iter()
        .flatten()
        .flatten()
        .filter(|l| is_placeholder(&l.href))
        .map(|l| l.title.clone())
        .collect();

    ValidationReport {
        scene_id: loaded.id.clone(),
        source: loaded.candidate.path.clone(),
        main_cards: cards.iter().filter(|c| c.region == Region::Main).count(),
        aside_cards: cards.iter().filter(|c| c.region == Region::Aside).count(),
        chips: board.all().len(),
        tracks: Playlist::resolve(page.audio.as_deref(), scene.audio.as_ref(), &fallback.audio)
            .map(|p| p.len())
            .unwrap_or(0),
        missing_files,
        placeholder_links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_guide_common::loader::{Candidate, CandidateKind};
    use scene_guide_common::SceneDescription;
    use tempfile::tempdir;

    #[test]
    fn test_validate_reports_missing_and_placeholders() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("guion.pdf"), b"%PDF").unwrap();

        let scene = SceneDescription::from_json(
            r#"{
                "pdfs": {"guion": "guion.pdf", "partitura": "part.pdf"},
                "audio": {"sources": ["https://cdn.example.org/a.mp3"]},
                "filters": {"areas": ["teatro"], "log": ["luces"]},
                "pasos": ["Entrar"],
                "recursos": [{"title": "Dossier", "href": "{{DOSSIER}}"}],
                "glosario": [{"term": "Foro", "def": "Fondo del escenario"}]
            }"#,
        )
        .unwrap();
        let loaded = LoadedScene {
            id: "e1".into(),
            candidate: Candidate {
                path: "escenas/e1.json".into(),
                kind: CandidateKind::Data,
            },
            scene,
        };

        let report = validate_scene(dir.path(), &loaded, &PageConfig::default());
        assert_eq!(report.missing_files, vec!["part.pdf"]);
        assert_eq!(report.placeholder_links, vec!["Dossier"]);
        assert_eq!(report.tracks, 1);
        assert_eq!(report.chips, 2);
        // pasos + 2 PDF / recursos + glosario
        assert_eq!(report.main_cards, 3);
        assert_eq!(report.aside_cards, 2);
        assert!(!report.is_ok());
    }
}
