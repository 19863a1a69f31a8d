//! ページ設定（ページのルート要素の data 属性）
//!
//! ヒーロー画像、音声宣言、台本PDF、楽譜フォルダ、背景画像と、
//! シーンIDごとのフォールバック表を保持する。読み取り専用。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// シーン別のフォールバック
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFallback {
    pub audio: Vec<String>,
    pub guion: Option<String>,
}

/// シーンID → フォールバック
pub type FallbackTable = HashMap<String, SceneFallback>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub hero: Option<String>,
    /// カンマ区切りのトラック宣言
    pub audio: Option<String>,
    pub guion: Option<String>,
    pub partituras: Option<String>,
    pub fondo: Option<String>,
    pub fallbacks: FallbackTable,
}

/// 読み取る data 属性
pub const PAGE_ATTRIBUTES: [&str; 6] = [
    "data-hero",
    "data-audio",
    "data-guion",
    "data-partituras",
    "data-fondo",
    "data-fallbacks",
];

impl PageConfig {
    /// 属性取得関数から構築（空文字は未設定扱い）
    pub fn from_attributes<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let attr = |name: &str| get(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let fallbacks = attr("data-fallbacks")
            .map(|json| match Self::parse_fallbacks(&json) {
                Ok(table) => table,
                Err(e) => {
                    log::warn!("data-fallbacks ignored: {}", e);
                    FallbackTable::new()
                }
            })
            .unwrap_or_default();

        Self {
            hero: attr("data-hero"),
            audio: attr("data-audio"),
            guion: attr("data-guion"),
            partituras: attr("data-partituras"),
            fondo: attr("data-fondo"),
            fallbacks,
        }
    }

    pub fn parse_fallbacks(json: &str) -> Result<FallbackTable> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn fallback_for(&self, scene_id: &str) -> SceneFallback {
        self.fallbacks.get(scene_id).cloned().unwrap_or_default()
    }

    /// 台本PDF: ページ設定 → シーン別フォールバック
    pub fn script_document(&self, scene_id: &str) -> Option<String> {
        self.guion
            .clone()
            .or_else(|| self.fallback_for(scene_id).guion)
    }

    /// ヒーロー画像: シーン指定 → ページ設定
    pub fn hero_image(&self, scene_hero: Option<&str>) -> Option<String> {
        scene_hero
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .or_else(|| self.hero.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_attributes() {
        let config = PageConfig::from_attributes(attrs(&[
            ("data-hero", "img/hero.jpg"),
            ("data-audio", "a.mp3,b.mp3"),
            ("data-guion", "  "),
            ("data-fallbacks", r#"{"escena2":{"audio":["fb.mp3"],"guion":"pdf/e2.pdf"}}"#),
        ]));
        assert_eq!(config.hero.as_deref(), Some("img/hero.jpg"));
        assert_eq!(config.audio.as_deref(), Some("a.mp3,b.mp3"));
        assert!(config.guion.is_none());
        assert_eq!(config.fallback_for("escena2").audio, vec!["fb.mp3"]);
        assert_eq!(config.script_document("escena2").as_deref(), Some("pdf/e2.pdf"));
        assert!(config.script_document("otra").is_none());
    }

    #[test]
    fn test_invalid_fallbacks_ignored() {
        let config = PageConfig::from_attributes(attrs(&[("data-fallbacks", "{oops")]));
        assert!(config.fallbacks.is_empty());
    }

    #[test]
    fn test_hero_image_priority() {
        let config = PageConfig {
            hero: Some("page.jpg".to_string()),
            ..Default::default()
        };
        assert_eq!(config.hero_image(Some("scene.jpg")).as_deref(), Some("scene.jpg"));
        assert_eq!(config.hero_image(Some("")).as_deref(), Some("page.jpg"));
        assert_eq!(config.hero_image(None).as_deref(), Some("page.jpg"));
    }
}
