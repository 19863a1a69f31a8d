//! シーン記述（Scene Description）の型定義
//!
//! JSON / スクリプトから読み込まれるシーンのブロック群。
//! すべてのブロックは任意で、存在しないブロックは描画されない。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::Result;

/// シーン全体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub meta: Option<Meta>,
    pub audio: Option<AudioBlock>,
    pub filters: Option<Filters>,
    pub resumen: Option<Resumen>,
    pub proposito: Option<Vec<String>>,
    pub pasos: Option<Vec<String>>,
    pub plastica: Option<Plastica>,
    pub luces: Option<Vec<TableRow>>,
    pub sonido: Option<Vec<String>>,
    pub vestuario: Option<Gallery>,
    pub escenario: Option<Gallery>,
    pub checklist: Option<Vec<String>>,
    pub pdfs: Option<Pdfs>,
    pub centros: Option<Centros>,
    pub materiales: Option<Vec<String>>,
    pub recursos: Option<Vec<LinkItem>>,
    pub docentes: Option<Docentes>,
    pub glosario: Option<Vec<GlossaryItem>>,
    pub pistas: Option<Vec<LinkItem>>,
}

impl SceneDescription {
    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// JSON値から変換（スクリプトのグローバル変数経由）
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// ファイルから読み込み（非WASM環境のみ）
    #[cfg(not(feature = "wasm"))]
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// ページ上部のタイトル（未設定時は既定値）
    pub fn title(&self) -> &str {
        self.meta
            .as_ref()
            .and_then(|m| m.title.as_deref())
            .unwrap_or(DEFAULT_TITLE)
    }
}

pub const DEFAULT_TITLE: &str = "AlegreMente · Guía de Escena";
pub const DEFAULT_HERO_ALT: &str = "Imagen de portada";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub footer: Option<String>,
    pub images: Option<MetaImages>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaImages {
    pub hero: Option<String>,
    pub hero_alt: Option<String>,
}

/// 音声ブロック（`sources` 優先、なければ `src`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioBlock {
    pub label: Option<String>,
    pub sources: Option<Vec<String>>,
    pub src: Option<String>,
}

impl AudioBlock {
    pub fn tracks(&self) -> Vec<String> {
        match &self.sources {
            Some(list) => list.clone(),
            None => self.src.iter().cloned().collect(),
        }
    }
}

/// チップとして表示するフィルタ候補
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub areas: Vec<String>,
    pub centros: Vec<String>,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resumen {
    pub text: Option<String>,
    pub duration: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plastica {
    pub items: Option<Vec<String>>,
    pub assets: Vec<ImageRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRef {
    pub src: String,
    pub alt: Option<String>,
    pub title: Option<String>,
}

impl ImageRef {
    /// alt → title → 既定値 の順で代替テキストを決める
    pub fn alt_or(&self, fallback: &str) -> String {
        self.alt
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.title.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(fallback)
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gallery {
    pub images: Vec<ImageRef>,
}

/// 表の1行（ヘッダ名 → セル値）
pub type TableRow = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pdfs {
    pub guion: Option<String>,
    pub partitura: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Centros {
    pub items: Option<Vec<String>>,
    pub docentes_text: Option<String>,
}

/// 資料・追加トラックのリンク
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkItem {
    pub title: String,
    pub href: String,
    pub icon: Option<String>,
    pub areas: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Docentes {
    pub items: Vec<Docente>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Docente {
    pub name: String,
    pub url: String,
    pub areas: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlossaryItem {
    pub term: String,
    pub def: String,
}
