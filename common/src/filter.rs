//! チップフィルタエンジン
//!
//! 3つの独立した次元（area / centro / log）のチップと自由文検索から
//! メイン列カードの表示・非表示を再計算する。
//!
//! 判定規則: 検索語が空 or 本文に含まれる（大文字小文字無視）
//! かつ 各次元で「アクティブなチップがない or カードのタグと交差する」。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::card::{Card, CardTags, Region};
use crate::error::Result;
use crate::types::Filters;

/// フィルタの次元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Area,
    Centro,
    Log,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Area, Dimension::Centro, Dimension::Log];

    /// チップ要素の `data-*` キー
    pub fn data_key(&self) -> &'static str {
        match self {
            Dimension::Area => "area",
            Dimension::Centro => "centro",
            Dimension::Log => "log",
        }
    }

    /// チップを並べるコンテナのID
    pub fn container_id(&self) -> &'static str {
        match self {
            Dimension::Area => "chips-areas",
            Dimension::Centro => "chips-centros",
            Dimension::Log => "chips-log",
        }
    }
}

/// チップへの操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipEvent {
    Clicked,
}

/// 切り替え可能なタグ選択子
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chip {
    pub dimension: Dimension,
    pub value: String,
    pub active: bool,
}

impl Chip {
    pub fn new(dimension: Dimension, value: &str) -> Self {
        Self {
            dimension,
            value: value.to_string(),
            active: false,
        }
    }

    pub fn next(&self, event: ChipEvent) -> Self {
        match event {
            ChipEvent::Clicked => Self {
                active: !self.active,
                ..self.clone()
            },
        }
    }
}

/// 全次元のチップ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipBoard {
    chips: Vec<Chip>,
}

impl ChipBoard {
    pub fn from_filters(filters: Option<&Filters>) -> Self {
        let Some(filters) = filters else {
            return Self::default();
        };
        let chips = [
            (Dimension::Area, &filters.areas),
            (Dimension::Centro, &filters.centros),
            (Dimension::Log, &filters.log),
        ]
        .into_iter()
        .flat_map(|(dim, values)| values.iter().map(move |v| Chip::new(dim, v)))
        .collect();
        Self { chips }
    }

    pub fn chips(&self, dimension: Dimension) -> impl Iterator<Item = &Chip> {
        self.chips.iter().filter(move |c| c.dimension == dimension)
    }

    pub fn all(&self) -> &[Chip] {
        &self.chips
    }

    /// 該当チップを切り替える。存在しなければ false
    pub fn handle(&mut self, dimension: Dimension, value: &str, event: ChipEvent) -> bool {
        match self
            .chips
            .iter_mut()
            .find(|c| c.dimension == dimension && c.value == value)
        {
            Some(chip) => {
                *chip = chip.next(event);
                true
            }
            None => false,
        }
    }

    pub fn active(&self, dimension: Dimension) -> BTreeSet<String> {
        self.chips(dimension)
            .filter(|c| c.active)
            .map(|c| c.value.clone())
            .collect()
    }

    /// 保存状態からチップを再アクティブ化（提供されていない値は捨てる）
    pub fn restore(&mut self, state: &FilterState) {
        for chip in &mut self.chips {
            chip.active = state.set(chip.dimension).contains(&chip.value);
        }
    }
}

/// フィルタ状態（永続化対象）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub areas: BTreeSet<String>,
    pub centros: BTreeSet<String>,
    pub logs: BTreeSet<String>,
    /// 入力欄の文字列（照合時に小文字化）
    pub q: String,
}

impl FilterState {
    /// アクティブなチップと入力欄から再構築
    pub fn from_board(board: &ChipBoard, query: &str) -> Self {
        Self {
            areas: board.active(Dimension::Area),
            centros: board.active(Dimension::Centro),
            logs: board.active(Dimension::Log),
            q: query.to_string(),
        }
    }

    pub fn set(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::Area => &self.areas,
            Dimension::Centro => &self.centros,
            Dimension::Log => &self.logs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty() && self.centros.is_empty() && self.logs.is_empty() && self.q.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// タグと本文に対する判定
    pub fn matches(&self, tags: &CardTags, text: &str) -> bool {
        let q = self.q.to_lowercase();
        let text_ok = q.is_empty() || text.to_lowercase().contains(&q);
        let open_or = |active: &BTreeSet<String>, tags: &crate::card::TagSet| {
            active.is_empty() || tags.intersects(active)
        };
        text_ok
            && open_or(&self.areas, &tags.areas)
            && open_or(&self.centros, &tags.centros)
            && open_or(&self.logs, &tags.log)
    }
}

/// 永続化キー（シーンごと）
pub fn storage_key(scene_id: &str) -> String {
    format!("scene-guide:filters:{}", scene_id)
}

pub fn is_card_visible(card: &Card, state: &FilterState) -> bool {
    state.matches(card.tags(), &card.text_content())
}

/// メイン列のカードに表示状態を適用し、表示数を返す
pub fn apply_filters(cards: &mut [Card], state: &FilterState) -> usize {
    let mut shown = 0;
    for card in cards.iter_mut().filter(|c| c.region == Region::Main) {
        card.visible = is_card_visible(card, state);
        if card.visible {
            shown += 1;
        }
    }
    log::debug!("filters applied: {} main cards visible", shown);
    shown
}
