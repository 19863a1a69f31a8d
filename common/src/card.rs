//! カード（折りたたみ可能なコンテンツ単位）のモデル
//!
//! カードはタイトル、本文ブロック、分類タグ（area / centro / log）を持つ。
//! 開閉状態と表示状態は真偽値で保持し、次状態は純粋関数で計算する。
//! DOMへの描画はこのモデルの射影として別途行う。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::text::{split_tokens, strip_tags};

pub const CARET_EXPAND: &str = "Expandir";
pub const CARET_COLLAPSE: &str = "Contraer";

/// カードの配置先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// `#col-main`（フィルタ対象）
    Main,
    /// `#col-aside`（フィルタ対象外）
    Aside,
}

impl Region {
    pub fn container_id(&self) -> &'static str {
        match self {
            Region::Main => "col-main",
            Region::Aside => "col-aside",
        }
    }
}

/// 本文領域の要素種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Div,
    Section,
}

impl ContentKind {
    pub fn tag_name(&self) -> &'static str {
        match self {
            ContentKind::Div => "div",
            ContentKind::Section => "section",
        }
    }
}

/// 空白区切りトークンの集合（作成後は不変）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn parse(tokens: &str) -> Self {
        Self(split_tokens(tokens).map(str::to_string).collect())
    }

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            values
                .into_iter()
                .flat_map(|v| split_tokens(v.as_ref()).map(str::to_string).collect::<Vec<_>>())
                .collect(),
        )
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// `active` のいずれかを含むか
    pub fn intersects(&self, active: &BTreeSet<String>) -> bool {
        active.iter().any(|t| self.0.contains(t))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// `data-*` 属性値（空白区切り）
    pub fn to_attr(&self) -> String {
        self.iter().collect::<Vec<_>>().join(" ")
    }
}

/// カードの分類タグ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTags {
    pub areas: TagSet,
    pub centros: TagSet,
    pub log: TagSet,
}

impl CardTags {
    pub fn new(areas: &str, log: &str) -> Self {
        Self {
            areas: TagSet::parse(areas),
            centros: TagSet::default(),
            log: TagSet::parse(log),
        }
    }

    pub fn with_centros(mut self, centros: &str) -> Self {
        self.centros = TagSet::parse(centros);
        self
    }
}

/// カードへのユーザー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    HeaderClicked,
}

/// 開閉状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapseState {
    pub open: bool,
}

impl CollapseState {
    pub fn new(open: bool) -> Self {
        Self { open }
    }

    /// 折りたたみ不可のカードは状態が変化しない
    pub fn next(self, event: CardEvent, collapsible: bool) -> Self {
        match event {
            CardEvent::HeaderClicked if collapsible => Self { open: !self.open },
            CardEvent::HeaderClicked => self,
        }
    }

    pub fn caret_label(&self) -> &'static str {
        if self.open {
            CARET_COLLAPSE
        } else {
            CARET_EXPAND
        }
    }

    /// 本文の `display` スタイル値
    pub fn content_display(&self) -> &'static str {
        if self.open {
            "block"
        } else {
            "none"
        }
    }
}

/// チェックリスト等のボタン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Print,
    Copy,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Print => "🖨️ Imprimir",
            Action::Copy => "📋 Copiar",
        }
    }
}

pub const COPY_CONFIRMATION: &str = "Checklist copiada.";

/// 画像グリッドの1要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub src: String,
    pub alt: String,
}

/// リンク一覧の1要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub href: String,
    pub label: String,
    /// 右側に表示する補足（担当領域など）
    pub note: Option<String>,
    /// 行レイアウト（左右配置＋区切り線）
    pub row: bool,
}

pub const PDF_VIEWER_PARAMS: &str = "#toolbar=1&navpanes=0&statusbar=0&view=FitH";
pub const PDF_FALLBACK_NOTE: &str = "Visor bloqueado. Usa los botones de arriba.";
pub const PDF_VIEW_LABEL: &str = "👁️ Ver";
pub const PDF_DOWNLOAD_LABEL: &str = "⬇ Descargar";

/// 埋め込みPDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfEmbed {
    pub key: String,
    /// シーンに書かれたままのパス（到達性チェック用）
    pub file: String,
    /// URIエンコード済みのURL
    pub url: String,
    pub title: String,
}

impl PdfEmbed {
    pub fn viewer_src(&self) -> String {
        format!("{}{}", self.url, PDF_VIEWER_PARAMS)
    }

    pub fn fallback_id(&self) -> String {
        format!("fb-{}", self.key)
    }
}

/// PDFビューアの表示状態（到達性チェックの結果で決まる）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdfViewState {
    #[default]
    Probing,
    Ready,
    Blocked,
}

impl PdfViewState {
    pub fn after_probe(reachable: bool) -> Self {
        if reachable {
            PdfViewState::Ready
        } else {
            PdfViewState::Blocked
        }
    }

    pub fn frame_visible(&self) -> bool {
        !matches!(self, PdfViewState::Blocked)
    }

    pub fn note_visible(&self) -> bool {
        matches!(self, PdfViewState::Blocked)
    }
}

/// カード本文の構成ブロック
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// インラインマークアップを含む段落
    Paragraph { markup: String, muted: bool },
    Pills(Vec<String>),
    List { id: Option<String>, items: Vec<String> },
    OrderedList(Vec<String>),
    Table { headers: Vec<String>, rows: Vec<Vec<String>> },
    Assets(Vec<Asset>),
    Actions(Vec<Action>),
    Pdf(PdfEmbed),
    Links(Vec<LinkEntry>),
    Glossary(Vec<(String, String)>),
}

impl Block {
    fn push_text(&self, out: &mut Vec<String>) {
        match self {
            Block::Paragraph { markup, .. } => out.push(strip_tags(markup)),
            Block::Pills(pills) => out.extend(pills.iter().map(|p| strip_tags(p))),
            Block::List { items, .. } | Block::OrderedList(items) => {
                out.extend(items.iter().map(|i| strip_tags(i)))
            }
            Block::Table { headers, rows } => {
                out.extend(headers.iter().cloned());
                for row in rows {
                    out.extend(row.iter().map(|c| strip_tags(c)));
                }
            }
            Block::Assets(_) => {}
            Block::Actions(actions) => out.extend(actions.iter().map(|a| a.label().to_string())),
            Block::Pdf(_) => {
                out.push(PDF_VIEW_LABEL.to_string());
                out.push(PDF_DOWNLOAD_LABEL.to_string());
                out.push(PDF_FALLBACK_NOTE.to_string());
            }
            Block::Links(links) => {
                for link in links {
                    out.push(strip_tags(&link.label));
                    if let Some(note) = &link.note {
                        out.push(note.clone());
                    }
                }
            }
            Block::Glossary(entries) => {
                out.extend(entries.iter().map(|(t, d)| format!("{}: {}", t, strip_tags(d))))
            }
        }
    }
}

/// `make_card` への入力
#[derive(Debug, Clone, PartialEq)]
pub struct CardDef {
    pub id: String,
    pub title: String,
    pub kind: ContentKind,
    pub tags: CardTags,
    pub collapsible: bool,
    pub open: bool,
}

impl CardDef {
    /// 折りたたみ可・初期状態は開
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind: ContentKind::Div,
            tags: CardTags::default(),
            collapsible: true,
            open: true,
        }
    }

    pub fn tags(mut self, areas: &str, log: &str) -> Self {
        self.tags = CardTags::new(areas, log);
        self
    }

    pub fn kind(mut self, kind: ContentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }
}

/// 描画済みカード
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub kind: ContentKind,
    pub region: Region,
    tags: CardTags,
    pub collapsible: bool,
    pub collapse: CollapseState,
    pub visible: bool,
    pub body: Vec<Block>,
}

/// 空の本文を持つカードを作成（本文は呼び出し側で追加する）
pub fn make_card(def: CardDef, region: Region) -> Card {
    Card {
        id: def.id,
        title: def.title,
        kind: def.kind,
        region,
        tags: def.tags,
        collapsible: def.collapsible,
        collapse: CollapseState::new(def.open),
        visible: true,
        body: Vec::new(),
    }
}

impl Card {
    pub fn tags(&self) -> &CardTags {
        &self.tags
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.body.push(block);
        self
    }

    pub fn with(mut self, block: Block) -> Self {
        self.body.push(block);
        self
    }

    pub fn handle(&mut self, event: CardEvent) {
        self.collapse = self.collapse.next(event, self.collapsible);
    }

    /// ヘッダのタイトルと本文のテキスト（検索対象）
    ///
    /// 開閉インジケータの文言は含めず、ノード間は空白で区切る。
    /// 検索結果は開閉状態に左右されない。
    pub fn text_content(&self) -> String {
        let mut parts = vec![self.title.clone()];
        for block in &self.body {
            block.push_text(&mut parts);
        }
        parts.join(" ")
    }

    /// チェックリスト項目（`#checklist li`）
    pub fn checklist_items(&self) -> Option<&[String]> {
        self.body.iter().find_map(|b| match b {
            Block::List { id: Some(id), items } if id == "checklist" => Some(items.as_slice()),
            _ => None,
        })
    }
}

/// コピー操作でクリップボードに書き込む文字列
pub fn checklist_clipboard_text(items: &[String]) -> String {
    items
        .iter()
        .map(|i| strip_tags(i).trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
