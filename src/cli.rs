use clap::{Args, Parser, Subcommand};
use scene_guide_common::filter::{ChipBoard, ChipEvent, Dimension, FilterState};
use std::path::PathBuf;

use crate::error::{Result, SceneGuideError};

#[derive(Parser)]
#[command(name = "scene-guide")]
#[command(about = "Guía de escena: carga, valida, filtra y renderiza escenas", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// シーンフォルダ（省略時は設定値）
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// フォルダ内のシーンを一覧表示
    List,

    /// シーンを読み込み、カード構成と参照ファイルを検査
    Validate {
        /// シーンID（省略時は設定値）
        scene: Option<String>,

        /// ページ設定JSON（data-* 属性と同じ項目）
        #[arg(long)]
        page: Option<PathBuf>,
    },

    /// フィルタを適用して表示されるカードを列挙
    Filter {
        /// シーンID（省略時は設定値）
        scene: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// ページ設定JSON（data-* 属性と同じ項目）
        #[arg(long)]
        page: Option<PathBuf>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// シーンを静的HTMLに書き出す
    Render {
        /// シーンID（省略時は設定値）
        scene: Option<String>,

        /// 出力ファイル/ディレクトリ（デフォルト: シーンフォルダ/<ID>.html）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ページ設定JSON（data-* 属性と同じ項目）
        #[arg(long)]
        page: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定のシーンIDを設定
        #[arg(long)]
        set_default_scene: Option<String>,

        /// 既定のシーンフォルダを設定
        #[arg(long)]
        set_scenes_dir: Option<PathBuf>,
    },
}

/// チップと検索語の指定（繰り返し可）
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// area チップ
    #[arg(long = "area")]
    pub areas: Vec<String>,

    /// centro チップ
    #[arg(long = "centro")]
    pub centros: Vec<String>,

    /// log チップ
    #[arg(long = "log")]
    pub logs: Vec<String>,

    /// 本文検索
    #[arg(short, long, default_value = "")]
    pub query: String,
}

impl FilterArgs {
    /// シーンのチップ定義に照らしてフィルタ状態を作る
    ///
    /// 定義にない値は InvalidFilter。チップを押したときと同じ経路で有効化する。
    pub fn to_state(&self, board: &ChipBoard) -> Result<FilterState> {
        let mut board = board.clone();
        for (dimension, values) in [
            (Dimension::Area, &self.areas),
            (Dimension::Centro, &self.centros),
            (Dimension::Log, &self.logs),
        ] {
            for value in values {
                let known = board.chips(dimension).any(|c| &c.value == value);
                if !known {
                    return Err(SceneGuideError::InvalidFilter(format!(
                        "{} '{}'",
                        dimension.data_key(),
                        value
                    )));
                }
                let already = board.active(dimension).contains(value);
                if !already {
                    board.handle(dimension, value, ChipEvent::Clicked);
                }
            }
        }
        Ok(FilterState::from_board(&board, self.query.trim()))
    }
}
