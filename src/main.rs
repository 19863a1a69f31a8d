use clap::Parser;
use scene_guide::{cli, config, error, filter, loader, render, scanner, validate};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use scene_guide_common::filter::ChipBoard;
use scene_guide_common::PageConfig;
use serde::Serialize;
use std::path::Path;

/// ページ設定JSONを読む（省略時は空）
fn load_page_config(path: Option<&Path>) -> Result<PageConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        }
        None => Ok(PageConfig::default()),
    }
}

#[derive(Serialize)]
struct VisibleCard<'a> {
    id: &'a str,
    title: &'a str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::load()?;
    let root = config.scenes_dir_or(cli.dir.clone());

    match cli.command {
        Commands::List => {
            println!("🎭 scene-guide - シーン一覧\n");
            let scenes = scanner::scan_scenes(&root)?;
            if scenes.is_empty() {
                println!("シーンが見つかりません: {}", root.display());
            }
            for scene in &scenes {
                let mark = if scene.id == config.default_scene { "*" } else { " " };
                let kind = if scene.is_script { "js" } else { "json" };
                println!("{} {:<20} [{}] {}", mark, scene.id, kind, scene.path.display());
            }
            println!("\n✔ {}件", scenes.len());
        }

        Commands::Validate { scene, page } => {
            println!("🔍 scene-guide - 検査\n");
            let id = config.scene_or(scene);
            let page = load_page_config(page.as_deref())?;

            println!("[1/2] シーンを読み込み中... ({})", id);
            let loaded = loader::load_from_dir(&root, &id)?;
            println!("✔ {}\n", loaded.candidate.path);

            println!("[2/2] 参照ファイルを確認中...");
            let report = validate::validate_scene(&root, &loaded, &page);
            println!("  メイン: {}枚 / サイド: {}枚", report.main_cards, report.aside_cards);
            println!("  チップ: {}個 / トラック: {}件", report.chips, report.tracks);
            for file in &report.missing_files {
                println!("  ✖ 見つかりません: {}", file);
            }
            for title in &report.placeholder_links {
                println!("  - リンク未設定: {}", title);
            }

            if report.is_ok() {
                println!("\n✅ 問題なし");
            } else {
                println!("\n⚠ {}件のファイルが見つかりません", report.missing_files.len());
            }
        }

        Commands::Filter { scene, filters, page, json } => {
            let id = config.scene_or(scene);
            let page = load_page_config(page.as_deref())?;
            let loaded = loader::load_from_dir(&root, &id)?;
            let board = ChipBoard::from_filters(loaded.scene.filters.as_ref());
            let state = filters.to_state(&board)?;

            let cards = filter::visible_main_cards(&loaded, &page, &state);
            let visible: Vec<VisibleCard> = cards
                .iter()
                .map(|c| VisibleCard {
                    id: &c.id,
                    title: &c.title,
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                println!("🔎 scene-guide - フィルタ ({})\n", id);
                for card in &visible {
                    println!("  {:<16} {}", card.id, card.title);
                }
                println!("\n✔ {}枚を表示", visible.len());
            }
        }

        Commands::Render { scene, output, page, filters } => {
            println!("📄 scene-guide - HTML出力\n");
            let id = config.scene_or(scene);
            let page = load_page_config(page.as_deref())?;

            println!("[1/2] シーンを読み込み中... ({})", id);
            let loaded = loader::load_from_dir(&root, &id)?;
            let board = ChipBoard::from_filters(loaded.scene.filters.as_ref());
            let state = filters.to_state(&board)?;
            println!("✔ {}\n", loaded.candidate.path);

            println!("[2/2] HTMLを生成中...");
            let html = render::render_page(&render::RenderContext {
                loaded: &loaded,
                page: &page,
                state: &state,
                root: &root,
                now_ms: chrono::Utc::now().timestamp_millis().max(0) as u64,
                language: &config.language,
            });
            let output = output.unwrap_or_else(|| root.clone());
            let path = render::write_page(&html, &output, &id)?;
            println!("✔ HTML出力: {}", path.display());

            println!("\n✅ 完了");
        }

        Commands::Config { show, set_default_scene, set_scenes_dir } => {
            let mut config = config;
            let mut changed = false;

            if let Some(scene) = set_default_scene {
                config.default_scene = scene;
                changed = true;
            }
            if let Some(dir) = set_scenes_dir {
                config.scenes_dir = dir;
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  シーンフォルダ: {}", config.scenes_dir.display());
                println!("  既定のシーン: {}", config.default_scene);
                println!("  言語: {}", config.language);
            }
        }
    }

    Ok(())
}
