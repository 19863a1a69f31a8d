//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use scene_guide::error::SceneGuideError;
use scene_guide::{loader, scanner};
use scene_guide_common::loader::LOAD_FAILURE_MESSAGE;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_scenes(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(SceneGuideError::FolderNotFound(_))));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_scenes(dir.path());

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.unwrap().is_empty());
}

/// 全候補が壊れている場合はページと同じ文言で失敗
#[test]
fn test_all_candidates_broken() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::create_dir(dir.path().join("escenas")).unwrap();
    std::fs::write(dir.path().join("escenas/rota.json"), "{ no es json").unwrap();
    std::fs::write(dir.path().join("rota.js"), "console.log('sin escena');").unwrap();

    let err = loader::load_from_dir(dir.path(), "rota").unwrap_err();
    assert!(matches!(err, SceneGuideError::SceneNotFound(_)));
    assert_eq!(err.to_string(), LOAD_FAILURE_MESSAGE);
}

/// 壊れた候補は飛ばして次の候補を使う
#[test]
fn test_broken_candidate_is_skipped() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::create_dir(dir.path().join("escenas")).unwrap();
    std::fs::write(dir.path().join("escenas/e3.json"), "[1, 2").unwrap();
    std::fs::write(dir.path().join("e3.json"), r#"{"checklist": ["Luces"]}"#).unwrap();

    let loaded = loader::load_from_dir(dir.path(), "e3").unwrap();
    assert_eq!(loaded.candidate.path, "e3.json");
}

/// SceneGuideErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        SceneGuideError::Config("テスト設定エラー".to_string()),
        SceneGuideError::FolderNotFound("/tmp/none".to_string()),
        SceneGuideError::InvalidFilter("area 'circo'".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty());
    }
}

/// 共通ライブラリのIOエラーはIOとして扱う
#[test]
fn test_common_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: SceneGuideError = scene_guide_common::Error::Io(io).into();
    assert!(matches!(err, SceneGuideError::Io(_)));
}
