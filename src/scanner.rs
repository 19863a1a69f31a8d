use crate::error::{SceneGuideError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 見つかったシーンファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneFile {
    pub id: String,
    pub path: PathBuf,
    pub is_script: bool,
}

const SCENE_EXTENSIONS: &[&str] = &["json", "js"];

/// ルート直下と `escenas/` 直下のシーンを列挙（IDごとに候補順で最初のもの）
pub fn scan_scenes(root: &Path) -> Result<Vec<SceneFile>> {
    if !root.exists() {
        return Err(SceneGuideError::FolderNotFound(root.display().to_string()));
    }

    // 候補順: escenas/*.json → *.json → escenas/*.js → *.js
    let mut found: BTreeMap<String, (u8, SceneFile)> = BTreeMap::new();

    for (dir, in_escenas) in [(root.join("escenas"), true), (root.to_path_buf(), false)] {
        if !dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
                continue;
            };
            if !SCENE_EXTENSIONS.contains(&ext.as_str()) {
                continue;
            }
            let Some(id) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            if is_ignored(&id) {
                continue;
            }

            let is_script = ext == "js";
            let rank = match (is_script, in_escenas) {
                (false, true) => 0,
                (false, false) => 1,
                (true, true) => 2,
                (true, false) => 3,
            };
            let file = SceneFile {
                id: id.clone(),
                path: path.to_path_buf(),
                is_script,
            };
            match found.get(&id) {
                Some((existing, _)) if *existing <= rank => {}
                _ => {
                    found.insert(id, (rank, file));
                }
            }
        }
    }

    Ok(found.into_values().map(|(_, f)| f).collect())
}

/// ページ用スクリプトや設定ファイルはシーンとして扱わない
fn is_ignored(stem: &str) -> bool {
    matches!(stem, "script" | "main" | "package" | "package-lock" | "tsconfig")
        || stem.starts_with('.')
        || stem.ends_with(".min")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scan_orders_and_dedups() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::create_dir(dir.path().join("escenas")).unwrap();
        std::fs::write(dir.path().join("escenas/escena2.json"), "{}").unwrap();
        std::fs::write(dir.path().join("escena2.js"), "").unwrap();
        std::fs::write(dir.path().join("escena1.js"), "").unwrap();
        std::fs::write(dir.path().join("script.js"), "").unwrap();
        std::fs::write(dir.path().join("notas.txt"), "").unwrap();

        let scenes = scan_scenes(dir.path()).unwrap();
        let ids: Vec<&str> = scenes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["escena1", "escena2"]);
        assert!(scenes[0].is_script);
        assert!(!scenes[1].is_script);
        assert!(scenes[1].path.ends_with("escenas/escena2.json"));
    }

    #[test]
    fn test_scan_missing_folder() {
        let result = scan_scenes(Path::new("/nonexistent/path/12345"));
        assert!(matches!(result, Err(SceneGuideError::FolderNotFound(_))));
    }
}
