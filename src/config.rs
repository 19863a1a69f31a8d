use crate::error::{SceneGuideError, Result};
use scene_guide_common::loader::DEFAULT_SCENE_ID;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// シーン（escenas/ を含むサイトのルート）
    pub scenes_dir: PathBuf,
    pub default_scene: String,
    /// 出力HTMLの lang 属性
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scenes_dir: PathBuf::from("."),
            default_scene: DEFAULT_SCENE_ID.into(),
            language: "es".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SceneGuideError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("scene-guide").join("config.json"))
    }

    /// 引数 → 設定 の順でシーンフォルダを決める
    pub fn scenes_dir_or(&self, arg: Option<PathBuf>) -> PathBuf {
        arg.unwrap_or_else(|| self.scenes_dir.clone())
    }

    pub fn scene_or(&self, arg: Option<String>) -> String {
        arg.filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.default_scene.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config.default_scene, "escena2");
        assert_eq!(config.language, "es");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            default_scene: "escena7".into(),
            ..Default::default()
        };
        config.save_to(&path).expect("保存失敗");

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_scene, "escena7");
    }

    #[test]
    fn test_argument_overrides() {
        let config = Config::default();
        assert_eq!(config.scene_or(Some("e1".into())), "e1");
        assert_eq!(config.scene_or(Some(String::new())), "escena2");
        assert_eq!(config.scenes_dir_or(None), PathBuf::from("."));
    }
}
