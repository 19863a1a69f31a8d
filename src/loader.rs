//! ローカルフォルダからのシーン読み込み
//!
//! ブラウザ版と同じ候補チェーンをファイルシステム上で辿る。
//! スクリプト候補は実行できないため、`__SCENE__` / `CONFIG_ESCENA` への
//! 代入文を探し、右辺のオブジェクトリテラルをJSONとして読む。

use regex::Regex;
use scene_guide_common::loader::{load_scene, LoadedScene, SceneSource, ScriptBindings, SCENE_BINDINGS};
use scene_guide_common::{Error as CommonError, Result as CommonResult};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{Result, SceneGuideError};

/// フォルダを起点にした取得手段
pub struct FsSceneSource {
    root: PathBuf,
}

impl FsSceneSource {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn read(&self, path: &str) -> CommonResult<String> {
        Ok(std::fs::read_to_string(self.root.join(path))?)
    }
}

impl SceneSource for FsSceneSource {
    fn fetch_data(&mut self, path: &str) -> CommonResult<String> {
        self.read(path)
    }

    fn run_script(&mut self, path: &str) -> CommonResult<ScriptBindings> {
        let source = self.read(path)?;
        Ok(ScriptBindings {
            scene: extract_binding(&source, SCENE_BINDINGS[0])?,
            config_escena: extract_binding(&source, SCENE_BINDINGS[1])?,
        })
    }
}

/// `window.NAME = {...}` / `globalThis.NAME = {...}` / `var|let|const NAME = {...}`
/// の右辺を取り出す。代入がなければ None
pub fn extract_binding(source: &str, name: &str) -> CommonResult<Option<Value>> {
    lazy_static::lazy_static! {
        static ref ASSIGNMENT_RE: Regex = Regex::new(
            r"(?m)(?:\b(?:window|globalThis|self)\s*\.\s*|\b(?:var|let|const)\s+)([A-Za-z_$][\w$]*)\s*=\s*"
        ).unwrap();
    }

    for caps in ASSIGNMENT_RE.captures_iter(source) {
        if &caps[1] != name {
            continue;
        }
        let start = caps.get(0).map(|m| m.end()).unwrap_or(0);
        let rest = &source[start..];
        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
        return match stream.next() {
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(e)) => Err(CommonError::Script(format!(
                "{} no es un objeto JSON válido: {}",
                name, e
            ))),
            None => Ok(None),
        };
    }
    Ok(None)
}

/// シーンを読み込む（フォルダが存在しなければエラー）
pub fn load_from_dir(root: &Path, id: &str) -> Result<LoadedScene> {
    if !root.is_dir() {
        return Err(SceneGuideError::FolderNotFound(root.display().to_string()));
    }
    let mut source = FsSceneSource::new(root);
    Ok(load_scene(id, &mut source)?)
}
