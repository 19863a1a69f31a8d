//! シーン読み込みの候補チェーン
//!
//! 候補（JSON 2件 → スクリプト 2件）を順に試し、最初に成功したものを返す。
//! 取得手段は `SceneSource` として差し替え可能（ブラウザ / ファイルシステム）。

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::SceneDescription;

/// `?scene=` 未指定時のシーンID
pub const DEFAULT_SCENE_ID: &str = "escena2";

/// スクリプトが設定するグローバル変数（優先順）
pub const SCENE_BINDINGS: [&str; 2] = ["__SCENE__", "CONFIG_ESCENA"];

/// 全候補失敗時に副題とフッターへ表示する文言
pub const LOAD_FAILURE_MESSAGE: &str = "⚠ No pude cargar la escena. Verifica el nombre (?scene=...), la ruta del archivo y que no abras como file://";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// 構造化データ（JSON）
    Data,
    /// 実行可能スクリプト
    Script,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: String,
    pub kind: CandidateKind,
}

/// 試行順の候補一覧
pub fn candidate_locations(id: &str) -> Vec<Candidate> {
    let data = |path: String| Candidate {
        path,
        kind: CandidateKind::Data,
    };
    let script = |path: String| Candidate {
        path,
        kind: CandidateKind::Script,
    };
    vec![
        data(format!("escenas/{}.json", id)),
        data(format!("{}.json", id)),
        script(format!("escenas/{}.js", id)),
        script(format!("{}.js", id)),
    ]
}

/// キャッシュ無効化用のクエリを付与
pub fn with_cache_buster(path: &str, now_ms: u64) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{}{}v={}", path, sep, now_ms)
}

/// クエリ値のデコード（`+` は空白、`%XX` を戻す。不正なUTF-8はそのまま）
fn decode_query_value(raw: &str) -> String {
    let plus = raw.replace('+', " ");
    match urlencoding::decode(&plus) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            log::debug!("query value '{}' not decoded: {}", raw, e);
            plus
        }
    }
}

/// `location.search` からシーンIDを取り出す
pub fn scene_id_from_search(search: &str) -> String {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "scene")
        .map(|(_, value)| decode_query_value(value).trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_SCENE_ID.to_string())
}

pub fn parse_scene_json(text: &str) -> Result<SceneDescription> {
    SceneDescription::from_json(text)
}

/// スクリプト実行後のグローバル変数からシーンを取り出す
///
/// 未設定（`undefined` / `null`）は未定義として次を見る。
pub fn scene_from_bindings(
    primary: Option<Value>,
    alternate: Option<Value>,
) -> Result<SceneDescription> {
    let value = primary
        .filter(|v| !v.is_null())
        .or(alternate.filter(|v| !v.is_null()))
        .ok_or_else(|| {
            Error::Script(format!(
                "El JS no definió {} ni {}",
                SCENE_BINDINGS[0], SCENE_BINDINGS[1]
            ))
        })?;
    SceneDescription::from_value(value)
}

/// スクリプト実行結果（グローバル変数の値）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptBindings {
    pub scene: Option<Value>,
    pub config_escena: Option<Value>,
}

impl ScriptBindings {
    pub fn into_scene(self) -> Result<SceneDescription> {
        scene_from_bindings(self.scene, self.config_escena)
    }
}

/// 候補の取得手段
pub trait SceneSource {
    /// 構造化データを取得（失敗・非OKはエラー）
    fn fetch_data(&mut self, path: &str) -> Result<String>;

    /// スクリプトを読み込み・実行し、グローバル変数を返す
    fn run_script(&mut self, path: &str) -> Result<ScriptBindings>;
}

/// 読み込み結果
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedScene {
    pub id: String,
    pub candidate: Candidate,
    pub scene: SceneDescription,
}

/// 1候補を試す
pub fn try_candidate<S: SceneSource + ?Sized>(
    source: &mut S,
    candidate: &Candidate,
) -> Result<SceneDescription> {
    match candidate.kind {
        CandidateKind::Data => parse_scene_json(&source.fetch_data(&candidate.path)?),
        CandidateKind::Script => source.run_script(&candidate.path)?.into_scene(),
    }
}

/// 候補を順に試し、全滅なら `Error::LoadFailed`
pub fn load_scene<S: SceneSource + ?Sized>(id: &str, source: &mut S) -> Result<LoadedScene> {
    for candidate in candidate_locations(id) {
        match try_candidate(source, &candidate) {
            Ok(scene) => {
                log::info!("scene '{}' loaded from {}", id, candidate.path);
                return Ok(LoadedScene {
                    id: id.to_string(),
                    candidate,
                    scene,
                });
            }
            Err(e) => log::debug!("candidate {} skipped: {}", candidate.path, e),
        }
    }
    Err(Error::LoadFailed(LOAD_FAILURE_MESSAGE.to_string()))
}

/// 副題・フッターに出すステータス（成功時は空）
pub fn status_message<T>(result: &Result<T>) -> String {
    match result {
        Ok(_) => String::new(),
        Err(Error::LoadFailed(message)) => message.clone(),
        Err(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockSource {
        data: HashMap<String, String>,
        scripts: HashMap<String, ScriptBindings>,
        attempts: Vec<String>,
    }

    impl SceneSource for MockSource {
        fn fetch_data(&mut self, path: &str) -> Result<String> {
            self.attempts.push(path.to_string());
            self.data
                .get(path)
                .cloned()
                .ok_or_else(|| Error::Io(std::io::Error::from(std::io::ErrorKind::NotFound)))
        }

        fn run_script(&mut self, path: &str) -> Result<ScriptBindings> {
            self.attempts.push(path.to_string());
            self.scripts
                .get(path)
                .cloned()
                .ok_or_else(|| Error::Script(format!("404 {}", path)))
        }
    }

    #[test]
    fn test_candidate_order() {
        let paths: Vec<String> = candidate_locations("escena5")
            .into_iter()
            .map(|c| c.path)
            .collect();
        assert_eq!(
            paths,
            vec!["escenas/escena5.json", "escena5.json", "escenas/escena5.js", "escena5.js"]
        );
    }

    #[test]
    fn test_cache_buster() {
        assert_eq!(with_cache_buster("a.json", 7), "a.json?v=7");
        assert_eq!(with_cache_buster("a.json?x=1", 7), "a.json?x=1&v=7");
    }

    #[test]
    fn test_scene_id_from_search() {
        assert_eq!(scene_id_from_search("?scene=escena7&x=1"), "escena7");
        assert_eq!(scene_id_from_search("?x=1"), DEFAULT_SCENE_ID);
        assert_eq!(scene_id_from_search("?scene="), DEFAULT_SCENE_ID);
        assert_eq!(scene_id_from_search(""), DEFAULT_SCENE_ID);
    }

    #[test]
    fn test_scene_id_is_decoded() {
        assert_eq!(scene_id_from_search("?scene=escena+2"), "escena 2");
        assert_eq!(scene_id_from_search("?scene=escena%2F2"), "escena/2");
        assert_eq!(scene_id_from_search("?x=1&scene=%C3%B1u"), "ñu");
        assert_eq!(scene_id_from_search("?scene=+"), DEFAULT_SCENE_ID);
    }

    #[test]
    fn test_falls_through_to_second_json_on_parse_error() {
        let mut source = MockSource::default();
        source
            .data
            .insert("escenas/e1.json".to_string(), "{ roto".to_string());
        source
            .data
            .insert("e1.json".to_string(), r#"{"pasos":["Entrar"]}"#.to_string());

        let loaded = load_scene("e1", &mut source).expect("読み込み失敗");
        assert_eq!(loaded.candidate.path, "e1.json");
        assert_eq!(loaded.scene.pasos.unwrap(), vec!["Entrar"]);
    }

    #[test]
    fn test_script_alternate_binding() {
        let mut source = MockSource::default();
        source.scripts.insert(
            "escenas/e2.js".to_string(),
            ScriptBindings {
                scene: None,
                config_escena: Some(json!({ "checklist": ["Micros"] })),
            },
        );
        let loaded = load_scene("e2", &mut source).expect("読み込み失敗");
        assert_eq!(loaded.candidate.kind, CandidateKind::Script);
        assert_eq!(loaded.scene.checklist.unwrap(), vec!["Micros"]);
    }

    #[test]
    fn test_script_without_bindings_is_failure() {
        let mut source = MockSource::default();
        source
            .scripts
            .insert("e3.js".to_string(), ScriptBindings::default());
        let result = load_scene("e3", &mut source);
        assert!(matches!(result, Err(Error::LoadFailed(_))));
        assert_eq!(source.attempts.len(), 4);
    }

    #[test]
    fn test_all_candidates_fail_single_message() {
        let mut source = MockSource::default();
        let result = load_scene("nada", &mut source);
        assert_eq!(status_message(&result), LOAD_FAILURE_MESSAGE);
        assert_eq!(source.attempts.len(), 4);
    }

    #[test]
    fn test_primary_binding_wins() {
        let scene = scene_from_bindings(
            Some(json!({ "pasos": ["uno"] })),
            Some(json!({ "pasos": ["dos"] })),
        )
        .unwrap();
        assert_eq!(scene.pasos.unwrap(), vec!["uno"]);
        assert!(scene_from_bindings(Some(Value::Null), None).is_err());
    }
}
