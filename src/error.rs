use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneGuideError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    /// 全候補失敗（メッセージはページ表示と同じ文言）
    #[error("{0}")]
    SceneNotFound(String),

    #[error("不正なフィルタ指定: {0}")]
    InvalidFilter(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Common(scene_guide_common::Error),
}

impl From<scene_guide_common::Error> for SceneGuideError {
    fn from(error: scene_guide_common::Error) -> Self {
        match error {
            scene_guide_common::Error::LoadFailed(message) => SceneGuideError::SceneNotFound(message),
            scene_guide_common::Error::Io(e) => SceneGuideError::Io(e),
            scene_guide_common::Error::Json(e) => SceneGuideError::JsonParse(e),
            other => SceneGuideError::Common(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, SceneGuideError>;
