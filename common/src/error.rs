//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Script error: {0}")]
    Script(String),

    /// 全候補の読み込みに失敗（ユーザー向けメッセージをそのまま保持）
    #[error("{0}")]
    LoadFailed(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_script() {
        let error = Error::Script("El JS no definió __SCENE__ ni CONFIG_ESCENA".to_string());
        assert_eq!(
            format!("{}", error),
            "Script error: El JS no definió __SCENE__ ni CONFIG_ESCENA"
        );
    }

    #[test]
    fn test_load_failed_displays_message_verbatim() {
        let error = Error::LoadFailed("⚠ No pude cargar la escena".to_string());
        assert_eq!(format!("{}", error), "⚠ No pude cargar la escena");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
