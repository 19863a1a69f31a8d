//! 音声プレイリストと再生状態
//!
//! トラックは優先順に並び、読み込み失敗時のみ前方へ進む（巻き戻らない）。
//! ブラウザの自動再生制限を考慮し、最初のユーザー操作で一度だけ再生を試みる。

use crate::loader::with_cache_buster;
use crate::text::encode_uri;
use crate::types::AudioBlock;

pub const DEFAULT_AUDIO_LABEL: &str = "🎶 Audio";
pub const LABEL_PLAY: &str = "▶ Reproducir";
pub const LABEL_PAUSE: &str = "⏸️ Pausar";

/// 空でないトラック列＋現在位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<String>,
    index: usize,
}

impl Playlist {
    /// 空白を除去し、空要素を捨てる。1件も残らなければ None
    pub fn new<I, S>(tracks: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tracks: Vec<String> = tracks
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if tracks.is_empty() {
            None
        } else {
            Some(Self { tracks, index: 0 })
        }
    }

    /// カンマ区切りの宣言から作成
    pub fn from_declaration(declaration: &str) -> Option<Self> {
        Self::new(declaration.split(','))
    }

    /// ページ宣言 → シーンの音声ブロック → シーン別フォールバック表 の順で解決
    pub fn resolve(
        declaration: Option<&str>,
        scene: Option<&AudioBlock>,
        fallback: &[String],
    ) -> Option<Self> {
        declaration
            .and_then(Self::from_declaration)
            .or_else(|| scene.and_then(|a| Self::new(a.tracks())))
            .or_else(|| Self::new(fallback))
    }

    pub fn current(&self) -> &str {
        &self.tracks[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn tracks(&self) -> &[String] {
        &self.tracks
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.tracks.len()
    }

    /// 次のトラックへ進む。末尾なら None（位置は変えない）
    pub fn advance(&mut self) -> Option<&str> {
        if self.has_next() {
            self.index += 1;
            Some(self.current())
        } else {
            None
        }
    }
}

/// `<audio src>` に設定するURL
pub fn track_url(track: &str, now_ms: u64) -> String {
    with_cache_buster(&encode_uri(track), now_ms)
}

/// 自動再生の試行状況
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Autoplay {
    #[default]
    Pending,
    Attempted,
    /// ブラウザに拒否された（ボタンにヒントを出す）
    Blocked,
    Done,
}

/// 音声コントローラへの入力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    ToggleClicked,
    /// ページ全体での最初のポインタ・キー・タッチ操作
    ///
    /// `on_player` はプレイヤー上での操作（直後のボタン操作に任せる）。
    FirstGesture { on_player: bool },
    Key { space: bool, in_text_input: bool },
    DocumentHidden,
    TrackError,
    Playing,
    Paused,
    PlayRejected,
}

/// 音声要素への指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCommand {
    Play,
    Pause,
    /// ソースを差し替えて再生
    Switch(String),
    /// 全トラック失敗（ログのみ）
    Exhausted,
}

/// 音声コントローラの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioController {
    pub playlist: Playlist,
    pub paused: bool,
    pub autoplay: Autoplay,
}

impl AudioController {
    pub fn new(playlist: Playlist) -> Self {
        Self {
            playlist,
            paused: true,
            autoplay: Autoplay::Pending,
        }
    }

    fn toggle(&self) -> AudioCommand {
        if self.paused {
            AudioCommand::Play
        } else {
            AudioCommand::Pause
        }
    }

    pub fn handle(&mut self, event: AudioEvent) -> Option<AudioCommand> {
        match event {
            AudioEvent::ToggleClicked => Some(self.toggle()),
            AudioEvent::Key {
                space: true,
                in_text_input: false,
            } => Some(self.toggle()),
            AudioEvent::Key { .. } => None,
            AudioEvent::FirstGesture { on_player: true } => {
                if self.autoplay == Autoplay::Pending {
                    self.autoplay = Autoplay::Done;
                }
                None
            }
            AudioEvent::FirstGesture { on_player: false } => {
                if self.autoplay == Autoplay::Pending && self.paused {
                    self.autoplay = Autoplay::Attempted;
                    Some(AudioCommand::Play)
                } else {
                    None
                }
            }
            AudioEvent::DocumentHidden if !self.paused => Some(AudioCommand::Pause),
            AudioEvent::DocumentHidden => None,
            AudioEvent::TrackError => match self.playlist.advance() {
                Some(next) => Some(AudioCommand::Switch(next.to_string())),
                None => {
                    self.paused = true;
                    Some(AudioCommand::Exhausted)
                }
            },
            AudioEvent::Playing => {
                self.paused = false;
                self.autoplay = Autoplay::Done;
                None
            }
            AudioEvent::Paused => {
                self.paused = true;
                None
            }
            AudioEvent::PlayRejected => {
                if self.autoplay == Autoplay::Attempted {
                    self.autoplay = Autoplay::Blocked;
                }
                None
            }
        }
    }

    pub fn button_label(&self) -> &'static str {
        if self.paused {
            LABEL_PLAY
        } else {
            LABEL_PAUSE
        }
    }

    pub fn needs_hint(&self) -> bool {
        self.autoplay == Autoplay::Blocked
    }
}
