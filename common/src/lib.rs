//! Scene Guide Common Library
//!
//! CLIとWeb(WASM)で共有されるシーン記述・カード・フィルタ・プレイリスト

pub mod types;
pub mod error;
pub mod text;
pub mod card;
pub mod builder;
pub mod filter;
pub mod playlist;
pub mod page_config;
pub mod resources;
pub mod loader;

pub use types::SceneDescription;
pub use error::{Error, Result};
pub use card::{make_card, Block, Card, CardEvent, CardDef, CollapseState, Region};
pub use builder::build_cards;
pub use filter::{apply_filters, storage_key, ChipBoard, ChipEvent, Dimension, FilterState};
pub use playlist::{AudioCommand, AudioController, AudioEvent, Playlist};
pub use page_config::PageConfig;
pub use resources::{refresh_resource_card, resolve_resources, ResourceEntry};
pub use loader::{load_scene, LoadedScene, SceneSource, ScriptBindings};
