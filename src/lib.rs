//! Scene Guide CLI Library
//!
//! シーンフォルダの走査・読み込み・検査・静的HTML出力

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod render;
pub mod scanner;
pub mod validate;
