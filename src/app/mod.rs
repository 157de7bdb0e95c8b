//! アプリケーション層
//!
//! - config: 環境変数からの設定読み込み
//! - messages: ユーザー向けの文言
//! - router: `news` コマンドの解析と振り分け

pub mod config;
pub mod messages;
pub mod router;

pub use config::AppConfig;
pub use router::{parse_command, NewsCommand, NewsRouter};
