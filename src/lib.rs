//! newser: ニュース検索・AIによる書き換え・お気に入り管理を行うDiscordボット
//!
//! バイナリ（`main.rs`）と統合テストの両方から参照できるようにモジュールを公開する。

pub mod app;
pub mod bot;
pub mod domain;
pub mod infra;
pub mod types;
