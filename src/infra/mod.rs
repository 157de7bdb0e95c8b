//! インフラストラクチャ層
//!
//! - api: 外部HTTP API（newsdata.io、Gemini）とHTTPクライアント抽象
//! - db: SQLite接続プールとマイグレーション

pub mod api;
pub mod db;
