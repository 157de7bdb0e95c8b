//! Discordボットとしての入出力
pub mod handler;

pub use handler::{parse_news_invocation, respond, route_body, Handler};
