//! Discordのメッセージイベントを `news` / `fav` コマンドに橋渡しするハンドラ

use crate::app::messages::{self, FAV_COMMAND, NEWS_COMMAND};
use crate::app::router::NewsRouter;
use serenity::async_trait;
use serenity::client::Context;
use serenity::model::{channel::Message, gateway::Ready};
use serenity::prelude::EventHandler;
use std::sync::Arc;
use tracing::{error, info, warn};

/// `<prefix><command>` の呼び出しなら引数部分を返す
///
/// コマンド名の直後は空白か終端でなければならない（`!newsy` は対象外）。
fn parse_invocation<'a>(prefix: &str, command: &str, content: &'a str) -> Option<&'a str> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    let head = rest.get(..command.len())?;
    if !head.eq_ignore_ascii_case(command) {
        return None;
    }
    let body = &rest[command.len()..];
    match body.chars().next() {
        None => Some(""),
        Some(c) if c.is_whitespace() => Some(body.trim()),
        Some(_) => None,
    }
}

/// メッセージが `<prefix>news` の呼び出しなら本文を返す
pub fn parse_news_invocation<'a>(prefix: &str, content: &'a str) -> Option<&'a str> {
    parse_invocation(prefix, NEWS_COMMAND, content)
}

/// メッセージをルーターに渡す本文に変換する
///
/// `<prefix>fav <n>` は `dodaj <n>` の短縮形として扱う。
pub fn route_body(prefix: &str, content: &str) -> Option<String> {
    if let Some(body) = parse_news_invocation(prefix, content) {
        return Some(body.to_string());
    }
    parse_invocation(prefix, FAV_COMMAND, content).map(|arg| format!("dodaj {}", arg))
}

/// 1件の本文を処理して返信を作る
///
/// DBエラーはログに残し、ユーザーには `Błąd bazy danych` として返す。
pub async fn respond(router: &NewsRouter, user_id: &str, body: &str) -> Vec<String> {
    match router.handle(user_id, body).await {
        Ok(replies) => replies,
        Err(why) => {
            error!(user_id, error = %why, "コマンドの処理中にDBエラー");
            vec![messages::storage_failure(&why)]
        }
    }
}

pub struct Handler {
    router: Arc<NewsRouter>,
}

impl Handler {
    pub fn new(router: Arc<NewsRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Zalogowano jako {}", ready.user.name);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(body) = route_body(self.router.prefix(), &msg.content) else {
            return;
        };
        let user_id = msg.author.id.to_string();

        for reply in respond(&self.router, &user_id, &body).await {
            if let Err(why) = msg.channel_id.say(&ctx.http, reply).await {
                warn!(user_id = %user_id, error = %why, "メッセージの送信に失敗");
            }
        }
    }
}
