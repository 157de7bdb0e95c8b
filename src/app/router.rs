//! `news` コマンドの解析と振り分け
//!
//! メッセージ本文（`<prefix>news` の後ろ）を1つのコマンドとして解釈し、
//! 記事検索・セッション・お気に入り・書き換えの各処理に振り分ける。
//! 返り値はユーザーに順に送るメッセージの列。

use super::messages;
use crate::domain::article::{Article, ArticleSource};
use crate::domain::favorite::{format_favorite, FavoriteRepository};
use crate::domain::rewrite::{rewrite_article, Rewriter};
use crate::domain::session::SessionCache;
use crate::types::InfraResult;
use std::sync::Arc;
use tracing::{info, warn};

/// 件数指定が無い検索で要求する記事数
pub const DEFAULT_ARTICLE_COUNT: usize = 3;
pub const MIN_ARTICLE_COUNT: usize = 1;
pub const MAX_ARTICLE_COUNT: usize = 10;

/// 解析済みの `news` サブコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsCommand {
    /// 本文が空
    Usage,
    Help,
    /// `usun <id>`。数値でなければNone
    RemoveFavorite(Option<i64>),
    /// `redaguj` の後ろが空
    RewriteUsage,
    /// `redaguj <n>`（nは数字のみ）
    RewriteByNumber(usize),
    /// `redaguj <topic>`
    RewriteByTopic(String),
    ShowFavorites,
    /// `dodaj <n>`。数値でなければNone
    AddFavorite(Option<i64>),
    Search { topic: String, count: usize },
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// 先頭のキーワードを大文字小文字を無視して取り除き、残りを返す
fn strip_keyword<'a>(body: &'a str, keyword: &str) -> Option<&'a str> {
    body.get(..keyword.len())
        .filter(|head| head.eq_ignore_ascii_case(keyword))
        .map(|_| body[keyword.len()..].trim())
}

/// 検索本文からトピックと件数を取り出す
///
/// 2語以上で最後の語が数字のみの場合は件数として扱い、[1, 10] に丸める。
pub fn parse_search(body: &str) -> (String, usize) {
    let parts: Vec<&str> = body.split_whitespace().collect();
    match parts.split_last() {
        Some((last, rest)) if !rest.is_empty() && is_all_digits(last) => {
            let count = last
                .parse::<usize>()
                .map(|n| n.clamp(MIN_ARTICLE_COUNT, MAX_ARTICLE_COUNT))
                .unwrap_or(MAX_ARTICLE_COUNT);
            (rest.join(" "), count)
        }
        _ => (body.trim().to_string(), DEFAULT_ARTICLE_COUNT),
    }
}

/// メッセージ本文をコマンドに変換する
pub fn parse_command(body: &str) -> NewsCommand {
    let body = body.trim();
    if body.is_empty() {
        return NewsCommand::Usage;
    }
    if body.eq_ignore_ascii_case("help") {
        return NewsCommand::Help;
    }
    if let Some(rest) = strip_keyword(body, "usun") {
        return NewsCommand::RemoveFavorite(rest.parse().ok());
    }
    if let Some(rest) = strip_keyword(body, "redaguj") {
        return if rest.is_empty() {
            NewsCommand::RewriteUsage
        } else if is_all_digits(rest) {
            // 桁あふれは範囲外の番号として扱う
            NewsCommand::RewriteByNumber(rest.parse().unwrap_or(0))
        } else {
            NewsCommand::RewriteByTopic(rest.to_string())
        };
    }
    if body.eq_ignore_ascii_case("ulubione") {
        return NewsCommand::ShowFavorites;
    }
    if let Some(rest) = strip_keyword(body, "dodaj") {
        return NewsCommand::AddFavorite(rest.parse().ok());
    }

    let (topic, count) = parse_search(body);
    NewsCommand::Search { topic, count }
}

/// `news` コマンドのディスパッチャ
///
/// 状態はセッションキャッシュとお気に入りテーブルのみで、
/// 複数ユーザーのコマンドを並行して処理できる。
pub struct NewsRouter {
    sessions: SessionCache,
    favorites: FavoriteRepository,
    source: Arc<dyn ArticleSource>,
    rewriter: Arc<dyn Rewriter>,
    prefix: String,
}

impl NewsRouter {
    pub fn new(
        sessions: SessionCache,
        favorites: FavoriteRepository,
        source: Arc<dyn ArticleSource>,
        rewriter: Arc<dyn Rewriter>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            favorites,
            source,
            rewriter,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn sessions(&self) -> &SessionCache {
        &self.sessions
    }

    pub fn favorites(&self) -> &FavoriteRepository {
        &self.favorites
    }

    /// 1件のメッセージ本文を処理し、返信メッセージの列を返す
    ///
    /// 入力ミスや外部APIの失敗は返信文に変換される。
    /// お気に入りテーブルへのアクセス失敗のみエラーとして返す。
    pub async fn handle(&self, user_id: &str, body: &str) -> InfraResult<Vec<String>> {
        let command = parse_command(body);
        info!(user_id, ?command, "newsコマンド受信");

        let replies = match command {
            NewsCommand::Usage => vec![messages::usage(&self.prefix)],
            NewsCommand::Help => vec![messages::help(&self.prefix)],
            NewsCommand::RemoveFavorite(None) => vec![messages::remove_usage(&self.prefix)],
            NewsCommand::RemoveFavorite(Some(id)) => self.remove_favorite(user_id, id).await?,
            NewsCommand::RewriteUsage => vec![messages::rewrite_usage(&self.prefix)],
            NewsCommand::RewriteByNumber(index) => self.rewrite_by_number(user_id, index).await,
            NewsCommand::RewriteByTopic(topic) => self.rewrite_by_topic(&topic).await,
            NewsCommand::ShowFavorites => self.show_favorites(user_id).await?,
            NewsCommand::AddFavorite(None) => vec![messages::add_usage(&self.prefix)],
            NewsCommand::AddFavorite(Some(index)) => self.add_favorite(user_id, index).await?,
            NewsCommand::Search { topic, count } => self.search(user_id, &topic, count).await,
        };
        Ok(replies)
    }

    async fn search(&self, user_id: &str, topic: &str, count: usize) -> Vec<String> {
        let mut articles = match self.source.search(topic, count).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(user_id, topic, error = %format!("{:#}", e), "記事検索に失敗");
                return vec![messages::fetch_failure(&e)];
            }
        };
        if articles.is_empty() {
            return vec![messages::NO_SEARCH_RESULTS.to_string()];
        }
        articles.truncate(count);

        let replies = articles
            .iter()
            .enumerate()
            .map(|(i, article)| messages::search_result(&self.prefix, i + 1, article))
            .collect();
        self.sessions.record(user_id, articles).await;
        replies
    }

    async fn rewrite_by_number(&self, user_id: &str, index: usize) -> Vec<String> {
        let article = match self.sessions.get(user_id, index).await {
            Ok(article) => article,
            Err(_) => return vec![messages::INVALID_REWRITE_INDEX.to_string()],
        };

        match rewrite_article(self.rewriter.as_ref(), &article).await {
            Ok(text) => vec![messages::rewritten(&text, &article.link)],
            Err(e) => {
                warn!(user_id, index, error = %format!("{:#}", e), "書き換えに失敗");
                vec![messages::rewrite_failure(&e)]
            }
        }
    }

    async fn rewrite_by_topic(&self, topic: &str) -> Vec<String> {
        let found = match self.source.search(topic, 1).await {
            Ok(articles) => articles.into_iter().next(),
            Err(e) => {
                warn!(topic, error = %format!("{:#}", e), "書き換え用の記事検索に失敗");
                return vec![messages::edit_failure(&e)];
            }
        };
        let Some(article) = found else {
            return vec![messages::NO_REWRITE_RESULTS.to_string()];
        };

        match rewrite_article(self.rewriter.as_ref(), &article).await {
            Ok(text) => vec![messages::rewritten(&text, &article.link)],
            Err(e) => {
                warn!(topic, error = %format!("{:#}", e), "書き換えに失敗");
                vec![messages::edit_failure(&e)]
            }
        }
    }

    async fn show_favorites(&self, user_id: &str) -> InfraResult<Vec<String>> {
        let records = self.favorites.list(user_id).await?;
        if records.is_empty() {
            return Ok(vec![messages::NO_FAVORITES.to_string()]);
        }
        Ok(records.iter().map(format_favorite).collect())
    }

    async fn add_favorite(&self, user_id: &str, index: i64) -> InfraResult<Vec<String>> {
        let article: Option<Article> = match usize::try_from(index) {
            Ok(index) => self.sessions.get(user_id, index).await.ok(),
            Err(_) => None,
        };
        let Some(article) = article else {
            return Ok(vec![messages::INVALID_ARTICLE_INDEX.to_string()]);
        };

        let record = self
            .favorites
            .add(user_id, article.display_title(), &article.link)
            .await?;
        info!(user_id, favorite_id = record.id, "お気に入りを追加");
        Ok(vec![messages::favorite_added(&record.title)])
    }

    async fn remove_favorite(&self, user_id: &str, id: i64) -> InfraResult<Vec<String>> {
        if self.favorites.remove(user_id, id).await? {
            info!(user_id, favorite_id = id, "お気に入りを削除");
            Ok(vec![messages::favorite_removed(id)])
        } else {
            Ok(vec![messages::INVALID_FAVORITE_ID.to_string()])
        }
    }
}
