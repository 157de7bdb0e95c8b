use super::http::HttpClient;
use crate::domain::article::{Article, ArticleSource};
use crate::types::{InfraError, InfraResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// newsdata.io の既定エンドポイント
pub const DEFAULT_NEWSDATA_BASE_URL: &str = "https://newsdata.io";
/// 検索対象の言語
pub const NEWS_LANGUAGE: &str = "pl";

// newsdata.io の results 配列の1要素
#[derive(Debug, Deserialize)]
struct NewsdataArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    link: Option<String>,
}

impl From<NewsdataArticle> for Article {
    fn from(raw: NewsdataArticle) -> Self {
        Article {
            title: raw.title,
            description: raw.description.or(raw.content),
            link: raw.link.unwrap_or_default(),
        }
    }
}

/// newsdata.io のレスポンス本文を記事リストに変換する
///
/// `results` が配列でない（欠落・エラー応答など）場合は空のリストを返す。
/// 配列内の形式が崩れた要素は読み飛ばす。
pub fn parse_newsdata_response(body: &str) -> InfraResult<Vec<Article>> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| InfraError::serialization("newsdata.ioレスポンスの解析", e))?;

    let articles: Vec<Article> = json
        .get("results")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(
                    |(i, item)| match serde_json::from_value::<NewsdataArticle>(item.clone()) {
                        Ok(raw) => Some(Article::from(raw)),
                        Err(e) => {
                            warn!(position = i, error = %e, "形式が不正な記事を読み飛ばしました");
                            None
                        }
                    },
                )
                .collect()
        })
        .unwrap_or_default();

    Ok(articles)
}

/// newsdata.io を使った記事検索クライアント
pub struct NewsdataClient {
    http: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_secs: u64,
}

impl NewsdataClient {
    pub fn new(http: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_NEWSDATA_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// エンドポイントを差し替える（モックサーバー向け）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/api/1/news", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ArticleSource for NewsdataClient {
    async fn search(&self, topic: &str, count: usize) -> Result<Vec<Article>> {
        let url = self.endpoint();
        let query = [
            ("apikey", self.api_key.as_str()),
            ("q", topic),
            ("language", NEWS_LANGUAGE),
        ];

        let body = self
            .http
            .get_text(&url, &query, self.timeout_secs)
            .await
            .context("newsdata.ioへのリクエストに失敗")?;

        let mut articles = parse_newsdata_response(&body)?;
        articles.truncate(count);
        debug!(topic, count, found = articles.len(), "newsdata.io検索完了");
        Ok(articles)
    }
}
