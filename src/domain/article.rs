use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// タイトルが欠けている記事の表示名
pub const MISSING_TITLE: &str = "Brak tytułu";

/// 検索で得られたニュース記事
///
/// セッションキャッシュにのみ保持され、永続化はされない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: Option<String>,
    /// 記事の説明。説明が無い場合は本文で代用される
    pub description: Option<String>,
    pub link: String,
}

impl Article {
    pub fn new<T: Into<String>, L: Into<String>>(title: T, link: L) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
            link: link.into(),
        }
    }

    pub fn with_description<D: Into<String>>(mut self, description: D) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 表示用のタイトル（欠けている場合は既定の文言）
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(MISSING_TITLE)
    }

    /// 書き換え用のタイトル（欠けている場合は空文字）
    pub fn prompt_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn prompt_description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// 記事検索の抽象化トレイト
///
/// 本番ではnewsdata.ioクライアント、テストではモックを注入する。
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// トピックで記事を検索し、最大 `count` 件を順序通りに返す
    ///
    /// 結果が無い場合は空のVecを返す。
    async fn search(&self, topic: &str, count: usize) -> Result<Vec<Article>>;
}

/// テスト用のモック記事ソース
///
/// 定義済みの記事を返し、受け取った (トピック, 件数) を記録する。
pub struct MockArticleSource {
    articles: Vec<Article>,
    error_message: Option<String>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl MockArticleSource {
    /// 指定した記事を返すモックを作成
    pub fn new_success(articles: Vec<Article>) -> Self {
        Self {
            articles,
            error_message: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 常に失敗するモックを作成
    pub fn new_error(error_message: &str) -> Self {
        Self {
            articles: Vec::new(),
            error_message: Some(error_message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// これまでの呼び出し (トピック, 件数)
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ArticleSource for MockArticleSource {
    async fn search(&self, topic: &str, count: usize) -> Result<Vec<Article>> {
        if let Ok(mut guard) = self.calls.lock() {
            guard.push((topic.to_string(), count));
        }
        match &self.error_message {
            Some(message) => Err(anyhow::anyhow!("{}", message)),
            None => Ok(self.articles.iter().take(count).cloned().collect()),
        }
    }
}
