//! ユーザーごとに直近の検索結果を保持するセッションキャッシュ
//!
//! プロセスの生存期間中のみ有効で、永続化はしない。
//! 新しい検索のたびにユーザーのエントリは丸ごと置き換えられる。

use super::article::Article;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// セッション参照のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 1始まりの番号が直近の検索結果の範囲外
    #[error("不正な記事番号です: {index} (表示済み{available}件)")]
    InvalidIndex { index: usize, available: usize },
}

type SessionMap = HashMap<String, Vec<Article>>;

/// ユーザーID → 直近に表示した記事リスト
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    entries: Arc<RwLock<SessionMap>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存のマップを初期状態として使うキャッシュを作成
    pub fn with_entries(entries: SessionMap) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// ユーザーの記事リストを無条件に置き換える
    pub async fn record(&self, user_id: &str, articles: Vec<Article>) {
        let mut entries = self.entries.write().await;
        entries.insert(user_id.to_string(), articles);
    }

    /// 1始まりの番号で記事を取得する
    pub async fn get(&self, user_id: &str, index: usize) -> Result<Article, SessionError> {
        let entries = self.entries.read().await;
        let articles = entries.get(user_id).map(Vec::as_slice).unwrap_or_default();

        index
            .checked_sub(1)
            .and_then(|i| articles.get(i))
            .cloned()
            .ok_or(SessionError::InvalidIndex {
                index,
                available: articles.len(),
            })
    }

    /// ユーザーの直近の記事件数
    pub async fn len(&self, user_id: &str) -> usize {
        self.entries
            .read()
            .await
            .get(user_id)
            .map_or(0, Vec::len)
    }

    /// キャッシュに登録されているユーザー数
    pub async fn user_count(&self) -> usize {
        self.entries.read().await.len()
    }
}
