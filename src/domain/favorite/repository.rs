use super::model::FavoriteRecord;
use crate::types::{InfraError, InfraResult};
use sqlx::SqlitePool;

/// お気に入りテーブルの操作失敗
pub type StorageError = InfraError;

/// お気に入りテーブルへのアクセス
///
/// すべての操作はユーザーIDで絞り込まれ、1回の呼び出しが1つの文で完結する。
#[derive(Debug, Clone)]
pub struct FavoriteRepository {
    pool: SqlitePool,
}

impl FavoriteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// お気に入りを追加する。
    /// 同じ記事の重複登録も新しいレコードとして保存する。
    pub async fn add(&self, user_id: &str, title: &str, link: &str) -> InfraResult<FavoriteRecord> {
        sqlx::query_as::<_, FavoriteRecord>(
            r#"
            INSERT INTO favorites (user_id, title, link)
            VALUES (?, ?, ?)
            RETURNING id, user_id, title, link, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(link)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| InfraError::database_query("お気に入りの追加", e))
    }

    /// ユーザーのお気に入りを新しい順に取得する
    pub async fn list(&self, user_id: &str) -> InfraResult<Vec<FavoriteRecord>> {
        sqlx::query_as::<_, FavoriteRecord>(
            r#"
            SELECT id, user_id, title, link, created_at
            FROM favorites
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| InfraError::database_query("お気に入りの取得", e))
    }

    /// IDと所有ユーザーが両方一致する場合のみ削除する。
    /// 削除した行があればtrueを返す。
    pub async fn remove(&self, user_id: &str, favorite_id: i64) -> InfraResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = ? AND user_id = ?")
            .bind(favorite_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| InfraError::database_query("お気に入りの削除", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// ユーザーのお気に入り件数
    pub async fn count(&self, user_id: &str) -> InfraResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM favorites WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| InfraError::database_query("お気に入り件数の取得", e))
    }
}
