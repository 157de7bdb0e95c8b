use crate::types::{InfraError, InfraResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// データベース接続プールを作成
/// ファイルが存在しない場合は親ディレクトリごと作成します
pub async fn create_pool(database_url: &str) -> InfraResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(InfraError::database_connection)?
        .create_if_missing(true);

    if let Some(db_file) = database_file_path(database_url) {
        ensure_parent_dir(&db_file)?;
    }

    SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .map_err(InfraError::database_connection)
}

/// データベースの初期化（マイグレーション実行）
pub async fn initialize_database(pool: &SqlitePool) -> InfraResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(InfraError::migration)
}

/// プールの作成とデータベース初期化を一括で行う便利関数
pub async fn setup_database(database_url: &str) -> InfraResult<SqlitePool> {
    let pool = create_pool(database_url).await?;
    initialize_database(&pool).await?;
    Ok(pool)
}

/// マイグレーション済みのインメモリDBを作成（テスト用）
///
/// インメモリDBは接続ごとに別物になるため、接続を1本に固定して使い回す。
pub async fn create_memory_pool() -> InfraResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .map_err(InfraError::database_connection)?;
    initialize_database(&pool).await?;
    Ok(pool)
}

/// `sqlite://path?opts` 形式のURLからファイルパスを取り出す
/// インメモリDBの場合はNone
fn database_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

fn ensure_parent_dir(db_file: &Path) -> InfraResult<()> {
    match db_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => std::fs::create_dir_all(dir)
            .map_err(|e| InfraError::file_system(dir.display().to_string(), e)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_pool_has_favorites_table() {
        let pool = create_memory_pool().await.expect("インメモリDBの作成に失敗");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites")
            .fetch_one(&pool)
            .await
            .expect("favoritesテーブルが存在しない");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_setup_database_creates_file_and_directory() {
        let dir = std::env::temp_dir().join(format!("newser-db-test-{}", std::process::id()));
        let db_path = dir.join("nested").join("newser.db");
        let url = format!("sqlite://{}", db_path.display());

        let pool = setup_database(&url).await.expect("DBセットアップに失敗");
        assert!(db_path.exists(), "DBファイルが作成されていない");

        // 2回目のマイグレーションは何もしない
        initialize_database(&pool).await.expect("再マイグレーションに失敗");

        pool.close().await;
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_database_file_path() {
        assert_eq!(
            database_file_path("sqlite://data/newser.db"),
            Some(PathBuf::from("data/newser.db"))
        );
        assert_eq!(
            database_file_path("sqlite:newser.db?mode=rwc"),
            Some(PathBuf::from("newser.db"))
        );
        assert_eq!(database_file_path("sqlite::memory:"), None);
        assert_eq!(database_file_path("postgres://localhost/db"), None);
    }
}
