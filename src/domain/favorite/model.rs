use chrono::NaiveDateTime;
use sqlx::FromRow;

// お気に入りエンティティ（テーブル定義と一致）
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FavoriteRecord {
    /// 永続的な通し番号。削除時は所有ユーザーと組で指定する
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub link: String,
    pub created_at: NaiveDateTime,
}

/// お気に入り一覧の1件分をチャット表示用に整形する
pub fn format_favorite(record: &FavoriteRecord) -> String {
    format!("#{} 🔖 **{}**\n🔗 {}", record.id, record.title, record.link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_favorite_shows_id_title_and_link() {
        let record = FavoriteRecord {
            id: 7,
            user_id: "123".to_string(),
            title: "Reforma edukacji 2023".to_string(),
            link: "https://www.newsweek.pl/reforma".to_string(),
            created_at: NaiveDateTime::default(),
        };

        assert_eq!(
            format_favorite(&record),
            "#7 🔖 **Reforma edukacji 2023**\n🔗 https://www.newsweek.pl/reforma"
        );
    }
}
