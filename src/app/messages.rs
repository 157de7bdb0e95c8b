//! ユーザーに返すチャットメッセージの文言

use crate::domain::article::Article;

/// コマンド名（プレフィックスの後ろ）
pub const NEWS_COMMAND: &str = "news";
/// `news dodaj` の短縮コマンド
pub const FAV_COMMAND: &str = "fav";

pub const NO_SEARCH_RESULTS: &str = "Brak wyników dla podanego zapytania.";
pub const NO_REWRITE_RESULTS: &str = "Brak wyników do redakcji.";
pub const INVALID_ARTICLE_INDEX: &str = "Nieprawidłowy numer wiadomości.";
pub const INVALID_REWRITE_INDEX: &str = "Nieprawidłowy numer wiadomości do redakcji.";
pub const INVALID_FAVORITE_ID: &str = "Nieprawidłowy numer wiadomości lub brak ulubionych.";
pub const NO_FAVORITES: &str = "Nie masz jeszcze żadnych ulubionych wiadomości.";

/// `!news` 単体で呼ばれたときの使い方
pub fn usage(prefix: &str) -> String {
    let cmd = format!("{}{}", prefix, NEWS_COMMAND);
    format!(
        "Użycie: `{cmd} <temat>` | `{cmd} <temat> [liczba]` | `{cmd} help` | `{cmd} redaguj <temat>` | `{cmd} redaguj <numer>` | `{cmd} ulubione` | `{cmd} dodaj <numer>` | `{cmd} usun <numer>`"
    )
}

pub fn help(prefix: &str) -> String {
    let cmd = format!("{}{}", prefix, NEWS_COMMAND);
    format!(
        "**Pomoc - Komendy {cmd}:**\n\
         `{cmd} <temat>` - Wyszukaj najnowsze wiadomości na dany temat (domyślnie 3 artykuły).\n\
         `{cmd} <temat> [liczba]` - Wyszukaj określoną liczbę wiadomości (1-10) na dany temat.\n\
         `{cmd} redaguj <temat>` - Pobierz wiadomości i zredaguj ich treść za pomocą AI.\n\
         `{cmd} redaguj <numer>` - Zredaguj wiadomość z ostatnio wyświetlonych wyników.\n\
         `{cmd} ulubione` - Zobacz swoje zapisane ulubione wiadomości.\n\
         `{cmd} dodaj <numer>` - Dodaj wskazaną wiadomość z listy do ulubionych.\n\
         `{cmd} usun <numer>` - Usuń wskazaną wiadomość z listy ulubionych."
    )
}

pub fn remove_usage(prefix: &str) -> String {
    format!("Użycie: `{}{} usun <numer>`", prefix, NEWS_COMMAND)
}

pub fn add_usage(prefix: &str) -> String {
    format!("Użycie: `{}{} dodaj <numer>`", prefix, NEWS_COMMAND)
}

pub fn rewrite_usage(prefix: &str) -> String {
    let cmd = format!("{}{}", prefix, NEWS_COMMAND);
    format!("Użycie: `{cmd} redaguj <temat>` lub `{cmd} redaguj <numer>`")
}

/// 検索結果の1件（1始まりの位置を含む）
pub fn search_result(prefix: &str, position: usize, article: &Article) -> String {
    format!(
        "🔖 **{}**\n🔗 {}\nDodaj do ulubionych: `{}{} dodaj {}`",
        article.display_title(),
        article.link,
        prefix,
        NEWS_COMMAND,
        position
    )
}

pub fn rewritten(text: &str, link: &str) -> String {
    format!("🎨 **Zredagowana wersja:**\n{}\n🔗 {}", text, link)
}

pub fn favorite_added(title: &str) -> String {
    format!("Dodano do ulubionych: **{}**", title)
}

pub fn favorite_removed(id: i64) -> String {
    format!("Usunięto z ulubionych wpis #{}.", id)
}

/// 記事検索に失敗した
pub fn fetch_failure(error: &anyhow::Error) -> String {
    format!("Błąd podczas pobierania danych: {:#}", error)
}

/// 番号指定の書き換えに失敗した
pub fn rewrite_failure(error: &anyhow::Error) -> String {
    format!("Błąd podczas redagowania: {:#}", error)
}

/// トピック指定の書き換え（検索を含む）に失敗した
pub fn edit_failure(error: &anyhow::Error) -> String {
    format!("Błąd podczas redakcji: {:#}", error)
}

pub fn storage_failure(error: &dyn std::error::Error) -> String {
    format!("Błąd bazy danych: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_uses_prefix() {
        let text = help("?");
        assert!(text.starts_with("**Pomoc - Komendy ?news:**"));
        assert!(text.contains("`?news ulubione`"));
        assert!(!text.contains("!news"));
    }

    #[test]
    fn test_help_lines() {
        let text = help("!");
        assert!(text.contains(
            "`!news <temat> [liczba]` - Wyszukaj określoną liczbę wiadomości (1-10) na dany temat."
        ));
        assert!(text.contains(
            "`!news redaguj <temat>` - Pobierz wiadomości i zredaguj ich treść za pomocą AI."
        ));
        assert!(text.ends_with("`!news usun <numer>` - Usuń wskazaną wiadomość z listy ulubionych."));
    }

    #[test]
    fn test_search_result_format() {
        let article = Article::new("Title1", "link1");
        assert_eq!(
            search_result("!", 1, &article),
            "🔖 **Title1**\n🔗 link1\nDodaj do ulubionych: `!news dodaj 1`"
        );
    }

    #[test]
    fn test_failure_messages_include_error_chain() {
        let err = anyhow::anyhow!("API Error").context("newsdata.ioへのリクエストに失敗");
        let text = fetch_failure(&err);
        assert!(text.starts_with("Błąd podczas pobierania danych"));
        assert!(text.contains("API Error"));
    }

    #[test]
    fn test_storage_failure() {
        let err = crate::types::InfraError::unexpected_response("disk full");
        assert!(storage_failure(&err).starts_with("Błąd bazy danych: "));
        assert!(storage_failure(&err).contains("disk full"));
    }
}
