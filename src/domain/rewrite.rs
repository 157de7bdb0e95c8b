use super::article::Article;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// 生成時の温度
pub const REWRITE_TEMPERATURE: f64 = 0.5;
/// 生成する最大トークン数
pub const REWRITE_MAX_OUTPUT_TOKENS: u32 = 1000;

/// 記事を書き換える生成AIの抽象化トレイト
#[async_trait]
pub trait Rewriter: Send + Sync {
    /// 組み立て済みのプロンプトから短い書き換え文を生成する
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// タイトルと説明から書き換え文を生成する
    async fn rewrite(&self, title: &str, description: &str) -> Result<String> {
        self.generate(&build_rewrite_prompt(title, description))
            .await
    }
}

/// 書き換え用のプロンプトを組み立てる
pub fn build_rewrite_prompt(title: &str, description: &str) -> String {
    format!(
        "Zredaguj tę wiadomość w bardziej przystępny i naturalny sposób:\nTytuł: {}\nOpis: {} \n Wypisz tylko wersję krótką i chwytliwą.",
        title, description
    )
}

/// 記事をそのまま書き換えにかける
pub async fn rewrite_article(rewriter: &dyn Rewriter, article: &Article) -> Result<String> {
    rewriter
        .rewrite(article.prompt_title(), article.prompt_description())
        .await
}

/// テスト用のモック書き換えクライアント
pub struct MockRewriter {
    response: String,
    error_message: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockRewriter {
    /// 常に同じ文を返すモックを作成
    pub fn new_success(response: &str) -> Self {
        Self {
            response: response.to_string(),
            error_message: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// 常に失敗するモックを作成
    pub fn new_error(error_message: &str) -> Self {
        Self {
            response: String::new(),
            error_message: Some(error_message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// 受け取ったプロンプトの一覧
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Rewriter for MockRewriter {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if let Ok(mut guard) = self.prompts.lock() {
            guard.push(prompt.to_string());
        }
        match &self.error_message {
            Some(message) => Err(anyhow::anyhow!("{}", message)),
            None => Ok(self.response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_title_and_description() {
        let prompt = build_rewrite_prompt("Debata w Sejmie", "Burzliwa debata");
        assert!(prompt.starts_with("Zredaguj tę wiadomość"));
        assert!(prompt.contains("Tytuł: Debata w Sejmie\n"));
        assert!(prompt.contains("Opis: Burzliwa debata \n"));
        assert!(prompt.ends_with("Wypisz tylko wersję krótką i chwytliwą."));
    }

    #[tokio::test]
    async fn test_rewrite_article_uses_empty_fallbacks() {
        let rewriter = MockRewriter::new_success("krótko");
        let article = Article {
            title: None,
            description: None,
            link: "https://example.com".to_string(),
        };

        let text = rewrite_article(&rewriter, &article).await.unwrap();
        assert_eq!(text, "krótko");
        assert!(rewriter.prompts()[0].contains("Tytuł: \n"));
    }

    #[tokio::test]
    async fn test_mock_rewriter_error() {
        let rewriter = MockRewriter::new_error("Gemini niedostępne");
        let err = rewriter.rewrite("t", "d").await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini niedostępne");
        assert_eq!(rewriter.prompts().len(), 1);
    }
}
