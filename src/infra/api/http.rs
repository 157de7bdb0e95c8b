use crate::types::InfraError;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

/// HTTPクライアントの抽象化トレイト
///
/// このトレイトは、実際のHTTP通信とモック実装の両方を
/// 統一的に扱えるようにするためのインターフェースです。
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// 指定されたURLにGETし、レスポンス本文をテキストで取得する
    ///
    /// # Arguments
    /// * `url` - 取得対象のURL
    /// * `query` - クエリパラメータ
    /// * `timeout_secs` - タイムアウト時間（秒）
    async fn get_text(&self, url: &str, query: &[(&str, &str)], timeout_secs: u64)
        -> Result<String>;

    /// 指定されたURLにJSONをPOSTし、レスポンス本文をテキストで取得する
    async fn post_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &Value,
        timeout_secs: u64,
    ) -> Result<String>;
}

/// `reqwest` を使用した本番用のHTTPクライアント実装
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// 新しいHTTPクライアントを作成
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// レスポンスのステータスを確認して本文を返す
    /// 2xx以外の場合は本文を含めたエラーにする
    async fn read_body(url: &str, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InfraError::http(url, e))?;

        if !status.is_success() {
            return Err(InfraError::http_status(status.as_u16(), body).into());
        }
        Ok(body)
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
        timeout_secs: u64,
    ) -> Result<String> {
        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(Duration::from_secs(timeout_secs))
            .send()
            .await
            .map_err(|e| InfraError::http(url, e))?;

        Self::read_body(url, response).await
    }

    async fn post_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &Value,
        timeout_secs: u64,
    ) -> Result<String> {
        let response = self
            .client
            .post(url)
            .query(query)
            .json(body)
            .timeout(Duration::from_secs(timeout_secs))
            .send()
            .await
            .map_err(|e| InfraError::http(url, e))?;

        Self::read_body(url, response).await
    }
}

/// モックが受け取ったリクエストの記録
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// クエリパラメータの値を名前で取得
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// テスト用のモックHTTPクライアント
///
/// この実装はテスト時にDIされ、実際のHTTPリクエストを行わずに
/// 定義済みのレスポンスやエラーを返します。
pub struct MockHttpClient {
    /// モック時に返すレスポンス内容
    pub mock_response: String,
    /// モック時に返すステータス（成功/失敗の制御）
    pub should_succeed: bool,
    /// エラー時に返すメッセージ
    pub error_message: Option<String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    /// 成功レスポンスを返すモッククライアントを作成
    pub fn new_success(mock_response: &str) -> Self {
        Self {
            mock_response: mock_response.to_string(),
            should_succeed: true,
            error_message: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// エラーレスポンスを返すモッククライアントを作成
    pub fn new_error(error_message: &str) -> Self {
        Self {
            mock_response: String::new(),
            should_succeed: false,
            error_message: Some(error_message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// これまでに受け取ったリクエストの一覧
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn respond(&self, url: &str, query: &[(&str, &str)], body: Option<&Value>) -> Result<String> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(RecordedRequest {
                url: url.to_string(),
                query: query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body: body.cloned(),
            });
        }

        if self.should_succeed {
            Ok(self.mock_response.clone())
        } else {
            let error_msg = self.error_message.as_deref().unwrap_or("Mock HTTP error");
            Err(anyhow::anyhow!("モックHTTPエラー: {}", error_msg))
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
        _timeout_secs: u64,
    ) -> Result<String> {
        self.respond(url, query, None)
    }

    async fn post_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &Value,
        _timeout_secs: u64,
    ) -> Result<String> {
        self.respond(url, query, Some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_http_client_success() {
        let mock_client = MockHttpClient::new_success(r#"{"results": []}"#);

        let result = mock_client
            .get_text("https://example.com/api/1/news", &[("q", "polska")], 30)
            .await;

        assert!(result.is_ok());
        assert!(result.unwrap().contains("results"));

        let requests = mock_client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query_value("q"), Some("polska"));
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_mock_http_client_error() {
        let mock_client = MockHttpClient::new_error("接続失敗");

        let result = mock_client
            .post_json(
                "https://example.com/generate",
                &[],
                &serde_json::json!({"prompt": "x"}),
                30,
            )
            .await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("接続失敗"));
        assert_eq!(
            mock_client.requests()[0].body,
            Some(serde_json::json!({"prompt": "x"}))
        );
    }
}
