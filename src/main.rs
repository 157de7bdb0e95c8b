use anyhow::{Context, Result};
use newser::app::{AppConfig, NewsRouter};
use newser::bot::Handler;
use newser::domain::favorite::FavoriteRepository;
use newser::domain::session::SessionCache;
use newser::infra::api::{GeminiRewriter, HttpClient, NewsdataClient, ReqwestHttpClient};
use newser::infra::db::setup_database;
use serenity::model::gateway::GatewayIntents;
use serenity::Client;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // 環境変数を読み込み（.envファイルがあれば使用）
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newser=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("設定の読み込みに失敗")?;

    let pool = setup_database(&config.database_url)
        .await
        .context("データベースの準備に失敗")?;
    info!(database_url = %config.database_url, "データベース準備完了");

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let source = NewsdataClient::new(http.clone(), config.newsdata_api_key.clone())
        .with_base_url(config.newsdata_base_url.clone())
        .with_timeout(config.http_timeout_secs);
    let rewriter = GeminiRewriter::new(http, config.google_api_key.clone())
        .with_base_url(config.gemini_base_url.clone())
        .with_model(config.gemini_model.clone())
        .with_timeout(config.http_timeout_secs);

    let router = NewsRouter::new(
        SessionCache::new(),
        FavoriteRepository::new(pool),
        Arc::new(source),
        Arc::new(rewriter),
        config.command_prefix.clone(),
    );

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(Handler::new(Arc::new(router)))
        .await
        .context("Discordクライアントの作成に失敗")?;

    info!(prefix = %config.command_prefix, "ボットを起動します");
    client.start().await.context("Discordクライアントの実行に失敗")?;
    Ok(())
}
