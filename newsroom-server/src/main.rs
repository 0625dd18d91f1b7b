mod auth;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use tracing::info;

use newsroom_core::{
    spawn_refresher, CacheConfig, DefaultPreferences, NewsCache, NewsClient, RefreshConfig,
    UserStore, DEFAULT_BASE_URL,
};

use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "newsroom-server", about = "Personal news aggregation backend")]
struct Cli {
    /// Address to bind the HTTP server to (host:port).
    #[arg(long, env = "NEWSROOM_BIND", default_value = "127.0.0.1:5000")]
    bind: String,

    /// API key for the external news provider.
    #[arg(long, env = "NEWS_API_KEY")]
    news_api_key: Option<String>,

    /// Base URL of the news provider.
    #[arg(long, env = "NEWS_API_BASE", default_value = DEFAULT_BASE_URL)]
    news_api_base: String,

    /// Secret used to sign and verify bearer tokens.
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: String,

    /// Path of the JSON user registry.
    #[arg(long, env = "NEWSROOM_USERS_FILE", default_value = "data/users.json")]
    users_file: PathBuf,

    /// Seconds before cached headlines go stale.
    #[arg(long, default_value_t = 600)]
    cache_ttl_secs: u64,

    /// Seconds between periodic best-effort refreshes.
    #[arg(long, default_value_t = 900)]
    refresh_interval_secs: u64,

    /// Articles returned per headline response.
    #[arg(long, default_value_t = 10)]
    display_limit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let users = UserStore::load_from(&cli.users_file).await;
    let client = NewsClient::new(reqwest::Client::new(), cli.news_api_base, cli.news_api_key);
    let cache = NewsCache::new(
        CacheConfig {
            ttl: Duration::from_secs(cli.cache_ttl_secs),
            display_limit: cli.display_limit,
        },
        client,
        users.clone(),
    );

    let refresher = spawn_refresher(
        cache.clone(),
        RefreshConfig {
            interval: Duration::from_secs(cli.refresh_interval_secs),
            fallback: DefaultPreferences::default(),
        },
    );

    let state = AppState {
        cache,
        users,
        jwt_secret: Arc::new(cli.jwt_secret),
    };
    let app = router(state);

    let addr: SocketAddr = cli
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", cli.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "newsroom-server listening");

    let served = axum::serve(listener, app).await;
    refresher.stop().await?;
    served.context("server shutdown")?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route(
            "/preferences",
            get(handlers::get_preferences).put(handlers::update_preferences),
        )
        .route("/news/getNews", get(handlers::get_news))
        .route("/news/:id/read", post(handlers::mark_read))
        .route("/news/:id/favorite", post(handlers::mark_favorite))
        .route("/news/read", get(handlers::read_articles))
        .route("/news/favorites", get(handlers::favorite_articles))
        .route("/news/search/:keyword", get(handlers::search_news))
        .with_state(state)
}
