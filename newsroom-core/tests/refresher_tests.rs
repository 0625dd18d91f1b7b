use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newsroom_core::{
    spawn_refresher, CacheConfig, DefaultPreferences, NewsCache, NewsClient, RefreshConfig,
    UserStore,
};

fn headline_body(title: &str) -> serde_json::Value {
    json!({
        "status": "ok",
        "totalResults": 1,
        "articles": [{ "title": title, "description": "background refresh" }]
    })
}

fn cache_for(server: &MockServer, ttl: Duration) -> NewsCache {
    let client = NewsClient::new(Client::new(), server.uri(), Some("test-key".into()));
    NewsCache::new(
        CacheConfig {
            ttl,
            display_limit: 10,
        },
        client,
        UserStore::in_memory(),
    )
}

#[tokio::test]
async fn refresher_populates_cache_with_fallback_preferences() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .and(query_param("language", "en"))
        .and(query_param("category", "general"))
        .respond_with(ResponseTemplate::new(200).set_body_json(headline_body("Background story")))
        .mount(&server)
        .await;

    let cache = cache_for(&server, Duration::from_secs(600));
    let handle = spawn_refresher(
        cache.clone(),
        RefreshConfig {
            interval: Duration::from_millis(50),
            fallback: DefaultPreferences::default(),
        },
    );

    // Wait for the first timer tick to land.
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let hits = cache.search("Background").await.unwrap_or_default();
            if !hits.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("refresher never populated the cache");

    handle.stop().await.expect("stop refresher");
}

#[tokio::test]
async fn refresher_survives_upstream_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let cache = cache_for(&server, Duration::from_secs(600));
    let handle = spawn_refresher(
        cache.clone(),
        RefreshConfig {
            interval: Duration::from_millis(20),
            fallback: DefaultPreferences::default(),
        },
    );

    // Several failed ticks later the task must still be alive.
    tokio::time::sleep(Duration::from_millis(150)).await;
    handle.stop().await.expect("refresher should still be running");
    assert!(cache.read_articles().await.is_empty());
}
