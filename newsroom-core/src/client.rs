use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::article::Article;
use crate::error::NewsError;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// The only upstream shape we accept: `articles` plus `totalResults`.
/// Anything else is an upstream-format error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headlines {
    pub total_results: u64,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone)]
pub struct NewsClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        }
    }

    /// Issues one GET against the provider's top-headlines endpoint.
    pub async fn top_headlines(
        &self,
        language: &str,
        category: &str,
    ) -> Result<Headlines, NewsError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(NewsError::MissingApiKey)?;

        let url = format!("{}/v2/top-headlines", self.base_url);
        debug!(%url, language, category, "requesting top headlines");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("language", language),
                ("category", category),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NewsError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| {
            debug!(error = %err, "upstream body did not match the headlines shape");
            NewsError::UpstreamFormat
        })
    }
}
