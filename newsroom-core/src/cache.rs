use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::article::Article;
use crate::client::NewsClient;
use crate::error::NewsError;
use crate::users::UserStore;

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub display_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            display_limit: 10,
        }
    }
}

/// Category and language used when a refresh has no requesting user to
/// take preferences from (the periodic refresher).
#[derive(Debug, Clone)]
pub struct DefaultPreferences {
    pub language: String,
    pub category: String,
}

impl Default for DefaultPreferences {
    fn default() -> Self {
        Self {
            language: "en".to_owned(),
            category: "general".to_owned(),
        }
    }
}

/// What a headline request returns: the capped slice plus the fetch
/// parameters it was produced with.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeadlinesView {
    pub category: String,
    pub language: String,
    pub total_results: u64,
    pub articles: Vec<Article>,
}

#[derive(Debug, Default)]
struct CacheState {
    articles: Vec<Article>,
    total_results: u64,
    category: String,
    language: String,
    fetched_at: Option<DateTime<Utc>>,
}

/// In-memory headline cache with time-based invalidation and slot-index
/// read/favorite marks.
///
/// Slot indices address positions in the current cached list only; a
/// refresh replaces the whole list and silently re-targets every mark.
/// Not stable identity, and deliberately so — see the README.
#[derive(Clone)]
pub struct NewsCache {
    config: CacheConfig,
    client: NewsClient,
    users: UserStore,
    state: Arc<RwLock<CacheState>>,
    read_marks: Arc<RwLock<HashSet<String>>>,
    favorite_marks: Arc<RwLock<HashSet<String>>>,
    refresh_lock: Arc<Mutex<()>>,
}

impl NewsCache {
    pub fn new(config: CacheConfig, client: NewsClient, users: UserStore) -> Self {
        Self {
            config,
            client,
            users,
            state: Arc::new(RwLock::new(CacheState::default())),
            read_marks: Arc::new(RwLock::new(HashSet::new())),
            favorite_marks: Arc::new(RwLock::new(HashSet::new())),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Current headlines for `user_id`. Served straight from the cache
    /// while it is fresh; a stale or empty cache resolves the user's
    /// preferences and refreshes from upstream.
    pub async fn get_headlines(&self, user_id: &str) -> Result<HeadlinesView, NewsError> {
        if let Some(view) = self.fresh_view().await {
            debug!("serving headlines from cache");
            return Ok(view);
        }

        let preferences = self.users.preferences(user_id).await?;
        let language = preferences
            .languages
            .first()
            .cloned()
            .unwrap_or_else(|| "en".to_owned());
        let category = preferences
            .categories
            .first()
            .cloned()
            .unwrap_or_else(|| "general".to_owned());

        self.refresh(&language, &category).await
    }

    /// Refresh path used by the periodic refresher: no requesting user,
    /// so the fallback preferences stand in. Returns `false` when the
    /// cache was still fresh and no fetch happened.
    pub async fn refresh_if_stale(
        &self,
        fallback: &DefaultPreferences,
    ) -> Result<bool, NewsError> {
        if self.fresh_view().await.is_some() {
            return Ok(false);
        }
        self.refresh(&fallback.language, &fallback.category).await?;
        Ok(true)
    }

    /// Fetches from upstream and replaces the whole cache, all or nothing.
    /// The lock means concurrent stale requests trigger at most one fetch
    /// per expiry; late arrivals re-check and take the fresh result.
    async fn refresh(&self, language: &str, category: &str) -> Result<HeadlinesView, NewsError> {
        let _guard = self.refresh_lock.lock().await;
        if let Some(view) = self.fresh_view().await {
            debug!("another request already refreshed the cache");
            return Ok(view);
        }

        info!(language, category, "fetching headlines from upstream");
        let headlines = self.client.top_headlines(language, category).await?;

        let mut state = self.state.write().await;
        state.articles = headlines.articles;
        state.total_results = headlines.total_results;
        state.category = category.to_owned();
        state.language = language.to_owned();
        state.fetched_at = Some(Utc::now());
        Ok(Self::view_of(&state, self.config.display_limit))
    }

    async fn fresh_view(&self) -> Option<HeadlinesView> {
        let state = self.state.read().await;
        let fetched_at = state.fetched_at?;
        if state.articles.is_empty() {
            return None;
        }
        // A future fetched_at (clock adjustment) counts as fresh.
        let fresh = match Utc::now().signed_duration_since(fetched_at).to_std() {
            Ok(age) => age < self.config.ttl,
            Err(_) => true,
        };
        fresh.then(|| Self::view_of(&state, self.config.display_limit))
    }

    fn view_of(state: &CacheState, display_limit: usize) -> HeadlinesView {
        HeadlinesView {
            category: state.category.clone(),
            language: state.language.clone(),
            total_results: state.total_results,
            articles: state.articles.iter().take(display_limit).cloned().collect(),
        }
    }

    /// Records a slot index as read. The id is not checked against the
    /// current list; stale or out-of-range ids are accepted and simply
    /// select nothing until a list of matching length exists.
    pub async fn mark_read(&self, slot: &str) {
        let mut marks = self.read_marks.write().await;
        if !marks.insert(slot.to_owned()) {
            debug!(slot, "already marked as read");
        }
    }

    pub async fn mark_favorite(&self, slot: &str) {
        let mut marks = self.favorite_marks.write().await;
        if !marks.insert(slot.to_owned()) {
            debug!(slot, "already marked as favorite");
        }
    }

    pub async fn read_articles(&self) -> Vec<Article> {
        let marks = self.read_marks.read().await;
        self.marked_articles(&marks).await
    }

    pub async fn favorite_articles(&self) -> Vec<Article> {
        let marks = self.favorite_marks.read().await;
        self.marked_articles(&marks).await
    }

    async fn marked_articles(&self, marks: &HashSet<String>) -> Vec<Article> {
        let state = self.state.read().await;
        state
            .articles
            .iter()
            .enumerate()
            .filter(|(index, _)| marks.contains(index.to_string().as_str()))
            .map(|(_, article)| article.clone())
            .collect()
    }

    /// Linear scan of the full cached list, preserving cache order.
    pub async fn search(&self, keyword: &str) -> Result<Vec<Article>, NewsError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(NewsError::EmptyKeyword);
        }
        let state = self.state.read().await;
        Ok(state
            .articles
            .iter()
            .filter(|article| article.matches_keyword(keyword))
            .cloned()
            .collect())
    }
}
