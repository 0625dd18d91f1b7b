use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{DefaultPreferences, NewsCache};
use crate::error::NewsError;

#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub interval: Duration,
    pub fallback: DefaultPreferences,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15 * 60),
            fallback: DefaultPreferences::default(),
        }
    }
}

pub struct RefresherHandle {
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl RefresherHandle {
    pub async fn stop(self) -> Result<(), NewsError> {
        let _ = self.cancel_tx.send(());
        self.join.await.map_err(NewsError::from)
    }
}

/// Periodic best-effort cache refresh, independent of request traffic.
/// Failures are logged and swallowed; the task must outlive any number of
/// bad upstream responses.
pub fn spawn_refresher(cache: NewsCache, config: RefreshConfig) -> RefresherHandle {
    let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
    let join = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The interval yields immediately; the first refresh belongs to
        // request traffic, not to the timer.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel_rx.recv() => {
                    info!("refresher shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    match cache.refresh_if_stale(&config.fallback).await {
                        Ok(true) => info!("headline cache refreshed"),
                        Ok(false) => debug!("headline cache still fresh; skipping refresh"),
                        Err(err) => {
                            warn!(error = %err, "periodic refresh failed");
                        }
                    }
                }
            }
        }
    });

    RefresherHandle { cancel_tx, join }
}
