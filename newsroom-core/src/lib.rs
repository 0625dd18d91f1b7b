pub mod article;
pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
pub mod refresher;
pub mod users;

pub use article::{Article, ArticleSource};
pub use cache::{CacheConfig, DefaultPreferences, HeadlinesView, NewsCache};
pub use client::{Headlines, NewsClient, DEFAULT_BASE_URL};
pub use error::NewsError;
pub use refresher::{spawn_refresher, RefreshConfig, RefresherHandle};
pub use users::{Preferences, User, UserStore};
