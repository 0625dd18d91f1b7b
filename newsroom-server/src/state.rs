use std::sync::Arc;

use newsroom_core::{NewsCache, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub cache: NewsCache,
    pub users: UserStore,
    pub jwt_secret: Arc<String>,
}
