use crate::config::Config;
use crate::storage::PushupStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PushupStore>,
    pub auth_redirect_url: String,
    pub session_cookie: String,
    pub default_daily_goal: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn PushupStore>, config: &Config) -> Self {
        Self {
            store,
            auth_redirect_url: config.auth_redirect_url.clone(),
            session_cookie: config.session_cookie.clone(),
            default_daily_goal: config.default_daily_goal,
        }
    }
}
