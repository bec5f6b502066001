use crate::config::AppConfig;
use crate::session::SessionStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<Mutex<SessionStore>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let sessions = SessionStore::new(config.session_idle, config.max_sessions);
        Self {
            config: Arc::new(config),
            sessions: Arc::new(Mutex::new(sessions)),
        }
    }
}
