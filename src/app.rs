use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/explorer/:tx_hash", get(handlers::explorer_page))
        .route("/log", post(handlers::log_form))
        .route("/api/wallet/connect", post(handlers::connect_wallet))
        .route("/api/logs", get(handlers::get_logs).post(handlers::log_usage))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/explorer/:tx_hash", get(handlers::get_explorer))
        .route("/api/session", delete(handlers::end_session))
        .with_state(state)
}
