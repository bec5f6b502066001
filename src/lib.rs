pub mod app;
pub mod config;
pub mod errors;
pub mod explorer;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod session;
pub mod state;
pub mod stats;
pub mod ui;
pub mod wallet;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
