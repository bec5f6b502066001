use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One recorded usage event. Never mutated after the ledger hands it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub id: u64,
    pub liters: u64,
    pub wallet: String,
    pub timestamp: NaiveDateTime,
    pub tx_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Totals {
    pub total_liters: u64,
    pub streak: usize,
}

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    #[serde(default)]
    pub liters: Option<String>,
}

/// Outcome of the page's request-accounts call, as reported by the browser.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectRequest {
    #[serde(default)]
    pub accounts: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectResponse {
    pub wallet: String,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub entry: UsageEntry,
    pub explorer_url: String,
}

#[derive(Debug, Serialize)]
pub struct TrendPoint {
    pub id: u64,
    pub liters: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardRow {
    pub name: String,
    pub usage: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolState {
    WithinTarget,
    OverTarget,
}

#[derive(Debug, Serialize)]
pub struct CommunityPool {
    pub liters: u64,
    pub target: u64,
    pub percent: f64,
    pub state: PoolState,
}

#[derive(Debug, Serialize)]
pub struct ImpactView {
    pub tier: String,
    pub count: u64,
    pub headline: String,
    pub sentence: String,
}

#[derive(Debug, Serialize)]
pub struct LastTransaction {
    pub tx_hash: String,
    pub liters: u64,
    pub wallet: String,
    pub timestamp: String,
    pub explorer_url: String,
    pub qr_svg: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub wallet: Option<String>,
    pub wallet_display: Option<String>,
    pub total_liters: u64,
    pub streak: usize,
    pub impact: ImpactView,
    pub badges: Vec<String>,
    pub leaderboard: Vec<LeaderboardRow>,
    pub community: CommunityPool,
    pub tank_percent: f64,
    pub trend: Vec<TrendPoint>,
    pub last_transaction: Option<LastTransaction>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExplorerRecord {
    pub tx_hash: String,
    pub liters: u64,
    pub timestamp: String,
    pub status: String,
}
