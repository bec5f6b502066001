use crate::config::AppConfig;
use crate::explorer::qr_svg;
use crate::models::{
    CommunityPool, ImpactView, LastTransaction, LeaderboardRow, PoolState, SummaryResponse,
    TrendPoint,
};
use crate::session::Session;
use crate::wallet::short_address;
use std::fmt;

pub const COMMUNITY_OFFSET: u64 = 2000;
pub const COMMUNITY_TARGET: u64 = 5000;
pub const TANK_CAPACITY: u64 = 1000;
const WATER_SAVER_LIMIT: u64 = 200;
const STREAK_BADGE_DAYS: usize = 3;
const COMPETITORS: [(&str, u64); 2] = [("Farmer A", 250), ("Household B", 400)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactTier {
    PlantsSupported,
    ShortShowers,
    DaysOfDrinkingWater,
    HouseholdsForOneDay,
}

impl ImpactTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::PlantsSupported => "plants supported",
            Self::ShortShowers => "short showers",
            Self::DaysOfDrinkingWater => "days of drinking water",
            Self::HouseholdsForOneDay => "households for one day",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Impact {
    pub liters: u64,
    pub tier: ImpactTier,
    pub count: u64,
}

impl Impact {
    /// Tier boundaries are lower-inclusive: 100, 500 and 1000 start a new tier.
    pub fn classify(liters: u64) -> Self {
        let (tier, count) = match liters {
            0..100 => (ImpactTier::PlantsSupported, (liters / 10).max(1)),
            100..500 => (ImpactTier::ShortShowers, liters / 40),
            500..1000 => (ImpactTier::DaysOfDrinkingWater, liters / 5),
            _ => (ImpactTier::HouseholdsForOneDay, liters / 50),
        };
        Self {
            liters,
            tier,
            count,
        }
    }

    pub fn sentence(&self) -> String {
        let (liters, count) = (self.liters, self.count);
        match self.tier {
            ImpactTier::PlantsSupported => format!("{liters}L = enough for {count} plants"),
            ImpactTier::ShortShowers => format!("{liters}L = {count} short showers"),
            ImpactTier::DaysOfDrinkingWater => format!("{liters}L = drinking water for {count} days"),
            ImpactTier::HouseholdsForOneDay => {
                format!("{liters}L = supply for {count} households (1 day)")
            }
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tier.label(), self.count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    WaterSaver,
    ThreeDayStreak,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Self::WaterSaver => "Water Saver",
            Self::ThreeDayStreak => "3-Day Streak",
        }
    }
}

pub fn badges(total_liters: u64, streak: usize) -> Vec<Badge> {
    let mut badges = Vec::new();
    if total_liters > 0 && total_liters < WATER_SAVER_LIMIT {
        badges.push(Badge::WaterSaver);
    }
    if streak >= STREAK_BADGE_DAYS {
        badges.push(Badge::ThreeDayStreak);
    }
    badges
}

/// Fixed competitors plus the caller, fewest liters first.
pub fn leaderboard(wallet: Option<&str>, total_liters: u64) -> Vec<LeaderboardRow> {
    let you = LeaderboardRow {
        name: wallet.map(short_address).unwrap_or_else(|| "You".to_string()),
        usage: total_liters,
    };
    let mut rows: Vec<LeaderboardRow> = std::iter::once(you)
        .chain(COMPETITORS.iter().map(|(name, usage)| LeaderboardRow {
            name: name.to_string(),
            usage: *usage,
        }))
        .collect();
    rows.sort_by_key(|row| row.usage);
    rows
}

pub fn community_pool(total_liters: u64) -> CommunityPool {
    let liters = total_liters.saturating_add(COMMUNITY_OFFSET);
    let state = if liters <= COMMUNITY_TARGET {
        PoolState::WithinTarget
    } else {
        PoolState::OverTarget
    };
    CommunityPool {
        liters,
        target: COMMUNITY_TARGET,
        percent: capped_percent(liters, COMMUNITY_TARGET),
        state,
    }
}

pub fn tank_percent(total_liters: u64) -> f64 {
    capped_percent(total_liters, TANK_CAPACITY)
}

fn capped_percent(value: u64, target: u64) -> f64 {
    (value as f64 / target as f64 * 100.0).min(100.0)
}

pub fn build_summary(session: Option<&Session>, config: &AppConfig) -> SummaryResponse {
    let wallet = session.and_then(|s| s.wallet.as_deref());
    let entries = session.map(|s| s.ledger.entries()).unwrap_or_default();
    let totals = session.map(|s| s.ledger.totals()).unwrap_or_default();
    let impact = Impact::classify(totals.total_liters);

    SummaryResponse {
        wallet: wallet.map(str::to_string),
        wallet_display: wallet.map(short_address),
        total_liters: totals.total_liters,
        streak: totals.streak,
        impact: ImpactView {
            tier: impact.tier.label().to_string(),
            count: impact.count,
            headline: impact.to_string(),
            sentence: impact.sentence(),
        },
        badges: badges(totals.total_liters, totals.streak)
            .into_iter()
            .map(|badge| badge.label().to_string())
            .collect(),
        leaderboard: leaderboard(wallet, totals.total_liters),
        community: community_pool(totals.total_liters),
        tank_percent: tank_percent(totals.total_liters),
        trend: entries
            .iter()
            .map(|entry| TrendPoint {
                id: entry.id,
                liters: entry.liters,
            })
            .collect(),
        last_transaction: entries.last().map(|entry| {
            let explorer_url = config.explorer_url(&entry.tx_hash);
            LastTransaction {
                tx_hash: entry.tx_hash.clone(),
                liters: entry.liters,
                wallet: short_address(&entry.wallet),
                timestamp: display_timestamp(entry.timestamp),
                qr_svg: qr_svg(&explorer_url),
                explorer_url,
            }
        }),
    }
}

pub fn display_timestamp(timestamp: chrono::NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}
