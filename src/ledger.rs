use crate::errors::LedgerError;
use crate::models::{Totals, UsageEntry};
use chrono::{Local, NaiveDateTime};
use rand::{rngs::OsRng, RngCore};
use std::collections::BTreeSet;

const TX_HASH_BYTES: usize = 4;

/// Append-only usage log for one session.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<UsageEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        liters_input: Option<&str>,
        wallet: Option<&str>,
    ) -> Result<UsageEntry, LedgerError> {
        self.append_at(liters_input, wallet, Local::now().naive_local(), &mut OsRng)
    }

    /// Validates and records one entry captured at `timestamp`.
    ///
    /// Nothing is written unless both the liters field parses as a
    /// non-negative integer and a wallet is present.
    pub fn append_at<R: RngCore + ?Sized>(
        &mut self,
        liters_input: Option<&str>,
        wallet: Option<&str>,
        timestamp: NaiveDateTime,
        rng: &mut R,
    ) -> Result<UsageEntry, LedgerError> {
        let liters = parse_liters(liters_input)?;
        let wallet = wallet.ok_or(LedgerError::InvalidSubmission)?;

        let entry = UsageEntry {
            id: self.entries.len() as u64 + 1,
            liters,
            wallet: wallet.to_string(),
            timestamp,
            tx_hash: synthetic_tx_hash(rng),
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    pub fn totals(&self) -> Totals {
        let total_liters = self
            .entries
            .iter()
            .fold(0u64, |sum, entry| sum.saturating_add(entry.liters));
        let streak = self
            .entries
            .iter()
            .map(|entry| entry.timestamp.date())
            .collect::<BTreeSet<_>>()
            .len();

        Totals {
            total_liters,
            streak,
        }
    }

    pub fn entries(&self) -> &[UsageEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&UsageEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_liters(input: Option<&str>) -> Result<u64, LedgerError> {
    let raw = input.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(LedgerError::InvalidSubmission);
    }
    raw.parse::<u64>().map_err(|_| LedgerError::InvalidSubmission)
}

// 32 random bits; collisions are possible and tolerated.
fn synthetic_tx_hash<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; TX_HASH_BYTES];
    rng.fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SUBMISSION_MESSAGE;
    use chrono::NaiveDate;
    use rand::{rngs::StdRng, SeedableRng};

    const WALLET: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 15, 0)
            .unwrap()
    }

    #[test]
    fn ids_are_sequential_and_totals_sum() {
        let mut ledger = Ledger::new();
        let mut rng = StdRng::seed_from_u64(7);
        let amounts = [12, 0, 340, 7, 91];

        for amount in amounts {
            ledger
                .append_at(Some(&amount.to_string()), Some(WALLET), at(1, 9), &mut rng)
                .unwrap();
        }

        let ids: Vec<u64> = ledger.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(ledger.totals().total_liters, amounts.iter().sum::<u64>());
        assert_eq!(ledger.last().unwrap().liters, 91);
    }

    #[test]
    fn missing_wallet_leaves_ledger_unchanged() {
        let mut ledger = Ledger::new();
        let err = ledger
            .append_at(Some("40"), None, at(1, 9), &mut StdRng::seed_from_u64(1))
            .unwrap_err();

        assert_eq!(err, LedgerError::InvalidSubmission);
        assert_eq!(err.to_string(), SUBMISSION_MESSAGE);
        assert!(ledger.is_empty());
    }

    #[test]
    fn empty_or_malformed_liters_are_rejected() {
        let mut ledger = Ledger::new();
        let mut rng = StdRng::seed_from_u64(1);
        ledger.append_at(Some("10"), Some(WALLET), at(1, 9), &mut rng).unwrap();

        for input in [None, Some(""), Some("   "), Some("-5"), Some("12abc"), Some("1.5")] {
            let result = ledger.append_at(input, Some(WALLET), at(1, 9), &mut rng);
            assert_eq!(result, Err(LedgerError::InvalidSubmission), "input {input:?}");
        }
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn ids_skip_nothing_after_rejections() {
        let mut ledger = Ledger::new();
        let mut rng = StdRng::seed_from_u64(3);
        ledger.append_at(Some("1"), Some(WALLET), at(1, 9), &mut rng).unwrap();
        ledger.append_at(Some(""), Some(WALLET), at(1, 9), &mut rng).unwrap_err();
        let entry = ledger.append_at(Some(" 2 "), Some(WALLET), at(1, 9), &mut rng).unwrap();

        assert_eq!(entry.id, 2);
        assert_eq!(entry.liters, 2);
    }

    #[test]
    fn streak_counts_distinct_dates() {
        let mut ledger = Ledger::new();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(ledger.totals().streak, 0);

        for (day, hour) in [(1, 8), (1, 22), (2, 7), (4, 12), (4, 13)] {
            ledger.append_at(Some("5"), Some(WALLET), at(day, hour), &mut rng).unwrap();
        }

        assert_eq!(ledger.totals().streak, 3);
    }

    #[test]
    fn tx_hash_is_prefixed_hex() {
        let mut ledger = Ledger::new();
        let entry = ledger
            .append_at(Some("3"), Some(WALLET), at(1, 9), &mut StdRng::seed_from_u64(11))
            .unwrap();

        assert!(entry.tx_hash.starts_with("0x"));
        assert_eq!(entry.tx_hash.len(), 2 + TX_HASH_BYTES * 2);
        assert!(entry.tx_hash[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(entry.wallet, WALLET);
    }
}
