use std::time::{Duration, Instant};

use chrono::NaiveDate;
use dashmap::DashMap;
use log::debug;

use crate::{data::history::PriceHistory, ticker::Ticker};

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct HistoryKey {
    tickers: Vec<Ticker>,
    date_from: NaiveDate,
    date_to: NaiveDate,
}

/// In-memory price histories that go stale after a fixed TTL
pub struct HistoryCache {
    entries: DashMap<HistoryKey, (PriceHistory, Instant)>,
    ttl: Duration,
}

impl HistoryKey {
    /// The ticker set is order-insensitive
    pub fn new(tickers: &[Ticker], date_from: &NaiveDate, date_to: &NaiveDate) -> Self {
        let mut tickers = tickers.to_vec();
        tickers.sort();
        tickers.dedup();

        Self {
            tickers,
            date_from: *date_from,
            date_to: *date_to,
        }
    }
}

impl HistoryCache {
    /// A zero TTL disables caching
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &HistoryKey) -> Option<PriceHistory> {
        if let Some(entry) = self.entries.get(key) {
            let (history, stored_at) = entry.value();
            if stored_at.elapsed() < self.ttl {
                debug!("[Cache Hit] {} tickers", key.tickers.len());
                return Some(history.clone());
            }
        }

        self.entries.remove_if(key, |_, (_, stored_at)| stored_at.elapsed() >= self.ttl);

        None
    }

    pub fn upsert(&self, key: HistoryKey, history: &PriceHistory) {
        if self.ttl.is_zero() {
            return;
        }

        self.entries
            .retain(|_, (_, stored_at)| stored_at.elapsed() < self.ttl);
        self.entries.insert(key, (history.clone(), Instant::now()));
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn t(s: &str) -> Ticker {
        Ticker::from_str(s).unwrap()
    }

    fn sample_history() -> PriceHistory {
        PriceHistory::from_closes(vec![(t("AAA.NS"), vec![(d(1), 1.0), (d(2), 2.0)])]).unwrap()
    }

    #[test]
    fn test_key_ignores_ticker_order() {
        assert_eq!(
            HistoryKey::new(&[t("B"), t("A")], &d(1), &d(2)),
            HistoryKey::new(&[t("A"), t("B"), t("A")], &d(1), &d(2))
        );
        assert_ne!(
            HistoryKey::new(&[t("A")], &d(1), &d(2)),
            HistoryKey::new(&[t("A")], &d(1), &d(3))
        );
    }

    #[test]
    fn test_get_and_upsert() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        let key = HistoryKey::new(&[t("AAA.NS")], &d(1), &d(2));

        assert!(cache.get(&key).is_none());

        cache.upsert(key.clone(), &sample_history());
        let history = cache.get(&key).unwrap();
        assert_eq!(history.get_dates(), vec![d(1), d(2)]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = HistoryCache::new(Duration::ZERO);
        let key = HistoryKey::new(&[t("AAA.NS")], &d(1), &d(2));

        cache.upsert(key.clone(), &sample_history());
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache = HistoryCache::new(Duration::from_millis(10));
        let key = HistoryKey::new(&[t("AAA.NS")], &d(1), &d(2));

        cache.upsert(key.clone(), &sample_history());
        std::thread::sleep(Duration::from_millis(20));

        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_upsert_purges_expired_entries() {
        let cache = HistoryCache::new(Duration::from_millis(50));
        let stale = HistoryKey::new(&[t("AAA.NS")], &d(1), &d(2));
        let fresh = HistoryKey::new(&[t("AAA.NS")], &d(1), &d(3));

        cache.upsert(stale.clone(), &sample_history());
        std::thread::sleep(Duration::from_millis(60));
        cache.upsert(fresh.clone(), &sample_history());

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&fresh).is_some());
        assert!(cache.get(&stale).is_none());
    }
}
