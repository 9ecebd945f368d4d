use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::history::pricehistory::PriceHistory;
use crate::utils::errors::{AtlasError, Result};

/// In-memory snapshot of the price histories of several instruments, keyed by
/// upper-case symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, PriceHistory>", into = "BTreeMap<String, PriceHistory>")]
pub struct PriceStore {
    histories: BTreeMap<String, PriceHistory>,
}

impl PriceStore {
    pub fn new() -> Self {
        Self {
            histories: BTreeMap::new(),
        }
    }

    pub fn add_history(&mut self, symbol: &str, history: PriceHistory) {
        self.histories.insert(normalize_symbol(symbol), history);
    }

    pub fn get_history(&self, symbol: &str) -> Result<&PriceHistory> {
        self.histories
            .get(&normalize_symbol(symbol))
            .ok_or_else(|| AtlasError::NotFoundErr(format!("price history for {}", symbol)))
    }

    pub fn last_close(&self, symbol: &str) -> Result<f64> {
        self.get_history(symbol)?.last_close()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.histories.contains_key(&normalize_symbol(symbol))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.histories.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}

impl TryFrom<BTreeMap<String, PriceHistory>> for PriceStore {
    type Error = AtlasError;

    /// Fails when two keys name the same symbol once normalized.
    fn try_from(map: BTreeMap<String, PriceHistory>) -> Result<Self> {
        let mut store = PriceStore::new();
        for (symbol, history) in map {
            if store.contains(&symbol) {
                return Err(AtlasError::InvalidHistoryErr(format!(
                    "more than one history for {}",
                    normalize_symbol(&symbol)
                )));
            }
            store.add_history(&symbol, history);
        }
        Ok(store)
    }
}

impl From<PriceStore> for BTreeMap<String, PriceHistory> {
    fn from(store: PriceStore) -> Self {
        store.histories
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::date::Date;

    fn history(closes: &[f64]) -> PriceHistory {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceHistory::from_closes(
            closes
                .iter()
                .enumerate()
                .map(|(i, c)| (Date::from(start + chrono::Days::new(i as u64)), *c)),
        )
        .unwrap()
    }

    #[test]
    fn test_symbols_are_case_insensitive() -> Result<()> {
        let mut store = PriceStore::new();
        store.add_history(" aapl ", history(&[180.0, 182.0, 185.5]));
        assert!(store.contains("AAPL"));
        assert_eq!(store.last_close("Aapl")?, 185.5);
        assert_eq!(store.symbols().collect::<Vec<_>>(), vec!["AAPL"]);
        Ok(())
    }

    #[test]
    fn test_missing_symbol() {
        let store = PriceStore::new();
        assert!(matches!(
            store.get_history("MSFT"),
            Err(AtlasError::NotFoundErr(_))
        ));
    }

    #[test]
    fn test_colliding_symbols_are_rejected() {
        let json = r#"{
            "msft": [{"date":"2024-01-02","close":370.0}],
            "MSFT": [{"date":"2024-01-02","close":371.0}]
        }"#;
        assert!(serde_json::from_str::<PriceStore>(json).is_err());

        let mut map = BTreeMap::new();
        map.insert("aapl".to_string(), history(&[1.0, 2.0]));
        map.insert(" AAPL".to_string(), history(&[3.0, 4.0]));
        assert!(matches!(
            PriceStore::try_from(map),
            Err(AtlasError::InvalidHistoryErr(_))
        ));
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"{
            "msft": [{"date":"2024-01-02","close":370.0},{"date":"2024-01-03","close":372.5}],
            "GOOGL": [{"date":"2024-01-02","close":138.0}]
        }"#;
        let store: PriceStore = serde_json::from_str(json).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_history("MSFT").unwrap().len(), 2);
        assert_eq!(store.last_close("googl").unwrap(), 138.0);
    }
}
