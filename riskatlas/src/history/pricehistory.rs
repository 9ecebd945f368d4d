use serde::{Deserialize, Serialize};

use crate::history::pricerecord::PriceRecord;
use crate::time::date::Date;
use crate::utils::errors::{AtlasError, Result};

/// Time-ordered closing prices for one instrument.
///
/// Dates are strictly increasing. Deserialization goes through the same
/// checks as [`PriceHistory::new`], so records read from JSON are validated
/// before the returns are ever computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceRecord>", into = "Vec<PriceRecord>")]
pub struct PriceHistory {
    records: Vec<PriceRecord>,
}

impl PriceHistory {
    pub fn new(records: Vec<PriceRecord>) -> Result<PriceHistory> {
        let mut history = PriceHistory {
            records: Vec::with_capacity(records.len()),
        };
        for record in records {
            history.push(record)?;
        }
        Ok(history)
    }

    /// Builds a history from `(date, close)` pairs.
    pub fn from_closes<I>(closes: I) -> Result<PriceHistory>
    where
        I: IntoIterator<Item = (Date, f64)>,
    {
        let records = closes
            .into_iter()
            .map(|(date, close)| PriceRecord::new(date, close))
            .collect::<Result<Vec<_>>>()?;
        PriceHistory::new(records)
    }

    pub fn push(&mut self, record: PriceRecord) -> Result<()> {
        // PriceRecord::new already checks the close, but deserialized records skip it
        if !record.close().is_finite() || record.close() <= 0.0 {
            return Err(AtlasError::InvalidHistoryErr(format!(
                "close on {} must be a positive number, got {}",
                record.date(),
                record.close()
            )));
        }
        if let Some(last) = self.records.last() {
            if record.date() <= last.date() {
                return Err(AtlasError::InvalidHistoryErr(format!(
                    "record dated {} does not follow {}",
                    record.date(),
                    last.date()
                )));
            }
        }
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.close())
    }

    pub fn last(&self) -> Option<&PriceRecord> {
        self.records.last()
    }

    pub fn last_close(&self) -> Result<f64> {
        self.last()
            .map(|r| r.close())
            .ok_or_else(|| AtlasError::InsufficientDataErr("price history is empty".to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TryFrom<Vec<PriceRecord>> for PriceHistory {
    type Error = AtlasError;

    fn try_from(records: Vec<PriceRecord>) -> Result<Self> {
        PriceHistory::new(records)
    }
}

impl From<PriceHistory> for Vec<PriceRecord> {
    fn from(history: PriceHistory) -> Self {
        history.records
    }
}
