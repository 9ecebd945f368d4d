use serde::{Deserialize, Serialize};

use crate::time::date::Date;
use crate::utils::errors::{AtlasError, Result};

/// Daily closing price of one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    date: Date,
    close: f64,
}

impl PriceRecord {
    pub fn new(date: Date, close: f64) -> Result<PriceRecord> {
        if !close.is_finite() || close <= 0.0 {
            return Err(AtlasError::InvalidHistoryErr(format!(
                "close on {} must be a positive number, got {}",
                date, close
            )));
        }
        Ok(PriceRecord { date, close })
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn close(&self) -> f64 {
        self.close
    }
}
