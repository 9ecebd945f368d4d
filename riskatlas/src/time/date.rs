use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::errors::{AtlasError, Result};

/// Calendar date of a daily close. Serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date {
    base_date: NaiveDate,
}

impl Date {
    /// # Panics
    /// Panics if the triple is not a valid calendar date. Use [`Date::from_ymd`] for input
    /// that has not been checked.
    pub fn new(year: i32, month: u32, day: u32) -> Date {
        match Date::from_ymd(year, month, day) {
            Ok(date) => date,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Date> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(|base_date| Date { base_date })
            .ok_or_else(|| {
                AtlasError::InvalidParameterErr(format!(
                    "{}-{:02}-{:02} is not a valid date",
                    year, month, day
                ))
            })
    }
}

impl From<NaiveDate> for Date {
    fn from(base_date: NaiveDate) -> Self {
        Date { base_date }
    }
}

impl FromStr for Date {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date::from)
            .map_err(|e| AtlasError::InvalidParameterErr(format!("{}: {}", s, e)))
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_date.format("%Y-%m-%d"))
    }
}
