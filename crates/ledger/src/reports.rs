//! Read-side report types.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{LedgerError, ResultLedger};

/// Inclusive calendar-day range.
///
/// Both bounds cover the full day: a row dated `end` 23:59:59.999 is inside
/// the range, one dated the following midnight is not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ResultLedger<Self> {
        if end < start {
            return Err(LedgerError::Validation(
                "date range end precedes start".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Absolute UTC bounds: `[start 00:00:00, end + 1 day 00:00:00)`.
    pub(crate) fn bounds_utc(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let lower = self.start.and_time(NaiveTime::MIN).and_utc();
        let upper = match self.end.checked_add_days(Days::new(1)) {
            Some(day) => day.and_time(NaiveTime::MIN).and_utc(),
            None => DateTime::<Utc>::MAX_UTC,
        };
        (lower, upper)
    }
}

/// Gross movement for one (commodity, variety) group.
///
/// Sums are arithmetic over the matching rows; there is no DEBIT/CREDIT
/// netting. A true on-hand balance is composed by the caller from a CREDIT
/// summary and a DEBIT summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockSummary {
    pub commodity: String,
    /// `None` groups separately from every present variety.
    pub variety: Option<String>,
    pub total_quantity: Decimal,
    pub total_bags: i64,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_full_days() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
        .unwrap();
        let (lower, upper) = range.bounds_utc();
        assert_eq!(lower.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!(upper.to_rfc3339(), "2025-02-01T00:00:00+00:00");
    }

    #[test]
    fn inverted_range_rejected() {
        let err = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }
}
