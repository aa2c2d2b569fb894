//! Duration totals over a time window.
//!
//! Windows select sessions by start time only, closed on both ends. A session
//! still running contributes the time elapsed up to "now", so a total that
//! includes one is live and grows on every recomputation.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::errors::AppError;
use crate::models::session::Session;
use crate::models::stats::Totals;

/// Closed interval `[start, end]` in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: i64,
    pub end: i64,
}

impl Window {
    pub fn range(start: i64, end: i64) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::BadRequest(
                "startDate must not be after endDate".to_string(),
            ));
        }
        Ok(Window { start, end })
    }

    /// The local calendar day containing `now`.
    pub fn today<Z: TimeZone>(now: DateTime<Utc>, tz: &Z) -> Self {
        let date = now.with_timezone(tz).date_naive();
        Window {
            start: start_of_local_day(tz, date),
            end: date
                .succ_opt()
                .map_or(i64::MAX, |next| start_of_local_day(tz, next) - 1),
        }
    }

    /// The local calendar month containing `now`.
    pub fn month<Z: TimeZone>(now: DateTime<Utc>, tz: &Z) -> Self {
        let date = now.with_timezone(tz).date_naive();
        let first = date.with_day(1).unwrap_or(date);
        let next_month = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        };
        Window {
            start: start_of_local_day(tz, first),
            end: next_month.map_or(i64::MAX, |next| start_of_local_day(tz, next) - 1),
        }
    }

    #[cfg(test)]
    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// First instant of `date` in `tz`. A midnight skipped by a DST jump resolves
/// to the first valid instant after it.
fn start_of_local_day<Z: TimeZone>(tz: &Z, date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(midnight + chrono::Duration::hours(1)))
                .earliest()
        })
        .map_or_else(
            || tz.from_utc_datetime(&midnight).timestamp_millis(),
            |instant| instant.timestamp_millis(),
        )
}

pub fn aggregate(sessions: &[Session], now: i64) -> Totals {
    Totals {
        total_duration: sessions.iter().map(|s| s.elapsed_at(now)).sum(),
        sessions_count: sessions.len(),
    }
}
