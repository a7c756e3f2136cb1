use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::services::format_service::month_label;

/// First day of recorded network activity. Every bucket index is relative to it.
pub const LAUNCH_DATE: (i32, u32, u32) = (2021, 9, 13);

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub fn launch_date() -> NaiveDate {
    let (y, m, d) = LAUNCH_DATE;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Parse a response date key (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| CoreError::InvalidDate(format!("{s}: {e}")))
}

/// The Sunday that opens the week `date` belongs to.
///
/// Date keys are stamped at UTC midnight and the dashboard reads them in a
/// zone west of UTC, where that instant is still the previous calendar day.
/// The week therefore starts on the Sunday on or before the day before `date`:
/// weeks run Monday through Sunday.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let observed = date.pred_opt().unwrap_or(date);
    let weekday = u64::from(observed.weekday().num_days_from_sunday());
    observed
        .checked_sub_days(Days::new(weekday))
        .unwrap_or(observed)
}

/// Days of `date`'s week elapsed so far, counting `date` itself:
/// 1 on a Monday, 7 on a Sunday.
pub fn days_into_week(date: NaiveDate) -> u32 {
    let days = (date - start_of_week(date)).num_days();
    u32::try_from(days).unwrap_or(0)
}

/// Week index of `date` relative to the launch week. Negative before launch.
pub fn weeks_between(date: NaiveDate) -> i64 {
    let days = (start_of_week(date) - start_of_week(launch_date())).num_days();
    // ceil(days / 7); both ends are Sundays so the division is exact in practice.
    -((-days).div_euclid(7))
}

/// Calendar month index of `date` relative to the launch month. Negative before launch.
pub fn months_since(date: NaiveDate) -> i64 {
    let launch = launch_date();
    let year_diff = i64::from(date.year() - launch.year());
    year_diff * 12 + i64::from(date.month()) - i64::from(launch.month())
}

/// Whole days since launch, rounded up. Used as the `numDays` query parameter.
pub fn days_since_launch(now: DateTime<Utc>) -> u32 {
    let launch = launch_date().and_time(chrono::NaiveTime::MIN).and_utc();
    let ms = (now - launch).num_milliseconds();
    if ms <= 0 {
        return 0;
    }
    let days = (ms + MS_PER_DAY - 1) / MS_PER_DAY;
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Time window used to aggregate daily data into bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Week,
    Month,
}

impl Bucket {
    pub fn index(self, date: NaiveDate) -> i64 {
        match self {
            Bucket::Week => weeks_between(date),
            Bucket::Month => months_since(date),
        }
    }

    /// Axis label of the bucket containing `date`.
    pub fn label(self, index: u32, date: NaiveDate) -> String {
        match self {
            Bucket::Week => index.to_string(),
            Bucket::Month => month_label(date),
        }
    }
}
