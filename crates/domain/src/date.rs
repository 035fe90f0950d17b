use chrono::prelude::*;
use chrono::{Duration, LocalResult};
use chrono_tz::Tz;

/// Builds a calendar date from components that may be out of range and
/// carries the overflow into the next larger unit: month 13 is January of
/// the following year, February 29 in a non leap year is March 1 and day 0
/// is the last day of the previous month.
///
/// Returns `None` only when the result leaves the range chrono supports.
pub fn normalized_date(year: i32, month: i64, day: i64) -> Option<NaiveDate> {
    let months = i64::from(year) * 12 + (month - 1);
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(Duration::days(day - 1))
}

/// Interprets a wall clock time in `tz` and returns the instant.
/// Ambiguous times (clocks turned back) resolve to the earlier instant,
/// times inside a gap (clocks turned forward) are moved forward by the
/// length of the gap.
pub fn local_to_utc(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => t.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => match tz.from_local_datetime(&(naive + Duration::hours(1))).earliest() {
            Some(t) => t.with_timezone(&Utc),
            None => Utc.from_utc_datetime(&naive),
        },
    }
}

/// Wall clock `hour:minute` on `date` in `tz`, seconds dropped.
pub fn at_local_time(tz: &Tz, date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    Some(local_to_utc(tz, naive))
}
