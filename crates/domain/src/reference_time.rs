use crate::{
    date::{at_local_time, normalized_date},
    error::DomainError,
    reminder::{Reminder, ReminderKind},
};
use chrono::prelude::*;
use chrono_tz::Tz;

impl ReminderKind {
    /// Computes the next occurrence of the event anchored at `spec`,
    /// relative to `now`. Weekday, day of month and anniversary are
    /// determined in the client time zone `tz`.
    ///
    /// An occurrence that falls exactly on `now` counts as already due and
    /// is moved to the following period.
    pub fn reference_time(
        &self,
        spec: DateTime<Utc>,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<DateTime<Utc>, DomainError> {
        match self {
            Self::OneShot => Ok(spec),
            Self::Anniversary => anniversary(spec, now, tz),
            Self::Monthly => monthly(spec, now, tz),
            Self::Weekly => weekly(spec, now, tz),
        }
    }
}

impl Reminder {
    pub fn next_occurrence(&self, now: DateTime<Utc>, tz: &Tz) -> Result<DateTime<Utc>, DomainError> {
        self.kind.reference_time(self.spec, now, tz)
    }
}

fn at_spec_time(
    anchor: &DateTime<Tz>,
    date: Option<NaiveDate>,
    tz: &Tz,
) -> Result<DateTime<Utc>, DomainError> {
    date.and_then(|d| at_local_time(tz, d, anchor.hour(), anchor.minute()))
        .ok_or(DomainError::DateOutOfRange)
}

fn to_i64(v: u32) -> i64 {
    i64::from(v)
}

// Feb 29 anchors land on Mar 1 in non leap years
fn anniversary(spec: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> Result<DateTime<Utc>, DomainError> {
    let anchor = spec.with_timezone(tz);
    let local_now = now.with_timezone(tz);

    let this_year = normalized_date(local_now.year(), to_i64(anchor.month()), to_i64(anchor.day()))
        .ok_or(DomainError::DateOutOfRange)?;
    let candidate = at_spec_time(&anchor, Some(this_year), tz)?;
    if candidate > now {
        return Ok(candidate);
    }

    let next_year = normalized_date(
        this_year.year() + 1,
        to_i64(this_year.month()),
        to_i64(this_year.day()),
    );
    at_spec_time(&anchor, next_year, tz)
}

fn monthly(spec: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> Result<DateTime<Utc>, DomainError> {
    let anchor = spec.with_timezone(tz);
    let local_now = now.with_timezone(tz);

    let this_month = normalized_date(local_now.year(), to_i64(local_now.month()), to_i64(anchor.day()))
        .ok_or(DomainError::DateOutOfRange)?;
    let candidate = at_spec_time(&anchor, Some(this_month), tz)?;
    if candidate > now {
        return Ok(candidate);
    }

    let next_month = normalized_date(
        this_month.year(),
        to_i64(this_month.month()) + 1,
        to_i64(this_month.day()),
    );
    at_spec_time(&anchor, next_month, tz)
}

fn weekly(spec: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> Result<DateTime<Utc>, DomainError> {
    let anchor = spec.with_timezone(tz);
    let local_now = now.with_timezone(tz);

    let target = i64::from(anchor.weekday().num_days_from_sunday());
    let today = i64::from(local_now.weekday().num_days_from_sunday());
    let days_ahead = match target - today {
        0 => 7,
        diff if diff < 0 => diff + 7,
        diff => diff,
    };

    let date = normalized_date(
        local_now.year(),
        to_i64(local_now.month()),
        to_i64(local_now.day()) + days_ahead,
    );
    at_spec_time(&anchor, date, tz)
}
