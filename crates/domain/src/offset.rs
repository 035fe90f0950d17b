use crate::date::{at_local_time, normalized_date};
use crate::error::DomainError;
use chrono::prelude::*;
use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Lead time at which a `Notification` fires relative to the reference time
/// of its `Reminder`.
///
/// Encoded on the wire as the integers `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum WarningType {
    MorningBefore,
    NoonBefore,
    EveningBefore,
    WeekBefore,
    SameDay,
}

pub const LABEL_TOMORROW: &str = "Morgen";
pub const LABEL_IN_A_WEEK: &str = "In 7 Tagen";
pub const LABEL_TODAY: &str = "Heute";

impl WarningType {
    /// Computes the instant of the warning and the lead time label that is
    /// put in front of the rendered message.
    ///
    /// `param` is only used by `SameDay` where it is the number of hours
    /// before the event, masked to `0..=31`.
    pub fn offset(
        &self,
        reference: DateTime<Utc>,
        param: i64,
        tz: &Tz,
    ) -> Result<(DateTime<Utc>, &'static str), DomainError> {
        match self {
            Self::MorningBefore => Ok((days_before_at(reference, 1, 9, tz)?, LABEL_TOMORROW)),
            Self::NoonBefore => Ok((days_before_at(reference, 1, 12, tz)?, LABEL_TOMORROW)),
            Self::EveningBefore => Ok((days_before_at(reference, 1, 18, tz)?, LABEL_TOMORROW)),
            Self::WeekBefore => Ok((days_before_at(reference, 7, 12, tz)?, LABEL_IN_A_WEEK)),
            Self::SameDay => Ok((reference - Duration::hours(param & 31), LABEL_TODAY)),
        }
    }
}

fn days_before_at(
    reference: DateTime<Utc>,
    days: i64,
    hour: u32,
    tz: &Tz,
) -> Result<DateTime<Utc>, DomainError> {
    let local = reference.with_timezone(tz);
    normalized_date(local.year(), i64::from(local.month()), i64::from(local.day()) - days)
        .and_then(|date| at_local_time(tz, date, hour, 0))
        .ok_or(DomainError::DateOutOfRange)
}

impl TryFrom<i64> for WarningType {
    type Error = DomainError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::MorningBefore),
            2 => Ok(Self::NoonBefore),
            3 => Ok(Self::EveningBefore),
            4 => Ok(Self::WeekBefore),
            5 => Ok(Self::SameDay),
            _ => Err(DomainError::UnsupportedWarningType(code)),
        }
    }
}

impl From<WarningType> for i64 {
    fn from(warning: WarningType) -> Self {
        match warning {
            WarningType::MorningBefore => 1,
            WarningType::NoonBefore => 2,
            WarningType::EveningBefore => 3,
            WarningType::WeekBefore => 4,
            WarningType::SameDay => 5,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::Europe::Berlin;

    fn berlin(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Berlin
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn day_before_offsets_use_fixed_local_hours() {
        let reference = berlin(2025, 6, 15, 14, 22);

        let (t, label) = WarningType::MorningBefore.offset(reference, 0, &Berlin).unwrap();
        assert_eq!(t, berlin(2025, 6, 14, 9, 0));
        assert_eq!(label, "Morgen");

        let (t, _) = WarningType::NoonBefore.offset(reference, 0, &Berlin).unwrap();
        assert_eq!(t, berlin(2025, 6, 14, 12, 0));

        let (t, _) = WarningType::EveningBefore.offset(reference, 0, &Berlin).unwrap();
        assert_eq!(t, berlin(2025, 6, 14, 18, 0));
    }

    #[test]
    fn day_before_crosses_month_and_year() {
        let (t, _) = WarningType::MorningBefore
            .offset(berlin(2025, 1, 1, 0, 30), 0, &Berlin)
            .unwrap();
        assert_eq!(t, berlin(2024, 12, 31, 9, 0));
    }

    #[test]
    fn day_before_is_taken_in_the_client_time_zone() {
        // 23:30 UTC on June 14th is already June 15th in Berlin
        let reference = Utc.with_ymd_and_hms(2025, 6, 14, 23, 30, 0).unwrap();
        let (t, _) = WarningType::EveningBefore.offset(reference, 0, &Berlin).unwrap();
        assert_eq!(t, berlin(2025, 6, 14, 18, 0));
    }

    #[test]
    fn week_before_is_noon_seven_days_earlier() {
        let (t, label) = WarningType::WeekBefore
            .offset(berlin(2025, 3, 3, 8, 0), 0, &Berlin)
            .unwrap();
        assert_eq!(t, berlin(2025, 2, 24, 12, 0));
        assert_eq!(label, "In 7 Tagen");
    }

    #[test]
    fn same_day_subtracts_masked_hours() {
        let reference = Utc.with_ymd_and_hms(2025, 6, 15, 12, 22, 15).unwrap();

        let (t, label) = WarningType::SameDay.offset(reference, 0, &Berlin).unwrap();
        assert_eq!(t, reference);
        assert_eq!(label, "Heute");

        let (t, _) = WarningType::SameDay.offset(reference, 3, &Berlin).unwrap();
        assert_eq!(t, reference - Duration::hours(3));

        // 35 & 31 == 3
        let (t, _) = WarningType::SameDay.offset(reference, 35, &Berlin).unwrap();
        assert_eq!(t, reference - Duration::hours(3));
    }

    #[test]
    fn it_decodes_wire_codes() {
        assert_eq!(WarningType::try_from(1), Ok(WarningType::MorningBefore));
        assert_eq!(WarningType::try_from(5), Ok(WarningType::SameDay));
        assert_eq!(
            WarningType::try_from(0),
            Err(DomainError::UnsupportedWarningType(0))
        );
        assert_eq!(
            WarningType::try_from(6),
            Err(DomainError::UnsupportedWarningType(6))
        );
        assert_eq!(i64::from(WarningType::WeekBefore), 4);
    }
}
