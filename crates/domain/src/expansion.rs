use crate::{
    date::{at_local_time, normalized_date},
    error::DomainError,
    notification::Notification,
    reminder::{Reminder, ReminderKind},
    shared::entity::ID,
};
use chrono::prelude::*;
use chrono::Duration;
use chrono_tz::Tz;

/// Expands `reminder` into one `Notification` per recipient and warning
/// time. Warning times that are not strictly after `now` are skipped, so the
/// result is empty when every lead time has already elapsed.
pub fn expand(reminder: &Reminder, now: DateTime<Utc>, tz: &Tz) -> Result<Vec<Notification>, DomainError> {
    let reference = reminder.next_occurrence(now, tz)?;

    let mut warnings = Vec::with_capacity(reminder.warning_at.len());
    for warning in &reminder.warning_at {
        let (at, label) = warning.offset(reference, reminder.param, tz)?;
        if at > now {
            warnings.push((at, label));
        }
    }

    let (hour, minute) = reminder.local_event_time(tz);
    let mut notifications = Vec::with_capacity(reminder.recipients.len() * warnings.len());
    for recipient in &reminder.recipients {
        for (at, label) in &warnings {
            notifications.push(Notification {
                id: ID::new(),
                parent: reminder.id,
                warning_time: *at,
                description: render(label, hour, minute, &reminder.description),
                recipient: *recipient,
            });
        }
    }

    Ok(notifications)
}

pub fn render(label: &str, hour: u32, minute: u32, description: &str) -> String {
    format!("{} {:02}:{:02} {}", label, hour, minute, description)
}

/// Occurrences of `reminder` inside the calendar `month` of `year` in the
/// client time zone, ascending. Weekly reminders can occur several times in
/// a month, all other kinds at most once.
///
/// When `include_past` is false and the month is the current one, only
/// occurrences after `now` are returned.
pub fn occurrences_in_month(
    reminder: &Reminder,
    year: i32,
    month: u32,
    include_past: bool,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<Vec<DateTime<Utc>>, DomainError> {
    let (start, end) = month_window(year, month, include_past, now, tz)?;
    // The window start is inclusive while reference times are strictly after
    // the instant they are computed from
    let mut cursor = start - Duration::milliseconds(1);

    let mut res = Vec::new();
    loop {
        let occurrence = reminder.next_occurrence(cursor, tz)?;
        if occurrence < start || occurrence >= end {
            break;
        }
        res.push(occurrence);
        if reminder.kind != ReminderKind::Weekly {
            break;
        }
        cursor = occurrence;
    }

    Ok(res)
}

fn month_window(
    year: i32,
    month: u32,
    include_past: bool,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<(DateTime<Utc>, DateTime<Utc>), DomainError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(DomainError::DateOutOfRange)?;
    let next = normalized_date(year, i64::from(month) + 1, 1)
        .ok_or(DomainError::DateOutOfRange)?;

    let mut start = at_local_time(tz, first, 0, 0).ok_or(DomainError::DateOutOfRange)?;
    let end = at_local_time(tz, next, 0, 0).ok_or(DomainError::DateOutOfRange)?;

    let local_now = now.with_timezone(tz);
    if !include_past && local_now.year() == year && local_now.month() == month {
        start = now;
    }

    Ok((start, end))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::offset::WarningType;
    use chrono_tz::{Europe::Berlin, UTC};

    fn reminder(kind: ReminderKind, warning_at: Vec<WarningType>, recipients: Vec<ID>) -> Reminder {
        Reminder {
            id: ID::new(),
            kind,
            param: 0,
            warning_at,
            spec: Utc.with_ymd_and_hms(2025, 6, 15, 12, 22, 15).unwrap(),
            description: "Test".into(),
            recipients,
        }
    }

    fn week_before_spec() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 8, 12, 22, 15).unwrap()
    }

    #[test]
    fn one_shot_same_day_yields_one_per_recipient() {
        let a = ID::new();
        let b = ID::new();
        let r = reminder(ReminderKind::OneShot, vec![WarningType::SameDay], vec![a, b]);

        let notifications = expand(&r, week_before_spec(), &UTC).unwrap();
        assert_eq!(notifications.len(), 2);
        for n in &notifications {
            assert_eq!(n.warning_time, r.spec);
            assert_eq!(n.parent, r.id);
        }
        let recipients: Vec<ID> = notifications.iter().map(|n| n.recipient).collect();
        assert!(recipients.contains(&a));
        assert!(recipients.contains(&b));
    }

    #[test]
    fn three_warnings_two_recipients_yield_six() {
        let r = reminder(
            ReminderKind::OneShot,
            vec![
                WarningType::SameDay,
                WarningType::EveningBefore,
                WarningType::WeekBefore,
            ],
            vec![ID::new(), ID::new()],
        );
        // One day earlier so that the week before warning is still ahead
        let now = week_before_spec() - Duration::days(1);
        let notifications = expand(&r, now, &UTC).unwrap();
        assert_eq!(notifications.len(), 6);
    }

    #[test]
    fn elapsed_warnings_are_dropped() {
        let r = reminder(
            ReminderKind::OneShot,
            vec![WarningType::SameDay, WarningType::WeekBefore],
            vec![ID::new(), ID::new(), ID::new()],
        );
        // Week before warning (June 8th 12:00) has passed
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap();
        let notifications = expand(&r, now, &UTC).unwrap();
        assert_eq!(notifications.len(), 3);

        // Everything has passed
        let now = Utc.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap();
        assert!(expand(&r, now, &UTC).unwrap().is_empty());

        // A warning exactly at now is not strictly after it
        assert!(expand(&r, r.spec, &UTC).unwrap().is_empty());
    }

    #[test]
    fn descriptions_carry_label_and_local_event_time() {
        let r = reminder(
            ReminderKind::OneShot,
            vec![WarningType::SameDay, WarningType::MorningBefore, WarningType::WeekBefore],
            vec![ID::new()],
        );
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let notifications = expand(&r, now, &Berlin).unwrap();
        let descriptions: Vec<&str> = notifications.iter().map(|n| n.description.as_str()).collect();
        // 12:22 UTC is 14:22 CEST
        assert_eq!(
            descriptions,
            vec!["Heute 14:22 Test", "Morgen 14:22 Test", "In 7 Tagen 14:22 Test"]
        );
    }

    #[test]
    fn recurring_reminders_always_expand_to_the_next_occurrence() {
        let r = reminder(
            ReminderKind::Anniversary,
            vec![WarningType::SameDay],
            vec![ID::new()],
        );
        // After this year's event
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let notifications = expand(&r, now, &UTC).unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(
            notifications[0].warning_time,
            Utc.with_ymd_and_hms(2026, 6, 15, 12, 22, 0).unwrap()
        );
    }

    #[test]
    fn count_is_recipients_times_future_offsets() {
        let now = Utc.with_ymd_and_hms(2025, 6, 14, 10, 0, 0).unwrap();
        let all = vec![
            WarningType::MorningBefore,
            WarningType::NoonBefore,
            WarningType::EveningBefore,
            WarningType::WeekBefore,
            WarningType::SameDay,
        ];
        for recipients in 1..4 {
            let r = reminder(
                ReminderKind::OneShot,
                all.clone(),
                (0..recipients).map(|_| ID::new()).collect(),
            );
            let reference = r.next_occurrence(now, &UTC).unwrap();
            let future = all
                .iter()
                .filter(|w| w.offset(reference, r.param, &UTC).unwrap().0 > now)
                .count();
            // Noon, evening and same day remain
            assert_eq!(future, 3);
            assert_eq!(expand(&r, now, &UTC).unwrap().len(), recipients * future);
        }
    }

    #[test]
    fn weekly_occurs_several_times_in_a_month() {
        // Tuesday
        let mut r = reminder(ReminderKind::Weekly, vec![WarningType::SameDay], vec![ID::new()]);
        r.spec = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();

        let occurrences = occurrences_in_month(&r, 2025, 6, false, now, &UTC).unwrap();
        let days: Vec<u32> = occurrences.iter().map(|t| t.day()).collect();
        assert_eq!(days, vec![3, 10, 17, 24]);
    }

    #[test]
    fn past_occurrences_of_the_current_month_are_optional() {
        let mut r = reminder(ReminderKind::Weekly, vec![WarningType::SameDay], vec![ID::new()]);
        r.spec = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 12, 0, 0, 0).unwrap();

        let upcoming = occurrences_in_month(&r, 2025, 6, false, now, &UTC).unwrap();
        assert_eq!(upcoming.iter().map(|t| t.day()).collect::<Vec<_>>(), vec![17, 24]);

        let all = occurrences_in_month(&r, 2025, 6, true, now, &UTC).unwrap();
        assert_eq!(all.iter().map(|t| t.day()).collect::<Vec<_>>(), vec![3, 10, 17, 24]);
    }

    #[test]
    fn yearly_reminders_occur_only_in_their_month() {
        let r = reminder(ReminderKind::Anniversary, vec![WarningType::SameDay], vec![ID::new()]);
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        let june = occurrences_in_month(&r, 2025, 6, false, now, &UTC).unwrap();
        assert_eq!(june, vec![Utc.with_ymd_and_hms(2025, 6, 15, 12, 22, 0).unwrap()]);

        assert!(occurrences_in_month(&r, 2025, 7, false, now, &UTC)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn event_on_the_first_at_midnight_belongs_to_its_month() {
        let mut r = reminder(ReminderKind::Monthly, vec![WarningType::SameDay], vec![ID::new()]);
        r.spec = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        let march = occurrences_in_month(&r, 2025, 3, false, now, &UTC).unwrap();
        assert_eq!(march, vec![Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()]);
    }

    #[test]
    fn invalid_months_are_rejected() {
        let r = reminder(ReminderKind::Monthly, vec![WarningType::SameDay], vec![ID::new()]);
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            occurrences_in_month(&r, 2025, 13, false, now, &UTC),
            Err(DomainError::DateOutOfRange)
        );
    }
}
