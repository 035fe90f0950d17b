mod date;
mod error;
mod expansion;
mod notification;
mod offset;
mod recipient;
mod reference_time;
mod reminder;
mod shared;

pub use date::{at_local_time, local_to_utc, normalized_date};
pub use error::DomainError;
pub use expansion::{expand, occurrences_in_month, render};
pub use notification::Notification;
pub use offset::{WarningType, LABEL_IN_A_WEEK, LABEL_TODAY, LABEL_TOMORROW};
pub use recipient::Recipient;
pub use reminder::{collapse_warning_types, Reminder, ReminderKind};
pub use shared::entity::{Entity, InvalidIDError, ID};
