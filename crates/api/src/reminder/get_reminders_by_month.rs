use crate::error::NotifierError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use notifier_api_structs::dtos::{ReminderOccurrenceDTO, ReminderSummaryDTO};
use notifier_api_structs::get_reminders_by_month::*;
use notifier_domain::{occurrences_in_month, DomainError, Reminder};
use notifier_infra::{NotifierContext, ReminderSpaceRead};

pub async fn get_reminders_by_month_controller(
    http_req: HttpRequest,
    query: web::Query<QueryParams>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetRemindersByMonthUseCase {
        year: query.year,
        month: query.month,
        include_past: query.all.unwrap_or(false),
    };

    execute(usecase, &ctx)
        .await
        .map(|occurrences| {
            HttpResponse::Ok().json(APIResponse {
                reminders: occurrences
                    .iter()
                    .map(|(reminder, occurrence)| ReminderOccurrenceDTO {
                        reminder: ReminderSummaryDTO::new(reminder),
                        next_occurrence: *occurrence,
                    })
                    .collect(),
            })
        })
        .map_err(NotifierError::from)
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidMonth(i32, u32),
    StorageError,
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidMonth(year, month) => Self::BadClientData(format!(
                "The month: {}-{}, is not a valid calendar month.",
                year, month
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

/// Every occurrence of every reminder inside a calendar month, ascending
#[derive(Debug)]
pub struct GetRemindersByMonthUseCase {
    pub year: i32,
    pub month: u32,
    /// Also list occurrences of the current month which already passed
    pub include_past: bool,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersByMonthUseCase {
    type Response = Vec<(Reminder, DateTime<Utc>)>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetRemindersByMonth";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        if !(1..=12).contains(&self.month) {
            return Err(UseCaseError::InvalidMonth(self.year, self.month));
        }

        let reminders = ctx
            .store
            .read()
            .await
            .all_reminders()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let now = ctx.sys.now();
        let mut res = Vec::new();
        for reminder in reminders {
            let occurrences = match occurrences_in_month(
                &reminder,
                self.year,
                self.month,
                self.include_past,
                now,
                &ctx.config.client_tz,
            ) {
                Ok(occurrences) => occurrences,
                Err(DomainError::DateOutOfRange) => {
                    return Err(UseCaseError::InvalidMonth(self.year, self.month))
                }
                Err(_) => return Err(UseCaseError::StorageError),
            };
            for occurrence in occurrences {
                res.push((reminder.clone(), occurrence));
            }
        }
        res.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));

        Ok(res)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_utils::*;
    use chrono::TimeZone;
    use notifier_domain::{ReminderKind, WarningType, ID};

    fn reminder(kind: ReminderKind, spec: DateTime<Utc>, description: &str) -> Reminder {
        Reminder {
            id: ID::new(),
            kind,
            param: 0,
            warning_at: vec![WarningType::SameDay],
            spec,
            description: description.into(),
            recipients: vec![ID::new()],
        }
    }

    #[actix_web::test]
    async fn lists_all_occurrences_of_a_month() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let ctx = setup_context(now);
        // Tuesdays 18:00 in Berlin
        let choir = reminder(
            ReminderKind::Weekly,
            Utc.with_ymd_and_hms(2025, 6, 3, 16, 0, 0).unwrap(),
            "Chor",
        );
        let birthday = reminder(
            ReminderKind::Anniversary,
            Utc.with_ymd_and_hms(1990, 7, 20, 10, 0, 0).unwrap(),
            "Geburtstag",
        );
        {
            let guard = ctx.store.write().await;
            guard.upsert_reminder(&choir).await.unwrap();
            guard.upsert_reminder(&birthday).await.unwrap();
        }

        let mut july = GetRemindersByMonthUseCase {
            year: 2025,
            month: 7,
            include_past: false,
        };
        let res = july.execute(&ctx).await.unwrap();
        let descriptions: Vec<&str> = res.iter().map(|(r, _)| r.description.as_str()).collect();
        // Tuesdays 1, 8, 15, 22 and 29 plus the birthday on the 20th
        assert_eq!(
            descriptions,
            vec!["Chor", "Chor", "Chor", "Geburtstag", "Chor", "Chor"]
        );

        // Only the rest of the current month unless past occurrences are requested
        let mut june = GetRemindersByMonthUseCase {
            year: 2025,
            month: 6,
            include_past: false,
        };
        assert_eq!(june.execute(&ctx).await.unwrap().len(), 2);
        june.include_past = true;
        assert_eq!(june.execute(&ctx).await.unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn rejects_invalid_months() {
        let ctx = setup_context(Utc::now());
        let mut usecase = GetRemindersByMonthUseCase {
            year: 2025,
            month: 13,
            include_past: true,
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::InvalidMonth(2025, 13))
        ));
    }
}
