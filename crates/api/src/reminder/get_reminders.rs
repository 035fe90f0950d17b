use crate::error::NotifierError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use notifier_api_structs::dtos::{ReminderDTO, ReminderWithNextOccurrenceDTO};
use notifier_api_structs::get_reminders::*;
use notifier_domain::{DomainError, Reminder};
use notifier_infra::{NotifierContext, ReminderSpaceRead};

pub async fn get_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    execute(GetRemindersUseCase {}, &ctx)
        .await
        .map(|reminders| {
            HttpResponse::Ok().json(APIResponse {
                reminders: reminders
                    .into_iter()
                    .map(|(reminder, next_occurrence)| ReminderWithNextOccurrenceDTO {
                        reminder: ReminderDTO::new(reminder),
                        next_occurrence,
                    })
                    .collect(),
            })
        })
        .map_err(NotifierError::from)
}

/// Pairs every reminder with its next occurrence after `now`, soonest first
pub fn by_next_occurrence(
    reminders: Vec<Reminder>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<Vec<(Reminder, DateTime<Utc>)>, DomainError> {
    let mut res = Vec::with_capacity(reminders.len());
    for reminder in reminders {
        let next = reminder.next_occurrence(now, tz)?;
        res.push((reminder, next));
    }
    res.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));
    Ok(res)
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[derive(Debug)]
pub struct GetRemindersUseCase {}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<(Reminder, DateTime<Utc>)>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let reminders = ctx
            .store
            .read()
            .await
            .all_reminders()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        by_next_occurrence(reminders, ctx.sys.now(), &ctx.config.client_tz)
            .map_err(|_| UseCaseError::StorageError)
    }
}
