use super::get_reminders::by_next_occurrence;
use crate::error::NotifierError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use notifier_api_structs::dtos::{ReminderOccurrenceDTO, ReminderSummaryDTO};
use notifier_api_structs::get_reminders_overview::*;
use notifier_domain::Reminder;
use notifier_infra::{NotifierContext, ReminderSpaceRead};

pub async fn get_reminders_overview_controller(
    http_req: HttpRequest,
    query: web::Query<QueryParams>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetRemindersOverviewUseCase {
        max_entries: query.max_entries.unwrap_or(0),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| {
            HttpResponse::Ok().json(APIResponse {
                reminders: reminders
                    .iter()
                    .map(|(reminder, next_occurrence)| ReminderOccurrenceDTO {
                        reminder: ReminderSummaryDTO::new(reminder),
                        next_occurrence: *next_occurrence,
                    })
                    .collect(),
            })
        })
        .map_err(NotifierError::from)
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

/// The next `max_entries` upcoming reminders, zero means all of them
#[derive(Debug)]
pub struct GetRemindersOverviewUseCase {
    pub max_entries: usize,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersOverviewUseCase {
    type Response = Vec<(Reminder, DateTime<Utc>)>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetRemindersOverview";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let reminders = ctx
            .store
            .read()
            .await
            .all_reminders()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut upcoming = by_next_occurrence(reminders, ctx.sys.now(), &ctx.config.client_tz)
            .map_err(|_| UseCaseError::StorageError)?;
        if self.max_entries > 0 {
            upcoming.truncate(self.max_entries);
        }
        Ok(upcoming)
    }
}
