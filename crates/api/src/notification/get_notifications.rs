use crate::error::NotifierError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::dtos::NotificationDTO;
use notifier_api_structs::get_notifications::*;
use notifier_domain::Notification;
use notifier_infra::{NotifierContext, ReminderSpaceRead};

pub async fn get_notifications_controller(
    http_req: HttpRequest,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    execute(GetNotificationsUseCase {}, &ctx)
        .await
        .map(|notifications| {
            HttpResponse::Ok().json(APIResponse {
                notifications: notifications.into_iter().map(NotificationDTO::new).collect(),
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

/// All pending notifications ordered by warning time
#[derive(Debug)]
pub struct GetNotificationsUseCase {}

#[async_trait::async_trait(?Send)]
impl UseCase for GetNotificationsUseCase {
    type Response = Vec<Notification>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetNotifications";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let mut notifications = ctx
            .store
            .read()
            .await
            .all_notifications()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        notifications.sort_by(|a, b| {
            a.warning_time
                .cmp(&b.warning_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(notifications)
    }
}
