use crate::error::NotifierError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::get_notification_expiry::*;
use notifier_domain::{Notification, ID};
use notifier_infra::{NotifierContext, ReminderSpaceRead};

pub async fn get_notification_expiry_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetNotificationUseCase {
        notification_id: path.notification_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|notification| {
            HttpResponse::Ok().json(APIResponse {
                notification_id: notification.id,
                warning_time: notification.warning_time,
            })
        })
        .map_err(NotifierError::from)
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
            UseCaseError::NotFound(notification_id) => Self::NotFound(format!(
                "The notification with id: {}, was not found.",
                notification_id
            )),
        }
    }
}

#[derive(Debug)]
pub struct GetNotificationUseCase {
    pub notification_id: ID,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetNotificationUseCase {
    type Response = Notification;

    type Error = UseCaseError;

    const NAME: &'static str = "GetNotification";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let guard = ctx.store.read().await;
        match guard.find_notification(&self.notification_id).await {
            Ok(Some(notification)) => Ok(notification),
            Ok(None) => Err(UseCaseError::NotFound(self.notification_id)),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}
