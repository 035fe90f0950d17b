use crate::error::NotifierError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use notifier_api_structs::create_notification::*;
use notifier_domain::{Notification, ID};
use notifier_infra::{AddressBookRead, NotifierContext};

pub async fn create_notification_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    let body = body.into_inner();
    let usecase = CreateNotificationUseCase {
        recipient: body.recipient,
        warning_time: body.warning_time,
        description: body.description,
    };

    execute(usecase, &ctx)
        .await
        .map(|notification| HttpResponse::Created().json(APIResponse::new(notification)))
        .map_err(NotifierError::from)
}

#[derive(Debug)]
pub enum UseCaseError {
    EmptyDescription,
    UnknownRecipient(ID),
    StorageError,
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyDescription => {
                Self::BadClientData("The description must not be empty.".into())
            }
            UseCaseError::UnknownRecipient(recipient_id) => Self::BadClientData(format!(
                "The recipient with id: {}, is not in the address book.",
                recipient_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

/// A notification that belongs to no reminder. It is delivered like any
/// other notification and is gone afterwards.
#[derive(Debug)]
pub struct CreateNotificationUseCase {
    pub recipient: ID,
    pub warning_time: DateTime<Utc>,
    pub description: String,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateNotificationUseCase {
    type Response = Notification;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateNotification";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(UseCaseError::EmptyDescription);
        }

        let guard = ctx.store.write().await;
        let known = guard
            .address_book()
            .await
            .find_recipient(&self.recipient)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .is_some();
        if !known {
            return Err(UseCaseError::UnknownRecipient(self.recipient));
        }

        let notification =
            Notification::ad_hoc(self.recipient, self.warning_time, description.to_string());
        guard
            .upsert_notification(&notification)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(notification)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_utils::*;
    use notifier_infra::ReminderSpaceRead;

    #[actix_web::test]
    async fn creates_ad_hoc_notifications_for_known_recipients() {
        let ctx = setup_context(Utc::now());
        let martin = recipient("Martin");
        add_recipients(&ctx, &[&martin]).await;

        let mut usecase = CreateNotificationUseCase {
            recipient: martin.id,
            warning_time: Utc::now(),
            description: "Bitte zurückrufen".into(),
        };
        let notification = usecase.execute(&ctx).await.unwrap();
        assert!(!notification.has_parent());
        assert!(ctx
            .store
            .read()
            .await
            .find_notification(&notification.id)
            .await
            .unwrap()
            .is_some());

        let mut unknown = CreateNotificationUseCase {
            recipient: ID::new(),
            warning_time: Utc::now(),
            description: "Bitte zurückrufen".into(),
        };
        assert!(matches!(
            unknown.execute(&ctx).await,
            Err(UseCaseError::UnknownRecipient(_))
        ));
    }
}
