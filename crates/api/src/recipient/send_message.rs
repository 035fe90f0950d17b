use crate::error::NotifierError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::send_message::*;
use notifier_domain::ID;
use notifier_infra::{AddressBook, NotifierContext};

pub async fn send_message_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    let usecase = SendMessageUseCase {
        recipient_id: path.recipient_id,
        message: body.into_inner().message,
    };

    execute(usecase, &ctx)
        .await
        .map(|sender| HttpResponse::Ok().json(APIResponse { sender }))
        .map_err(NotifierError::from)
}

#[derive(Debug)]
pub enum UseCaseError {
    EmptyMessage,
    NotFound(ID),
    NoTransport(ID),
    DeliveryFailed(String),
    StorageError,
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyMessage => {
                Self::BadClientData("The message must not be empty.".into())
            }
            UseCaseError::NotFound(recipient_id) => Self::NotFound(format!(
                "The recipient with id: {}, was not found.",
                recipient_id
            )),
            UseCaseError::NoTransport(_)
            | UseCaseError::DeliveryFailed(_)
            | UseCaseError::StorageError => Self::InternalError,
        }
    }
}

/// Delivers `message` right away through the transport of the recipient.
/// Responds with the name of that transport.
#[derive(Debug)]
pub struct SendMessageUseCase {
    pub recipient_id: ID,
    pub message: String,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendMessageUseCase {
    type Response = String;

    type Error = UseCaseError;

    const NAME: &'static str = "SendMessage";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        if self.message.trim().is_empty() {
            return Err(UseCaseError::EmptyMessage);
        }

        let (address, sender) = {
            let book = ctx.store.address_book().await;
            let address_book = AddressBook::new(&book, &ctx.senders);
            let address = address_book
                .check_recipient(&self.recipient_id)
                .await
                .map_err(|_| UseCaseError::StorageError)?
                .ok_or(UseCaseError::NotFound(self.recipient_id))?;
            let sender = address_book
                .get_sender(&self.recipient_id)
                .await
                .map_err(|_| UseCaseError::StorageError)?
                .ok_or(UseCaseError::NoTransport(self.recipient_id))?;
            (address, sender)
        };

        sender
            .send(&address, &self.message)
            .await
            .map_err(|e| UseCaseError::DeliveryFailed(e.to_string()))?;

        Ok(sender.name().to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_utils::*;
    use chrono::Utc;
    use std::sync::Arc;

    #[actix_web::test]
    async fn sends_through_the_recipient_transport() {
        let sender = RecordingSender::new();
        let ctx = setup_context_with_sender(Utc::now(), sender.clone());
        let martin = recipient("Martin");
        add_recipients(&ctx, &[&martin]).await;

        let mut usecase = SendMessageUseCase {
            recipient_id: martin.id,
            message: "Hallo".into(),
        };
        assert_eq!(usecase.execute(&ctx).await.unwrap(), "recording");
        assert_eq!(
            sender.sent(),
            vec![("SendMartin".to_string(), "Hallo".to_string())]
        );

        let mut unknown = SendMessageUseCase {
            recipient_id: ID::new(),
            message: "Hallo".into(),
        };
        assert!(matches!(
            unknown.execute(&ctx).await,
            Err(UseCaseError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn reports_delivery_failures() {
        let ctx = setup_context_with_sender(Utc::now(), Arc::new(FailingSender));
        let martin = recipient("Martin");
        add_recipients(&ctx, &[&martin]).await;

        let mut usecase = SendMessageUseCase {
            recipient_id: martin.id,
            message: "Hallo".into(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::DeliveryFailed(_))
        ));
    }
}
