use crate::error::NotifierError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::get_recipient::*;
use notifier_domain::{Recipient, ID};
use notifier_infra::{AddressBookRead, NotifierContext};

pub async fn get_recipient_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetRecipientUseCase {
        recipient_id: path.recipient_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|recipient| HttpResponse::Ok().json(APIResponse::new(recipient)))
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
            UseCaseError::NotFound(recipient_id) => Self::NotFound(format!(
                "The recipient with id: {}, was not found.",
                recipient_id
            )),
        }
    }
}

#[derive(Debug)]
pub struct GetRecipientUseCase {
    pub recipient_id: ID,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRecipientUseCase {
    type Response = Recipient;

    type Error = UseCaseError;

    const NAME: &'static str = "GetRecipient";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let book = ctx.store.address_book().await;
        match book.find_recipient(&self.recipient_id).await {
            Ok(Some(recipient)) => Ok(recipient),
            Ok(None) => Err(UseCaseError::NotFound(self.recipient_id)),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}
