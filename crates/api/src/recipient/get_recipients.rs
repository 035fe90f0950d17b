use crate::error::NotifierError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::dtos::RecipientDTO;
use notifier_api_structs::get_recipients::*;
use notifier_domain::{Recipient, ID};
use notifier_infra::{AddressBook, NotifierContext};

pub async fn get_recipients_controller(
    http_req: HttpRequest,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    execute(GetRecipientsUseCase {}, &ctx)
        .await
        .map(|(recipients, default_recipient_ids)| {
            HttpResponse::Ok().json(APIResponse {
                recipients: recipients.into_iter().map(RecipientDTO::new).collect(),
                default_recipient_ids,
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

/// The address book ordered by display name together with the ids of the
/// recipients preselected for new reminders
#[derive(Debug)]
pub struct GetRecipientsUseCase {}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRecipientsUseCase {
    type Response = (Vec<Recipient>, Vec<ID>);

    type Error = UseCaseError;

    const NAME: &'static str = "GetRecipients";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let book = ctx.store.address_book().await;
        let address_book = AddressBook::new(&book, &ctx.senders);

        let recipients = address_book
            .list()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let default_ids = address_book
            .default_recipient_ids()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok((recipients, default_ids))
    }
}
