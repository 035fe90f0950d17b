use crate::error::NotifierError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::create_recipient::{APIResponse, RequestBody};
use notifier_api_structs::update_recipient::PathParams;
use notifier_domain::{Recipient, ID};
use notifier_infra::NotifierContext;

pub async fn create_recipient_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    let usecase = UpsertRecipientUseCase::new(ID::new(), body.into_inner());

    execute(usecase, &ctx)
        .await
        .map(|recipient| HttpResponse::Created().json(APIResponse::new(recipient)))
        .map_err(NotifierError::from)
}

pub async fn update_recipient_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    let usecase = UpsertRecipientUseCase::new(path.recipient_id, body.into_inner());

    execute(usecase, &ctx)
        .await
        .map(|recipient| HttpResponse::Ok().json(APIResponse::new(recipient)))
        .map_err(NotifierError::from)
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidRecipient(&'static str),
    StorageError,
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidRecipient(msg) => Self::BadClientData(msg.into()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[derive(Debug)]
pub struct UpsertRecipientUseCase {
    pub recipient: Recipient,
}

impl UpsertRecipientUseCase {
    pub fn new(recipient_id: ID, body: RequestBody) -> Self {
        Self {
            recipient: Recipient {
                id: recipient_id,
                display_name: body.display_name.trim().to_string(),
                address: body.address.trim().to_string(),
                address_type: body.address_type,
                is_default: body.is_default,
            },
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpsertRecipientUseCase {
    type Response = Recipient;

    type Error = UseCaseError;

    const NAME: &'static str = "UpsertRecipient";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        if self.recipient.display_name.is_empty() {
            return Err(UseCaseError::InvalidRecipient(
                "The display name must not be empty.",
            ));
        }
        if self.recipient.address.is_empty() {
            return Err(UseCaseError::InvalidRecipient("The address must not be empty."));
        }

        ctx.store
            .address_book_mut()
            .await
            .upsert_recipient(&self.recipient)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(self.recipient.clone())
    }
}
