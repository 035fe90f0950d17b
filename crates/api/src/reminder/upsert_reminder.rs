use crate::error::NotifierError;
use crate::lifecycle::{Lifecycle, LifecycleError};
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use notifier_api_structs::create_reminder::{APIResponse, RequestBody};
use notifier_api_structs::update_reminder::PathParams;
use notifier_domain::{collapse_warning_types, Reminder, ReminderKind, WarningType, ID};
use notifier_infra::{AddressBookRead, NotifierContext};

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    let usecase = UpsertReminderUseCase::new(ID::new(), body.0);

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(NotifierError::from)
}

pub async fn update_reminder_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    let usecase = UpsertReminderUseCase::new(path.reminder_id, body.0);

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(NotifierError::from)
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidReminder(String),
    UnknownRecipient(ID),
    StorageError,
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidReminder(msg) => Self::BadClientData(msg),
            UseCaseError::UnknownRecipient(recipient_id) => Self::BadClientData(format!(
                "The recipient with id: {}, is not in the address book.",
                recipient_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

/// Creates the reminder with `reminder_id` or replaces it, together with
/// all of its notifications
#[derive(Debug)]
pub struct UpsertReminderUseCase {
    pub reminder_id: ID,
    pub kind: ReminderKind,
    pub param: i64,
    pub warning_at: Vec<WarningType>,
    pub spec: DateTime<Utc>,
    pub description: String,
    pub recipients: Vec<ID>,
}

impl UpsertReminderUseCase {
    pub fn new(reminder_id: ID, body: RequestBody) -> Self {
        Self {
            reminder_id,
            kind: body.kind,
            param: body.param,
            warning_at: body.warning_at,
            spec: body.spec,
            description: body.description,
            recipients: body.recipients,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpsertReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "UpsertReminder";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let reminder = Reminder {
            id: self.reminder_id,
            kind: self.kind,
            param: self.param,
            warning_at: collapse_warning_types(self.warning_at.clone()),
            spec: self.spec,
            description: self.description.trim().to_string(),
            recipients: self.recipients.clone(),
        };
        reminder
            .validate()
            .map_err(|e| UseCaseError::InvalidReminder(e.to_string()))?;

        let guard = ctx.store.write().await;
        {
            let book = guard.address_book().await;
            for recipient_id in &reminder.recipients {
                let found = book
                    .find_recipient(recipient_id)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                if found.is_none() {
                    return Err(UseCaseError::UnknownRecipient(*recipient_id));
                }
            }
        }

        match Lifecycle::new(&guard, ctx).change_reminder(&reminder).await {
            Ok(_) => (),
            Err(LifecycleError::Expansion(e)) => {
                return Err(UseCaseError::InvalidReminder(e.to_string()))
            }
            Err(_) => return Err(UseCaseError::StorageError),
        }

        Ok(reminder)
    }
}
