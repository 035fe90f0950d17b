use crate::error::NotifierError;
use crate::lifecycle::Lifecycle;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::delete_recipient::*;
use notifier_domain::{Recipient, ID};
use notifier_infra::{AddressBookRead, NotifierContext};

pub async fn delete_recipient_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    let usecase = DeleteRecipientUseCase {
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

/// Removes the recipient from every reminder and then from the address book
#[derive(Debug)]
pub struct DeleteRecipientUseCase {
    pub recipient_id: ID,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteRecipientUseCase {
    type Response = Recipient;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteRecipient";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let guard = ctx.store.write().await;
        let book = guard.address_book_mut().await;

        let recipient = match book.find_recipient(&self.recipient_id).await {
            Ok(Some(recipient)) => recipient,
            Ok(None) => return Err(UseCaseError::NotFound(self.recipient_id)),
            Err(_) => return Err(UseCaseError::StorageError),
        };

        Lifecycle::new(&guard, ctx)
            .remove_recipient_everywhere(&self.recipient_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        book.delete_recipient(&self.recipient_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(recipient)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_utils::*;
    use chrono::{prelude::*, Duration};
    use notifier_domain::{Reminder, ReminderKind, WarningType};
    use notifier_infra::ReminderSpaceRead;

    #[actix_web::test]
    async fn removes_recipient_from_reminders_in_lock_order() {
        let spec = Utc.with_ymd_and_hms(2025, 6, 15, 12, 22, 15).unwrap();
        let ctx = setup_context(spec - Duration::days(7));
        let (martin, anna) = (recipient("Martin"), recipient("Anna"));
        add_recipients(&ctx, &[&martin, &anna]).await;
        let shared = Reminder {
            id: ID::new(),
            kind: ReminderKind::OneShot,
            param: 0,
            warning_at: vec![WarningType::SameDay],
            spec,
            description: "Zahnarzt".into(),
            recipients: vec![martin.id, anna.id],
        };
        let sole = Reminder {
            id: ID::new(),
            recipients: vec![martin.id],
            ..shared.clone()
        };
        {
            let guard = ctx.store.write().await;
            let lifecycle = Lifecycle::new(&guard, &ctx);
            lifecycle.change_reminder(&shared).await.unwrap();
            lifecycle.change_reminder(&sole).await.unwrap();
        }

        let (audited, journal) = audit(&ctx);
        let mut usecase = DeleteRecipientUseCase {
            recipient_id: martin.id,
        };
        assert_eq!(usecase.execute(&audited).await.unwrap(), martin);
        assert_eq!(journal.verify_order(), Ok(()));

        let guard = ctx.store.read().await;
        assert!(guard.find_reminder(&sole.id).await.unwrap().is_none());
        let remaining = guard.find_reminder(&shared.id).await.unwrap().unwrap();
        assert_eq!(remaining.recipients, vec![anna.id]);
        let children = guard.all_notifications().await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].recipient, anna.id);
        assert!(guard
            .address_book()
            .await
            .find_recipient(&martin.id)
            .await
            .unwrap()
            .is_none());

        drop(guard);
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotFound(_))
        ));
    }
}
