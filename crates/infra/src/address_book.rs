use crate::services::{ISender, Senders};
use crate::store::AddressBookRead;
use notifier_domain::{Recipient, ID};
use std::sync::Arc;

/// The address book as seen by the delivery side: recipients from a held
/// address book guard combined with the registered transports.
pub struct AddressBook<'g, G: AddressBookRead> {
    guard: &'g G,
    senders: &'g Senders,
}

impl<'g, G: AddressBookRead> AddressBook<'g, G> {
    pub fn new(guard: &'g G, senders: &'g Senders) -> Self {
        Self { guard, senders }
    }

    /// The address of the recipient, `None` if it is not in the address book
    pub async fn check_recipient(&self, recipient_id: &ID) -> anyhow::Result<Option<String>> {
        Ok(self
            .guard
            .find_recipient(recipient_id)
            .await?
            .map(|r| r.address))
    }

    pub async fn get_sender(&self, recipient_id: &ID) -> anyhow::Result<Option<Arc<dyn ISender>>> {
        let recipient = self.guard.find_recipient(recipient_id).await?;
        Ok(self.senders.sender_for(recipient.as_ref()))
    }

    /// All recipients ordered by display name
    pub async fn list(&self) -> anyhow::Result<Vec<Recipient>> {
        let mut recipients = self.guard.all_recipients().await?;
        recipients.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(recipients)
    }

    pub async fn default_recipient_ids(&self) -> anyhow::Result<Vec<ID>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|r| r.is_default)
            .map(|r| r.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::Repos;
    use crate::services::{DummySender, TYPE_IFTTT, TYPE_LOCAL};
    use crate::store::Store;

    fn recipient(name: &str, address_type: &str, is_default: bool) -> Recipient {
        Recipient {
            id: ID::new(),
            display_name: name.into(),
            address: format!("{}-address", name),
            address_type: address_type.into(),
            is_default,
        }
    }

    #[tokio::test]
    async fn resolves_addresses_and_transports() {
        let store = Store::new(&Repos::create_inmemory());
        let mut senders = Senders::new(TYPE_IFTTT);
        senders.register(TYPE_IFTTT, Arc::new(DummySender::named("ifttt")));
        senders.register(TYPE_LOCAL, Arc::new(DummySender::named("local")));

        let martin = recipient("Martin", TYPE_LOCAL, true);
        let anna = recipient("Anna", TYPE_IFTTT, false);
        let push = recipient("Push", TYPE_IFTTT, true);
        {
            let book = store.address_book_mut().await;
            for r in [&martin, &anna, &push] {
                book.upsert_recipient(r).await.unwrap();
            }
        }

        let guard = store.address_book().await;
        let book = AddressBook::new(&guard, &senders);

        assert_eq!(
            book.check_recipient(&martin.id).await.unwrap().as_deref(),
            Some("Martin-address")
        );
        assert!(book.check_recipient(&ID::new()).await.unwrap().is_none());

        let sender = book.get_sender(&martin.id).await.unwrap().unwrap();
        assert_eq!(sender.name(), "local");
        let sender = book.get_sender(&ID::new()).await.unwrap().unwrap();
        assert_eq!(sender.name(), "ifttt");

        let names: Vec<String> = book
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.display_name)
            .collect();
        assert_eq!(names, vec!["Anna", "Martin", "Push"]);

        assert_eq!(
            book.default_recipient_ids().await.unwrap(),
            vec![martin.id, push.id]
        );
    }
}
