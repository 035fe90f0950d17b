use notifier_domain::{Recipient, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecipientDTO {
    pub id: ID,
    pub display_name: String,
    pub address: String,
    pub address_type: String,
    pub is_default: bool,
}

impl RecipientDTO {
    pub fn new(recipient: Recipient) -> Self {
        Self {
            id: recipient.id,
            display_name: recipient.display_name,
            address: recipient.address,
            address_type: recipient.address_type,
            is_default: recipient.is_default,
        }
    }
}
