use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// An address book entry. `address_type` selects the transport which
/// delivers messages to `address`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: ID,
    pub display_name: String,
    pub address: String,
    #[serde(rename = "addr_type")]
    pub address_type: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Entity<ID> for Recipient {
    fn id(&self) -> ID {
        self.id
    }
}
