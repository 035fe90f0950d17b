use crate::dtos::RecipientDTO;
use notifier_domain::{Recipient, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientResponse {
    pub recipient: RecipientDTO,
}

impl RecipientResponse {
    pub fn new(recipient: Recipient) -> Self {
        Self {
            recipient: RecipientDTO::new(recipient),
        }
    }
}

pub mod create_recipient {
    use super::*;

    #[derive(Serialize, Deserialize, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub display_name: String,
        pub address: String,
        pub address_type: String,
        #[serde(default)]
        pub is_default: bool,
    }

    pub type APIResponse = RecipientResponse;
}

pub mod update_recipient {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub recipient_id: ID,
    }

    pub type RequestBody = super::create_recipient::RequestBody;

    pub type APIResponse = RecipientResponse;
}

pub mod get_recipient {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub recipient_id: ID,
    }

    pub type APIResponse = RecipientResponse;
}

pub mod get_recipients {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub recipients: Vec<RecipientDTO>,
        pub default_recipient_ids: Vec<ID>,
    }
}

pub mod delete_recipient {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub recipient_id: ID,
    }

    pub type APIResponse = RecipientResponse;
}

pub mod send_message {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub recipient_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub message: String,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Name of the transport that delivered the message
        pub sender: String,
    }
}
