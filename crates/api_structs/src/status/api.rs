use serde::{Deserialize, Serialize};

pub mod get_service_health {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message: String,
    }
}

pub mod get_service_info {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub version: String,
        pub client_time_zone: String,
        /// Current time in the client time zone, RFC 3339
        pub client_time: String,
        pub reminder_count: usize,
        pub notification_count: usize,
        pub metrics: BTreeMap<String, u64>,
    }
}
