use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BanRequest {
    pub account_id: Uuid,

    #[serde(default)]
    #[validate(length(max = 200))]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnbanRequest {
    pub account_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenyCheckResponse {
    pub blacklisted: bool,
}
