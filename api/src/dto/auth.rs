use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use cr_core::domain::Account;
use cr_core::services::IssuedCode;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// Campus email address
    #[validate(length(min = 1, max = 254))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 16))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, max = 2048))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub new_password: String,

    #[validate(length(min = 1, max = 16))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResponse {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedCode> for SendCodeResponse {
    fn from(issued: IssuedCode) -> Self {
        Self {
            email: issued.identity,
            expires_at: issued.expires_at,
        }
    }
}

/// Account as shown to its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_staff: bool,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.identity.clone(),
            name: account.display_name.clone(),
            is_staff: account.is_staff,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
    pub account: AccountView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_requires_every_field() {
        let request = RegisterRequest {
            email: "a@email.ntou.edu.tw".into(),
            name: String::new(),
            password: "Passw0rd".into(),
            code: "123456".into(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
