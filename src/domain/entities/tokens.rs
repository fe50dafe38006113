use secrecy::SecretString;
use serde::Deserialize;

use super::{account::Account, user::User};

/// Bearer credentials issued at sign-in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tokens {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

/// Payload of a successful `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub account: Account,
    pub tokens: Tokens,
}
