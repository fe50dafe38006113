use async_trait::async_trait;

use crate::app_error::ApiResult;
use crate::domain::entities::{User, UserUpdate};

use super::client::ApiClient;
use super::resource::Crud;

#[derive(Clone)]
pub struct UsersApi {
    api: ApiClient,
}

impl UsersApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Update the signed-in user's own profile.
    pub async fn update_me(&self, update: &UserUpdate) -> ApiResult<User> {
        Ok(self.api.put(&["users", "me"], update).await?.data)
    }
}

#[async_trait]
impl Crud for UsersApi {
    fn api(&self) -> &ApiClient {
        &self.api
    }

    fn base(&self) -> &'static [&'static str] {
        &["users"]
    }
}
