use async_trait::async_trait;

use crate::app_error::ApiResult;
use crate::domain::entities::LoginResponse;

/// Backend calls the session store depends on.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse>;

    async fn logout(&self) -> ApiResult<()>;
}
