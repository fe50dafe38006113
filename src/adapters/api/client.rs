use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::app_error::{ApiError, ApiResult};
use crate::application::ports::KeyValueStore;
use crate::application::use_cases::session::ACCESS_TOKEN_KEY;
use crate::domain::entities::Pagination;

use super::query::QueryParams;

pub const DEFAULT_API_BASE: &str = "http://localhost:3333/api/v1";

/// Success body: `{ "data": T, "pagination"?: {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

pub type Paginated<T> = Envelope<Vec<T>>;

/// Thin JSON client for the practice-management REST API.
///
/// Paths are given as segments and percent-encoded one by one, so record ids
/// can never escape their segment. The bearer token is read from storage on
/// every request; a sign-in or sign-out takes effect immediately.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    storage: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    pub fn new(client: Client, base_url: Url, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            client,
            base_url,
            storage,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `segments` under the base path, with `query` appended.
    pub fn url(&self, segments: &[&str], query: &QueryParams) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }
        Ok(url)
    }

    fn bearer_token(&self) -> Option<String> {
        match self.storage.get(ACCESS_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Could not read access token, sending request without it");
                None
            }
        }
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ========================================================================
    // Verbs
    // ========================================================================

    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &QueryParams,
    ) -> ApiResult<Envelope<T>> {
        let url = self.url(segments, query)?;
        let response = self.send(self.request(Method::GET, url)).await?;
        Self::decode(response).await
    }

    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> ApiResult<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, segments, body).await
    }

    pub async fn put<B, T>(&self, segments: &[&str], body: &B) -> ApiResult<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, segments, body).await
    }

    pub async fn patch<B, T>(&self, segments: &[&str], body: &B) -> ApiResult<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, segments, body).await
    }

    /// Issue a request whose response body is not needed (deletes, sign-out, acknowledgements).
    pub async fn execute(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&serde_json::Value>,
    ) -> ApiResult<()> {
        let url = self.url(segments, &QueryParams::new())?;
        let mut builder = self.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder).await?;
        Ok(())
    }

    pub async fn delete(&self, segments: &[&str]) -> ApiResult<()> {
        self.execute(Method::DELETE, segments, None).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> ApiResult<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(segments, &QueryParams::new())?;
        let response = self.send(self.request(method, url).json(body)).await?;
        Self::decode(response).await
    }

    // ========================================================================
    // Response handling
    // ========================================================================

    #[instrument(skip_all)]
    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "API response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let error = ApiError::from_response_body(status.as_u16(), &body);
        if error.is_unauthorized() {
            warn!("API rejected the stored credentials");
        }
        Err(error)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<Envelope<T>> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(
            Client::new(),
            Url::parse(base).unwrap(),
            Arc::new(MemoryStore::new()),
        )
    }

    #[test]
    fn test_url_joins_segments_under_base_path() {
        let api = client(DEFAULT_API_BASE);
        let url = api.url(&["clients", "42"], &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3333/api/v1/clients/42");
    }

    #[test]
    fn test_url_tolerates_trailing_slash() {
        let api = client("https://vet.example.com/api/v1/");
        let url = api.url(&["animals"], &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "https://vet.example.com/api/v1/animals");
    }

    #[test]
    fn test_url_encodes_identifiers() {
        let api = client(DEFAULT_API_BASE);
        let url = api.url(&["clients", "a/b c"], &QueryParams::new()).unwrap();
        assert_eq!(url.path(), "/api/v1/clients/a%2Fb%20c");
    }

    #[test]
    fn test_url_appends_query() {
        let api = client(DEFAULT_API_BASE);
        let query = QueryParams::new().with("search", "Rex Jr").with("status", "");
        let url = api.url(&["animals"], &query).unwrap();
        assert_eq!(url.query(), Some("search=Rex+Jr"));
    }

    #[test]
    fn test_bearer_token_skips_empty_value() {
        let store = Arc::new(MemoryStore::with_entries([(ACCESS_TOKEN_KEY, "")]));
        let api = ApiClient::new(Client::new(), Url::parse(DEFAULT_API_BASE).unwrap(), store);
        assert_eq!(api.bearer_token(), None);
    }

    #[test]
    fn test_envelope_with_pagination() {
        let envelope: Paginated<serde_json::Value> = serde_json::from_str(
            r#"{"data":[{"id":"c1"}],"pagination":{"page":1,"limit":20,"total":1,"totalPages":1}}"#,
        )
        .unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.pagination.map(|p| p.total_pages), Some(1));

        let bare: Envelope<u32> = serde_json::from_str(r#"{"data":7}"#).unwrap();
        assert_eq!(bare.pagination, None);
    }
}
