//! Request shape and error mapping of the REST client, checked against a mock backend.

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::MockBackend;
use serde_json::json;
use vetdesk::adapters::api::{Crud, QueryParams};
use vetdesk::adapters::storage::MemoryStore;
use vetdesk::app_error::ApiError;
use vetdesk::application::forms::FormErrors;
use vetdesk::application::query_cache::{QueryCache, QueryConfig, QueryKey};
use vetdesk::domain::entities::AppointmentStatus;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_json, method, path, query_param, query_param_is_missing},
};

#[tokio::test]
async fn test_list_sends_only_non_empty_filters() {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/animals"))
        .and(query_param("species", "bovine"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(query_param_is_missing("search"))
        .and(query_param_is_missing("batchId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "a1" }, { "id": "a2" }],
            "pagination": { "page": 2, "limit": 10, "total": 12, "totalPages": 2 }
        })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let api = backend.client(Arc::new(MemoryStore::new()));
    let params = QueryParams::new()
        .with("species", "bovine")
        .with("search", "")
        .with("batchId", None::<String>)
        .page(2, 10);
    let page = api.animals().list(&params).await.unwrap();

    assert_eq!(page.data.len(), 2);
    let pagination = page.pagination.unwrap();
    assert!(!pagination.has_next());
    assert!(pagination.has_previous());
}

#[tokio::test]
async fn test_requests_without_token_carry_no_authorization() {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "clients": 4 } })))
        .mount(&backend.server)
        .await;

    let api = backend.client(Arc::new(MemoryStore::new()));
    api.dashboard().stats().await.unwrap();

    let requests = backend.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_validation_failure_maps_to_field_errors() {
    let backend = MockBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/clients"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation failed",
            "errors": [
                { "field": "email", "message": "Email already registered" },
                { "path": "phoneNumber", "msg": "Invalid phone" }
            ]
        })))
        .mount(&backend.server)
        .await;

    let api = backend.client(Arc::new(MemoryStore::new()));
    let err = api
        .clients()
        .create(&json!({ "name": "Fazenda Boa Esperança" }))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.user_message(), "Validation failed");
    assert!(!err.is_transient());

    let fields = FormErrors::from_api(&err);
    assert_eq!(fields.get("email"), ["Email already registered"]);
    assert_eq!(fields.get("phone_number"), ["Invalid phone"]);
}

#[tokio::test]
async fn test_unauthorized_and_non_json_failures() {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/services"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .mount(&backend.server)
        .await;

    let api = backend.client(Arc::new(MemoryStore::new()));

    let err = api.auth().me().await.unwrap_err();
    assert!(err.is_unauthorized());

    let err = api.services().list(&QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 502, message: None, .. }));
    assert!(err.is_transient());
    assert_eq!(err.user_message(), "Something went wrong. Please try again.");
}

#[tokio::test]
async fn test_ids_stay_inside_their_path_segment() {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clients/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": "a/b" } })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let api = backend.client(Arc::new(MemoryStore::new()));
    let record = api.clients().get("a/b").await.unwrap();
    assert_eq!(record["id"], "a/b");
}

#[tokio::test]
async fn test_appointment_endpoints() {
    let backend = MockBackend::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/appointments/ap9/status"))
        .and(body_json(json!({ "status": "canceled" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "id": "ap9", "status": "canceled" } })),
        )
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/appointments/calendar"))
        .and(query_param("startDate", "2024-06-01"))
        .and(query_param("endDate", "2024-06-30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "id": "ap1" }] })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let api = backend.client(Arc::new(MemoryStore::new()));
    let updated = api
        .appointments()
        .update_status("ap9", AppointmentStatus::Canceled)
        .await
        .unwrap();
    assert_eq!(updated["status"], "canceled");

    let june = api
        .appointments()
        .by_date_range(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(june.len(), 1);
}

#[tokio::test]
async fn test_invoice_actions_and_unread_count() {
    let backend = MockBackend::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/invoices/inv-1/pay"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/notifications/unread-count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "count": 3 } })))
        .mount(&backend.server)
        .await;

    let api = backend.client(Arc::new(MemoryStore::new()));
    api.invoices().mark_paid("inv-1", None).await.unwrap();
    assert_eq!(api.notifications().unread_count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_cache_retries_transient_failures_then_serves_cached_value() {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/batches"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/batches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "id": "b1" }] })))
        .mount(&backend.server)
        .await;

    let api = backend.client(Arc::new(MemoryStore::new()));
    let cache = QueryCache::new(QueryConfig {
        retry: 2,
        retry_base_delay: std::time::Duration::from_millis(1),
        ..QueryConfig::default()
    });
    let batches = api.batches();
    let params = QueryParams::new();

    let first = cache
        .fetch(QueryKey::new("batches"), || batches.list(&params))
        .await
        .unwrap();
    let second = cache
        .fetch(QueryKey::new("batches"), || batches.list(&params))
        .await
        .unwrap();

    assert_eq!(first.data, second.data);
    assert_eq!(backend.server.received_requests().await.unwrap().len(), 2);
}
