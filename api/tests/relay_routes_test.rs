//! Integration tests for the relay HTTP routes

use actix_web::{
    http::{header, StatusCode},
    test, web,
};
use async_trait::async_trait;
use std::sync::Arc;

use relay_api::dto::HealthResponse;
use relay_api::routes::index::WELCOME;
use relay_api::{create_app, AppState};
use relay_core::errors::{BackendError, BackendResult};
use relay_core::repositories::{KeyValueBackend, MemoryBackend};

/// Backend whose every command fails, as if the server were unreachable
struct UnreachableBackend;

#[async_trait]
impl KeyValueBackend for UnreachableBackend {
    async fn set(&self, _key: &str, _value: &str) -> BackendResult<()> {
        Err(BackendError::new("connection refused"))
    }

    async fn set_if_absent(&self, _key: &str, _value: &str) -> BackendResult<bool> {
        Err(BackendError::new("connection refused"))
    }

    async fn set_if_present(&self, _key: &str, _value: &str) -> BackendResult<bool> {
        Err(BackendError::new("connection refused"))
    }

    async fn get(&self, _key: &str) -> BackendResult<Option<String>> {
        Err(BackendError::new("connection refused"))
    }

    async fn exists(&self, _key: &str) -> BackendResult<bool> {
        Err(BackendError::new("connection refused"))
    }

    async fn delete(&self, _key: &str) -> BackendResult<bool> {
        Err(BackendError::new("connection refused"))
    }

    async fn scan_prefix(&self, _prefix: &str) -> BackendResult<Vec<String>> {
        Err(BackendError::new("connection refused"))
    }

    async fn health_check(&self) -> BackendResult<bool> {
        Err(BackendError::new("connection refused"))
    }
}

fn memory_state() -> (Arc<MemoryBackend>, web::Data<AppState<MemoryBackend>>) {
    let backend = Arc::new(MemoryBackend::new());
    let state = web::Data::new(AppState::new(Arc::clone(&backend)));
    (backend, state)
}

#[actix_web::test]
async fn test_index_welcomes() {
    let (_, state) = memory_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, WELCOME.as_bytes());
}

#[actix_web::test]
async fn test_register_set_get_scenario() {
    let (_, state) = memory_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/registerToken?token=tok1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(test::read_body(resp).await, "tok1".as_bytes());

    let req = test::TestRequest::post()
        .uri("/set")
        .set_form([("token", "tok1"), ("key", "color"), ("value", "blue")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/get?token=tok1&key=color")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "blue\n".as_bytes());

    let req = test::TestRequest::get()
        .uri("/get?token=tok1&key=missing")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, "Key does not exist\n".as_bytes());

    let req = test::TestRequest::post()
        .uri("/set")
        .set_form([("token", "bad-token"), ("key", "k"), ("value", "v")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, "Token does not exist\n".as_bytes());
}

#[actix_web::test]
async fn test_register_conflict() {
    let (_, state) = memory_state();
    let app = test::init_service(create_app(state)).await;

    let first = test::TestRequest::post()
        .uri("/registerToken?token=tok1")
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::CREATED);

    let second = test::TestRequest::get()
        .uri("/registerToken?token=tok1")
        .to_request();
    let resp = test::call_service(&app, second).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(test::read_body(resp).await, "Token already in use".as_bytes());
}

#[actix_web::test]
async fn test_malformed_tokens_are_rejected() {
    let (backend, state) = memory_state();
    let app = test::init_service(create_app(state)).await;

    for uri in ["/registerToken", "/registerToken?token=", "/registerToken?token=a%3Ab"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }

    assert!(backend.is_empty().await);
}

#[actix_web::test]
async fn test_form_overrides_query() {
    let (backend, state) = memory_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::post()
        .uri("/registerToken?token=from-query")
        .set_form([("token", "from-form")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(backend.exists("tokens:from-form").await.unwrap());
    assert!(!backend.exists("tokens:from-query").await.unwrap());
}

#[actix_web::test]
async fn test_set_via_query_string() {
    let (backend, state) = memory_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/registerToken?token=t").to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/set?token=t&key=greeting&value=hello%20world")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(
        backend.get("userdata:t:greeting").await.unwrap(),
        Some("hello world".to_string())
    );

    let req = test::TestRequest::post()
        .uri("/get")
        .set_form([("token", "t"), ("key", "greeting")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(test::read_body(resp).await, "hello world\n".as_bytes());
}

#[actix_web::test]
async fn test_get_on_unknown_token() {
    let (_, state) = memory_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/get?token=ghost&key=k")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, "Token does not exist\n".as_bytes());
}

#[actix_web::test]
async fn test_backend_failure_on_register_is_500() {
    let backend = Arc::new(UnreachableBackend);
    let state = web::Data::new(AppState::new(backend));
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/registerToken?token=tok1")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(resp).await;
    assert!(!String::from_utf8_lossy(&body).contains("connection refused"));
}

#[actix_web::test]
async fn test_unreachable_backend_hides_tokens() {
    let backend = Arc::new(UnreachableBackend);
    let state = web::Data::new(AppState::new(backend));
    let app = test::init_service(create_app(state)).await;

    // Existence checks that fail read as "does not exist"
    let req = test::TestRequest::get()
        .uri("/set?token=tok1&key=k&value=v")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_health_reports_backend_state() {
    let (_, state) = memory_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: HealthResponse = test::read_body_json(resp).await;
    assert_eq!(body.backend, "up");

    let state = web::Data::new(AppState::new(Arc::new(UnreachableBackend)));
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: HealthResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, "unhealthy");
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let (_, state) = memory_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/nope").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_large_form_value_is_stored_intact() {
    let (backend, state) = memory_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/registerToken?token=tok").to_request();
    test::call_service(&app, req).await;

    let value = "x".repeat(20_000);
    let req = test::TestRequest::post()
        .uri("/set?token=tok&key=k")
        .set_form([("value", value.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(backend.get("userdata:tok:k").await.unwrap(), Some(value));
}

#[actix_web::test]
async fn test_form_over_limit_is_rejected_without_writing() {
    let backend = Arc::new(MemoryBackend::new());
    let state = web::Data::new(AppState::new(Arc::clone(&backend)).with_form_limit(1024));
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/registerToken?token=tok").to_request();
    test::call_service(&app, req).await;
    backend.set("userdata:tok:k", "original").await.unwrap();

    let value = "x".repeat(4096);
    let req = test::TestRequest::post()
        .uri("/set?token=tok&key=k")
        .set_form([("value", value.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        backend.get("userdata:tok:k").await.unwrap(),
        Some("original".to_string())
    );
}

#[actix_web::test]
async fn test_unreadable_form_body_is_rejected() {
    let (backend, state) = memory_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/registerToken?token=tok").to_request();
    test::call_service(&app, req).await;
    backend.set("userdata:tok:k", "original").await.unwrap();

    // Declared as a form, but in a charset nothing can decode
    let req = test::TestRequest::post()
        .uri("/set?token=tok&key=k")
        .insert_header((
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded; charset=no-such-charset",
        ))
        .set_payload("value=new")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, "Malformed form body\n".as_bytes());

    // A field repeated in the body does not deserialize
    let req = test::TestRequest::post()
        .uri("/set?token=tok&key=k")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("value=a&value=b")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(
        backend.get("userdata:tok:k").await.unwrap(),
        Some("original".to_string())
    );
}

#[actix_web::test]
async fn test_non_form_body_falls_back_to_query() {
    let (backend, state) = memory_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/registerToken?token=tok").to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/set?token=tok&key=k&value=v")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload("ignored")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(backend.get("userdata:tok:k").await.unwrap(), Some("v".to_string()));
}
