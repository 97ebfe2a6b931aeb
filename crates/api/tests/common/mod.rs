use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use flowgate_api::auth::jwt::{generate_access_token, JwtConfig};
use flowgate_api::config::{EngineMode, ServerConfig};
use flowgate_api::routes;
use flowgate_api::state::AppState;
use flowgate_core::executor::{Actor, Executor, Group};
use flowgate_service::definition::{ProcessDefinition, VariableDefinition};
use flowgate_service::memory::InMemoryEngine;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        engine_mode: EngineMode::Memory,
        engine_url: String::new(),
        jwt: JwtConfig {
            secret: "test-secret-key-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers, backed by
/// the given in-memory engine.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(engine: Arc<InMemoryEngine>) -> Router {
    let config = test_config();

    let state = AppState {
        execution: engine.clone(),
        executors: engine,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// An engine pre-seeded with a `payment` definition (required `amount`
/// variable, two swimlanes) and two executors.
pub fn seeded_engine() -> Arc<InMemoryEngine> {
    let engine = InMemoryEngine::new();
    engine.seed_definition(
        ProcessDefinition::new("payment", 1)
            .with_variable(VariableDefinition::required("amount", "long"))
            .with_variable(VariableDefinition::optional("comment"))
            .with_swimlane("requester")
            .with_swimlane("approver")
            .with_diagram(vec![0x89, b'P', b'N', b'G']),
    );
    engine.seed_executor(Executor::Actor(Actor {
        id: 1,
        name: "jdoe".into(),
        full_name: "John Doe".into(),
        active: true,
    }));
    engine.seed_executor(Executor::Group(Group {
        id: 2,
        name: "managers".into(),
        description: String::new(),
    }));
    Arc::new(engine)
}

/// Bearer token for the default test user.
pub fn auth_token() -> String {
    generate_access_token(1, "jdoe", &test_config().jwt).expect("token generation")
}

/// Send a request with the default auth token and an optional JSON body.
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", auth_token()));
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request build"))
        .await
        .expect("request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Like [`request`], but returns the raw body and headers; for HTML and
/// binary endpoints.
pub async fn request_raw(
    app: &Router,
    method: Method,
    uri: &str,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(AUTHORIZATION, format!("Bearer {}", auth_token()))
                .body(Body::empty())
                .expect("request build"),
        )
        .await
        .expect("request");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, headers, bytes.to_vec())
}
