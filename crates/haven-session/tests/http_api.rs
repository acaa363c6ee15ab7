//! Integration tests for the REST client against a local axum backend.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use serde_json::{Value, json};

use haven_core::config::ApiConfig;
use haven_core::testing::{Navigation, RecordingNavigator, RecordingNotifier};
use haven_entity::{AccountRole, Identity, SessionCredential};
use haven_session::{
    ApiClient, AuthApi, CredentialStore, Eviction, HttpAuthApi, MemoryStore, SessionAction,
    SessionStore, SessionSynchronizer, SuspensionInterceptor,
};

async fn verify(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let session = headers
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    match bearer.as_deref() {
        Some("Bearer good-token") => (
            StatusCode::OK,
            Json(json!({
                "authenticated": true,
                "_id": "u1",
                "role": "user",
                "username": "ana",
                "seenSession": session,
            })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Not authenticated"})),
        ),
    }
}

async fn listings() -> (StatusCode, Json<Value>) {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"message": "Account suspended by administrator"})),
    )
}

async fn signout() -> Json<Value> {
    Json(json!({"success": true}))
}

/// Start the fake backend and return its base URL.
async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/auth/verify", get(verify))
        .route("/api/auth/signout", get(signout))
        .route("/api/listings", get(listings));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

struct Harness {
    store: Arc<SessionStore>,
    credentials: Arc<CredentialStore>,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<RecordingNotifier>,
    client: Arc<ApiClient>,
    api: Arc<HttpAuthApi>,
    eviction: Arc<Eviction>,
}

async fn harness(token: &str) -> Harness {
    let base_url = spawn_backend().await;
    let storage = Arc::new(MemoryStore::new());
    let store = Arc::new(SessionStore::new(storage.clone(), "persist:session"));
    let credentials = Arc::new(CredentialStore::new(storage));
    credentials
        .save(&SessionCredential::new(token, "sess-1", "refresh"))
        .unwrap();
    let navigator = Arc::new(RecordingNavigator::at("/user/listing"));
    let notifier = Arc::new(RecordingNotifier::default());
    let eviction = Arc::new(Eviction::new(
        store.clone(),
        credentials.clone(),
        navigator.clone(),
        notifier.clone(),
        "/sign-in",
        Duration::from_millis(50),
    ));

    let config = ApiConfig {
        base_url,
        ..ApiConfig::default()
    };
    let client = Arc::new(
        ApiClient::new(&config.base_url, config.request_timeout(), credentials.clone())
            .unwrap()
            .with_interceptor(Arc::new(SuspensionInterceptor::new(eviction.clone()))),
    );
    let api = Arc::new(HttpAuthApi::new(client.clone(), &config));

    Harness {
        store,
        credentials,
        navigator,
        notifier,
        client,
        api,
        eviction,
    }
}

#[tokio::test]
async fn test_verify_sends_credential_headers() {
    let h = harness("good-token").await;
    let response = h.api.verify().await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body["seenSession"], "sess-1");
}

#[tokio::test]
async fn test_bootstrap_against_backend() {
    let h = harness("good-token").await;
    let sync = SessionSynchronizer::new(
        h.api.clone(),
        h.store.clone(),
        h.credentials.clone(),
        h.eviction.clone(),
        Duration::from_secs(30),
    );
    sync.bootstrap().await;

    let identity = h.store.identity().unwrap();
    assert_eq!(identity.id.as_str(), "u1");
    assert_eq!(identity.username.as_deref(), Some("ana"));
}

#[tokio::test]
async fn test_bootstrap_rejects_bad_token() {
    let h = harness("stale-token").await;
    h.store
        .dispatch(SessionAction::SignInSuccess(Identity::new("u1", AccountRole::User)));
    let sync = SessionSynchronizer::new(
        h.api.clone(),
        h.store.clone(),
        h.credentials.clone(),
        h.eviction.clone(),
        Duration::from_secs(30),
    );
    sync.bootstrap().await;

    assert!(h.store.identity().is_none());
    assert!(!h.credentials.is_present());
}

#[tokio::test]
async fn test_suspension_from_any_endpoint_evicts() {
    let h = harness("good-token").await;
    h.store
        .dispatch(SessionAction::SignInSuccess(Identity::new("u1", AccountRole::User)));

    let response = h.client.get("/api/listings").await.unwrap();
    assert_eq!(response.status, 403);
    assert!(h.store.identity().is_none());
    assert!(!h.credentials.is_present());
    assert_eq!(h.notifier.toasts().len(), 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        h.navigator.navigations(),
        vec![Navigation::Replace("/sign-in".to_string())]
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let storage = Arc::new(MemoryStore::new());
    let credentials = Arc::new(CredentialStore::new(storage));
    let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2), credentials).unwrap();

    let err = client.get("/api/auth/verify").await.unwrap_err();
    assert!(err.is_network());
}
