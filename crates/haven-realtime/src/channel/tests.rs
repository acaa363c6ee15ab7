use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;

use haven_core::testing::{Navigation, RecordingNavigator, StaticCookies};
use haven_core::traits::Storage;
use haven_entity::{AccountRole, Identity, SessionCredential};
use haven_session::{MemoryStore, SessionAction, SessionStore};

use super::*;
use crate::testing::MockTransport;

fn jwt(user_id: &str) -> String {
    let claims = URL_SAFE_NO_PAD.encode(format!(r#"{{"id":"{user_id}"}}"#));
    format!("eyJhbGciOiJIUzI1NiJ9.{claims}.sig")
}

struct Fixture {
    transport: Arc<MockTransport>,
    credentials: Arc<CredentialStore>,
    storage: Arc<MemoryStore>,
    store: Arc<SessionStore>,
    navigator: Arc<RecordingNavigator>,
    channel: Arc<RealtimeChannel>,
}

fn fixture() -> Fixture {
    let transport = Arc::new(MockTransport::default());
    let storage = Arc::new(MemoryStore::new());
    let credentials = Arc::new(CredentialStore::new(storage.clone()));
    credentials
        .save(&SessionCredential::new(jwt("u1"), "s1", "r1"))
        .unwrap();
    let store = Arc::new(SessionStore::new(storage.clone(), "persist:session"));
    store.dispatch(SessionAction::SignInSuccess(Identity::new("u1", AccountRole::User)));
    let cookies = Arc::new(StaticCookies::with(&[("sessionId", "s1")]));
    let navigator = Arc::new(RecordingNavigator::at("/user"));
    let channel = Arc::new(RealtimeChannel::new(
        transport.clone(),
        credentials.clone(),
        store.clone(),
        cookies,
        navigator.clone(),
        RealtimeConfig::default(),
        "/sign-in",
    ));
    Fixture {
        transport,
        credentials,
        storage,
        store,
        navigator,
        channel,
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_replaces_connection_per_credential() {
    let fx = fixture();
    let first = fx.channel.reconnect().await;
    assert_eq!(fx.transport.opened(), vec![Some(jwt("u1"))]);

    fx.credentials
        .save(&SessionCredential::new(jwt("u2"), "s2", "r2"))
        .unwrap();
    let second = fx.channel.reconnect().await;

    assert_ne!(first.id(), second.id());
    assert!(first.is_closed());
    assert!(!second.is_closed());
    assert_eq!(fx.transport.opened(), vec![Some(jwt("u1")), Some(jwt("u2"))]);
    assert_eq!(fx.channel.current().map(|c| c.id()), Some(second.id()));
}

#[tokio::test(start_paused = true)]
async fn test_joins_rooms_on_connect_and_rejoins_session_room() {
    let fx = fixture();
    let connection = fx.channel.reconnect().await;
    let mut peer = fx.transport.accept().await;
    connection.wait_connected().await.unwrap();

    assert_eq!(
        peer.next_frame().await,
        Some(json!({"event": "registerUser", "data": {"userId": "u1"}}))
    );
    assert_eq!(
        peer.next_frame().await,
        Some(json!({"event": "registerSession", "data": {"sessionId": "s1"}}))
    );

    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(
        peer.next_frame().await,
        Some(json!({"event": "registerSession", "data": {"sessionId": "s1"}}))
    );
}

#[tokio::test(start_paused = true)]
async fn test_anonymous_connection_joins_no_user_room() {
    let fx = fixture();
    fx.credentials.clear().unwrap();
    fx.channel.reconnect().await;
    let mut peer = fx.transport.accept().await;

    assert_eq!(peer.token, None);
    assert_eq!(
        peer.next_frame().await,
        Some(json!({"event": "registerSession", "data": {"sessionId": "s1"}}))
    );
}

#[tokio::test(start_paused = true)]
async fn test_force_logout_clears_and_hard_navigates() {
    let fx = fixture();
    assert!(fx.storage.get("persist:session").is_some());
    fx.channel.reconnect().await;
    let peer = fx.transport.accept().await;

    peer.to_client
        .send(r#"{"event":"forceLogout","data":{"reason":"policy"}}"#.to_string())
        .await
        .unwrap();
    settle().await;

    assert!(!fx.credentials.is_present());
    assert!(fx.store.identity().is_none());
    assert!(fx.storage.get("persist:session").is_none());
    assert_eq!(
        fx.navigator.navigations(),
        vec![Navigation::Hard("/sign-in?error=forced_logout".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_session_logout_only_for_matching_session() {
    let fx = fixture();
    fx.channel.reconnect().await;
    let peer = fx.transport.accept().await;

    peer.to_client
        .send(r#"{"event":"forceLogoutSession","data":{"sessionId":"other"}}"#.to_string())
        .await
        .unwrap();
    settle().await;
    assert!(fx.credentials.is_present());
    assert!(fx.store.is_signed_in());
    assert!(fx.navigator.navigations().is_empty());

    peer.to_client
        .send(r#"{"event":"forceLogoutSession","data":{"sessionId":"s1","reason":"revoked"}}"#.to_string())
        .await
        .unwrap();
    settle().await;
    assert!(!fx.credentials.is_present());
    assert!(!fx.store.is_signed_in());
    assert_eq!(fx.navigator.navigations().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_domain_events_reach_subscribers() {
    let fx = fixture();
    let mut events = fx.channel.subscribe();
    fx.channel.reconnect().await;
    let peer = fx.transport.accept().await;

    peer.to_client
        .send(r#"{"event":"bogus","data":{}}"#.to_string())
        .await
        .unwrap();
    peer.to_client
        .send(r#"{"event":"account_suspended","data":{"userId":"u1"}}"#.to_string())
        .await
        .unwrap();

    let event = events.recv().await.unwrap();
    assert_eq!(event.name(), "account_suspended");
    assert!(fx.navigator.navigations().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_lost_transport_reconnects_with_backoff_and_flushes_queue() {
    let fx = fixture();
    let connection = fx.channel.reconnect().await;
    let peer = fx.transport.accept().await;
    connection.wait_connected().await.unwrap();

    fx.transport.fail_next(1);
    drop(peer);
    settle().await;
    assert!(!connection.is_connected());

    connection
        .emit(&Outbound::RegisterUser {
            user_id: "u9".into(),
        })
        .unwrap();

    let mut peer = fx.transport.accept().await;
    assert_eq!(fx.transport.opened().len(), 3);
    assert_eq!(
        peer.next_frame().await,
        Some(json!({"event": "registerUser", "data": {"userId": "u1"}}))
    );
    assert_eq!(
        peer.next_frame().await,
        Some(json!({"event": "registerSession", "data": {"sessionId": "s1"}}))
    );
    assert_eq!(
        peer.next_frame().await,
        Some(json!({"event": "registerUser", "data": {"userId": "u9"}}))
    );
}

#[tokio::test(start_paused = true)]
async fn test_transport_reconnect_keeps_connection_token() {
    let fx = fixture();
    let connection = fx.channel.reconnect().await;
    let peer = fx.transport.accept().await;
    connection.wait_connected().await.unwrap();

    fx.credentials
        .save(&SessionCredential::new(jwt("u2"), "s2", "r2"))
        .unwrap();
    drop(peer);

    let peer = fx.transport.accept().await;
    assert_eq!(peer.token, Some(jwt("u1")));
    assert_eq!(fx.transport.opened(), vec![Some(jwt("u1")), Some(jwt("u1"))]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_first_open_retries_in_background() {
    let fx = fixture();
    fx.transport.fail_next(1);
    let connection = fx.channel.reconnect().await;
    assert!(!connection.is_connected());

    connection.wait_connected().await.unwrap();
    assert_eq!(fx.transport.opened().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_follow_credentials_rebuilds_on_each_revision() {
    let fx = fixture();
    let cancel = CancellationToken::new();
    let handle = fx
        .channel
        .clone()
        .follow_credentials(fx.credentials.subscribe(), cancel.clone());

    fx.credentials.clear().unwrap();
    settle().await;
    assert_eq!(fx.transport.opened(), vec![None]);

    fx.credentials
        .save(&SessionCredential::new(jwt("u3"), "s3", "r3"))
        .unwrap();
    settle().await;
    assert_eq!(fx.transport.opened(), vec![None, Some(jwt("u3"))]);

    cancel.cancel();
    handle.await.unwrap();
    fx.channel.disconnect().await;
    assert!(fx.channel.current().is_none());
}

#[tokio::test]
async fn test_emit_without_connection_fails() {
    let fx = fixture();
    let err = fx
        .channel
        .emit(&Outbound::RegisterSession {
            session_id: "s1".into(),
        })
        .unwrap_err();
    assert_eq!(err.kind, haven_core::error::ErrorKind::Realtime);
}
