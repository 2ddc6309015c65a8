//! End-to-end tests for the lifecycle facade

use client_lifecycle::host::mock::{
    CallLog, MockCall, MockNavigator, MockNetwork, MockRemote, MockShell, MockTimerService,
};
use client_lifecycle::host::{ReloadMode, StaticCatalog, Visibility, VisibilityChannel};
use client_lifecycle::{ClientLifecycle, LifecycleContext};
use client_lifecycle_core::{KeyValueStore, LifecycleConfig, MemoryStore, Route, keys};
use serde_json::json;
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;

struct Host {
    log: CallLog,
    store: Arc<MemoryStore>,
    shell: MockShell,
    visibility: Arc<VisibilityChannel>,
    ctx: LifecycleContext,
}

async fn host() -> Host {
    let log = CallLog::new();
    let store = Arc::new(MemoryStore::with_defaults([(
        keys::NETWORK,
        json!({"isOffline": false, "shouldForceOffline": false}),
    )]));
    let values = [
        (keys::SESSION, json!({"authToken": "tok-123"})),
        (keys::APP_VERSION_HASH, json!("abc")),
        (keys::APP_SHOULD_REFRESH, json!(true)),
        (keys::DEVICE_ID, json!("device-42")),
    ];
    for (key, value) in values {
        store.set(key, value).await.unwrap();
    }
    let shell = MockShell::new(log.clone()).answering(true);
    let visibility = Arc::new(VisibilityChannel::new(Visibility::Visible));
    let ctx = LifecycleContext {
        store: store.clone(),
        remote: Arc::new(MockRemote::new(log.clone()).with_version("abc")),
        visibility: visibility.clone(),
        timers: Arc::new(MockTimerService::new(log.clone())),
        network: Arc::new(MockNetwork::new(log.clone())),
        navigator: Arc::new(MockNavigator::new(
            log.clone(),
            vec![Route::new("Home", "home-1").with_param("reportID", json!("77"))],
        )),
        shell: Arc::new(shell.clone()),
        localizer: Arc::new(
            StaticCatalog::new()
                .with("refresh.prompt", "Refresh now?")
                .with("session.expired", "Your session has expired")
                .with("session.revoked", "You were signed out on another device"),
        ),
    };
    Host {
        log,
        store,
        shell,
        visibility,
        ctx,
    }
}

/// Poll `condition` in real time; listener work runs on the blocking pool
async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 5s");
}

#[tokio::test]
async fn test_start_then_sign_out() {
    let host = host().await;
    let lifecycle = ClientLifecycle::new(&host.ctx, &LifecycleConfig::default());

    let _listener = lifecycle.start().await;
    assert_eq!(host.store.peek(keys::APP_SHOULD_REFRESH), Some(json!(false)));
    assert!(lifecycle.refresh().active_timer().is_some());

    lifecycle
        .redirect_to_sign_in(Some("session.expired"))
        .await
        .unwrap();

    let session = host.store.peek(keys::SESSION).unwrap();
    assert!(session.get("authToken").is_none());
    assert_eq!(
        session["errors"].as_object().unwrap().values().next(),
        Some(&json!("Your session has expired"))
    );
    assert_eq!(host.store.peek(keys::DEVICE_ID), Some(json!("device-42")));
}

fn session_errors(host: &Host) -> usize {
    host.store
        .peek(keys::SESSION)
        .and_then(|session| session["errors"].as_object().map(|errors| errors.len()))
        .unwrap_or(0)
}

#[tokio::test]
async fn test_successive_sign_outs_keep_both_errors() {
    let host = host().await;
    let lifecycle = ClientLifecycle::new(&host.ctx, &LifecycleConfig::default());

    lifecycle
        .redirect_to_sign_in(Some("session.expired"))
        .await
        .unwrap();
    lifecycle
        .redirect_to_sign_in(Some("session.revoked"))
        .await
        .unwrap();

    assert_eq!(session_errors(&host), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sign_outs_keep_both_errors() {
    for round in 0..100 {
        let host = host().await;
        let lifecycle = ClientLifecycle::new(&host.ctx, &LifecycleConfig::default());

        let first = lifecycle.redirect_to_sign_in(Some("session.expired"));
        let second = lifecycle.redirect_to_sign_in(Some("session.revoked"));
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(session_errors(&host), 2, "round {round}");
    }
}

#[tokio::test]
async fn test_mirror_follows_store_for_teardown() {
    let host = host().await;
    let lifecycle = ClientLifecycle::new(&host.ctx, &LifecycleConfig::default());
    assert!(!lifecycle.network_state().snapshot().unwrap().is_offline);

    let offline = json!({"isOffline": true, "shouldForceOffline": false, "since": 1});
    host.store.set(keys::NETWORK, offline.clone()).await.unwrap();
    assert!(lifecycle.network_state().snapshot().unwrap().is_offline);

    lifecycle.redirect_to_sign_in(None).await.unwrap();

    assert_eq!(host.store.peek(keys::NETWORK), Some(offline));
}

#[tokio::test]
async fn test_visibility_prompt_uses_configured_key() {
    let host = host().await;
    let config = LifecycleConfig::from_toml_str(
        r#"
[refresh]
prompt_key = "refresh.prompt"
"#,
    )
    .unwrap();
    let lifecycle = ClientLifecycle::new(&host.ctx, &config);
    let _listener = lifecycle.start().await;

    host.visibility.set(Visibility::Visible);
    wait_until(|| !host.shell.reloads().is_empty()).await;

    assert_eq!(host.shell.prompts(), vec!["Refresh now?".to_string()]);
    assert_eq!(host.shell.reloads(), vec![ReloadMode::Forced]);
}

#[tokio::test]
#[serial]
async fn test_env_interval_reaches_timer() {
    unsafe {
        std::env::set_var("LIFECYCLE_REFRESH_INTERVAL_SECS", "90");
    }
    let config = LifecycleConfig::resolve(None);
    unsafe {
        std::env::remove_var("LIFECYCLE_REFRESH_INTERVAL_SECS");
    }
    let config = config.unwrap();

    let host = host().await;
    let lifecycle = ClientLifecycle::new(&host.ctx, &config);
    let _listener = lifecycle.start().await;

    assert_eq!(
        host.log.count(|c| matches!(
            c,
            MockCall::ScheduleTimer { interval, .. } if *interval == Duration::from_secs(90)
        )),
        1
    );
}

#[tokio::test]
#[serial]
async fn test_env_home_route_is_reset() {
    unsafe {
        std::env::set_var("LIFECYCLE_HOME_ROUTE", "Inbox");
    }
    let config = LifecycleConfig::resolve(None);
    unsafe {
        std::env::remove_var("LIFECYCLE_HOME_ROUTE");
    }
    let config = config.unwrap();

    let host = host().await;
    let lifecycle = ClientLifecycle::new(&host.ctx, &config);
    lifecycle.redirect_to_sign_in(None).await.unwrap();

    // Only "Home" is on the stack, so nothing is reset
    assert_eq!(host.log.count(|c| matches!(c, MockCall::SetParams { .. })), 0);
    assert_eq!(host.log.count(|c| matches!(c, MockCall::NavigationReady)), 1);
}
