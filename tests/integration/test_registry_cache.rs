//! Integration Tests for the Registry Client Cache

#[path = "../test_utils/mod.rs"]
mod test_utils;

use shadcn_term::error::Error;
use shadcn_term::registry::{HttpRegistrySource, RegistryClient};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{registry_payload, StaticSource};

fn client(source: &Arc<StaticSource>, ttl: Duration) -> RegistryClient {
    RegistryClient::new(source.clone(), ttl)
}

#[tokio::test]
async fn test_normalizes_payload_in_order() {
    let source = Arc::new(StaticSource::new(registry_payload()));
    let client = client(&source, Duration::from_secs(300));

    let components = client.get_registry(false).await.unwrap();
    let names: Vec<&str> = components.iter().map(|c| c.identifier()).collect();
    assert_eq!(names, ["accordion", "button", "card", "form"]);

    assert_eq!(
        components[1].display_detail(),
        "dependencies: @radix-ui/react-slot"
    );
    assert_eq!(components[2].display_detail(), "dependencies: no dependency");
    assert_eq!(
        components[3].display_detail(),
        "dependencies: @radix-ui/react-label react-hook-form zod"
    );
}

#[tokio::test]
async fn test_two_calls_within_ttl_fetch_once() {
    let source = Arc::new(StaticSource::new(registry_payload()));
    let client = client(&source, Duration::from_secs(300));

    let first = client.get_registry(false).await.unwrap();
    let second = client.get_registry(false).await.unwrap();

    assert_eq!(source.fetches(), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_expired_cache_refetches() {
    let source = Arc::new(StaticSource::new(registry_payload()));
    let client = client(&source, Duration::from_millis(50));

    client.get_registry(false).await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;
    source.set_payload(r#"[{"name": "badge"}]"#);

    let components = client.get_registry(false).await.unwrap();
    assert_eq!(source.fetches(), 2);
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].identifier(), "badge");
}

#[tokio::test]
async fn test_force_reload_bypasses_fresh_cache() {
    let source = Arc::new(StaticSource::new(registry_payload()));
    let client = client(&source, Duration::from_secs(300));

    client.get_registry(false).await.unwrap();
    client.get_registry(true).await.unwrap();
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_data() {
    let source = Arc::new(StaticSource::new(registry_payload()));
    let client = client(&source, Duration::from_secs(300));

    let before = client.get_registry(false).await.unwrap();
    source.set_failing(true);

    let result = client.get_registry(true).await;
    assert!(matches!(result, Err(Error::FetchFailed { .. })));

    let cached = client.cached().await.expect("previous data survives");
    assert!(Arc::ptr_eq(&before, &cached));

    // Still fresh, so a normal call is served without touching the source
    assert_eq!(client.get_registry(false).await.unwrap().len(), 4);
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn test_invalid_json_is_a_fetch_error() {
    let source = Arc::new(StaticSource::new("<html>Bad Gateway</html>"));
    let client = client(&source, Duration::from_secs(300));

    let error = client.get_registry(false).await.unwrap_err();
    assert!(matches!(error, Error::FetchFailed { .. }));
    assert_eq!(error.user_message(), "Can not get the component list");
    assert!(client.cached().await.is_none());
}

#[tokio::test]
async fn test_concurrent_fetches_leave_one_complete_cache() {
    let source = Arc::new(StaticSource::new(registry_payload()));
    let client = Arc::new(client(&source, Duration::from_secs(300)));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.get_registry(true).await })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap().len(), 4);
    }
    assert_eq!(source.fetches(), 8);
    assert_eq!(client.cached().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_unreachable_http_registry_fails_cleanly() {
    let source = HttpRegistrySource::new("http://127.0.0.1:9/r/index.json", Duration::from_secs(2))
        .unwrap();
    let client = RegistryClient::new(Arc::new(source), Duration::from_secs(300));

    match client.get_registry(false).await {
        Err(Error::FetchFailed { url, .. }) => assert_eq!(url, "http://127.0.0.1:9/r/index.json"),
        other => panic!("expected FetchFailed, got {:?}", other),
    }
}
