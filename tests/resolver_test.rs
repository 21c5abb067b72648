mod common;

use common::{item, ScriptedCatalog};
use pokeview::core::resolver::HeldItemResolver;
use pokeview::domain::model::HeldItemReference;
use pokeview::{HeldItemsError, ItemFetchError};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

fn refs(urls: &[&str]) -> Vec<HeldItemReference> {
    urls.iter().map(|url| HeldItemReference::new(*url)).collect()
}

#[tokio::test]
async fn test_empty_input_makes_no_requests() {
    let catalog = Arc::new(ScriptedCatalog::new());
    let resolver = HeldItemResolver::new(catalog.clone(), Duration::from_secs(1));

    let items = resolver.resolve_all(&[]).await.unwrap();

    assert!(items.is_empty());
    assert_eq!(catalog.item_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_results_follow_input_order() {
    let gate = Arc::new(Notify::new());
    let catalog = Arc::new(
        ScriptedCatalog::new()
            .with_item("https://items/a", item("a"))
            .with_item("https://items/b", item("b"))
            .with_item_gate("https://items/a", gate.clone()),
    );
    let resolver = HeldItemResolver::new(catalog.clone(), Duration::from_secs(2));

    gate.notify_one();
    let items = resolver
        .resolve_all(&refs(&["https://items/a", "https://items/b"]))
        .await
        .unwrap();

    assert_eq!(items, vec![item("a"), item("b")]);
    assert_eq!(catalog.item_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_any_failure_fails_the_whole_batch() {
    let catalog = Arc::new(
        ScriptedCatalog::new()
            .with_item("https://items/a", item("a"))
            .with_item_error("https://items/b")
            .with_item("https://items/c", item("c")),
    );
    let resolver = HeldItemResolver::new(catalog, Duration::from_secs(2));

    let err = resolver
        .resolve_all(&refs(&[
            "https://items/a",
            "https://items/b",
            "https://items/c",
        ]))
        .await
        .unwrap_err();

    match err {
        HeldItemsError::PartialFailure {
            index,
            total,
            source,
        } => {
            assert_eq!(index, 1);
            assert_eq!(total, 3);
            assert!(matches!(source, ItemFetchError::NetworkFailure { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_item_times_out() {
    let never = Arc::new(Notify::new());
    let catalog = Arc::new(
        ScriptedCatalog::new()
            .with_item("https://items/slow", item("slow"))
            .with_item_gate("https://items/slow", never),
    );
    let resolver = HeldItemResolver::new(catalog, Duration::from_millis(50));

    let err = resolver
        .resolve_all(&refs(&["https://items/slow"]))
        .await
        .unwrap_err();

    match err {
        HeldItemsError::PartialFailure { index, source, .. } => {
            assert_eq!(index, 0);
            assert!(source.to_string().contains("timed out"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
