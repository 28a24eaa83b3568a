//! Tail controller behaviour against a scripted record source.
//!
//! All tests run with a paused clock so the poll interval elapses instantly.

mod common;

use common::{failed, ok, RecordBuilder, ScriptedSource};
use futures::StreamExt;
use grokdown_core::{FilterSpec, SourceError, StatusFilter, Tail, DEFAULT_POLL_INTERVAL};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_initial_snapshot_is_not_replayed() {
    let source = ScriptedSource::new()
        .then(vec![ok("a"), ok("b")])
        .then(vec![ok("a"), ok("b"), ok("c")]);

    let mut tail = Tail::start(source, &FilterSpec::default(), DEFAULT_POLL_INTERVAL)
        .await
        .unwrap();
    assert_eq!(tail.seen_count(), 2);

    let next = tail.next().await.unwrap();
    assert_eq!(next.id, "c");
    assert_eq!(tail.seen_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_new_records_in_arrival_order() {
    let source = ScriptedSource::new()
        .then(vec![])
        .then(vec![ok("x"), ok("y")])
        .then(vec![ok("x"), ok("y"), ok("z")]);

    let mut tail = Tail::start(source, &FilterSpec::default(), Duration::from_millis(250))
        .await
        .unwrap();

    assert_eq!(tail.next().await.unwrap().id, "x");
    assert_eq!(tail.next().await.unwrap().id, "y");
    assert_eq!(tail.next().await.unwrap().id, "z");
}

#[tokio::test(start_paused = true)]
async fn test_filter_applies_to_new_records() {
    let source = ScriptedSource::new()
        .then(vec![failed("old", 500)])
        .then(vec![failed("old", 500), ok("fine"), failed("broken", 503)]);

    let spec = FilterSpec {
        status: Some(StatusFilter::errors()),
        ..Default::default()
    };
    let mut tail = Tail::start(source, &spec, DEFAULT_POLL_INTERVAL).await.unwrap();

    assert_eq!(tail.next().await.unwrap().id, "broken");
}

#[tokio::test(start_paused = true)]
async fn test_limit_is_ignored_while_tailing() {
    let source = ScriptedSource::new()
        .then(vec![])
        .then(vec![ok("1"), ok("2"), ok("3")]);

    let spec = FilterSpec {
        limit: Some(1),
        ..Default::default()
    };
    let mut tail = Tail::start(source, &spec, DEFAULT_POLL_INTERVAL).await.unwrap();

    assert_eq!(tail.next().await.unwrap().id, "1");
    assert_eq!(tail.next().await.unwrap().id, "2");
    assert_eq!(tail.next().await.unwrap().id, "3");
}

#[tokio::test(start_paused = true)]
async fn test_never_yields_same_id_twice() {
    let source = ScriptedSource::new()
        .then(vec![])
        .then(vec![ok("a"), ok("a"), ok("b")])
        .then(vec![ok("b"), ok("a"), ok("c")])
        .then(vec![ok("c"), ok("d")]);

    let tail = Tail::start(source, &FilterSpec::default(), DEFAULT_POLL_INTERVAL)
        .await
        .unwrap();

    let yielded: Vec<String> = tail
        .into_stream()
        .take_while(|item| futures::future::ready(item.is_ok()))
        .map(|item| item.unwrap().id)
        .collect()
        .await;

    assert_eq!(yielded, vec!["a", "b", "c", "d"]);
    let unique: HashSet<&String> = yielded.iter().collect();
    assert_eq!(unique.len(), yielded.len());
}

#[tokio::test(start_paused = true)]
async fn test_fetch_failure_ends_stream() {
    let source = ScriptedSource::new()
        .then(vec![])
        .then(vec![ok("a")])
        .then_fail(SourceError::Connection {
            base_url: "http://127.0.0.1:4040".to_string(),
        })
        .then(vec![ok("a"), ok("b")]);

    let tail = Tail::start(source, &FilterSpec::default(), DEFAULT_POLL_INTERVAL)
        .await
        .unwrap();
    let items: Vec<_> = tail.into_stream().collect().await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap().id, "a");
    assert!(matches!(items[1], Err(SourceError::Connection { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_start_failure_is_surfaced() {
    let source = ScriptedSource::new().then_fail(SourceError::Connection {
        base_url: "http://127.0.0.1:4040".to_string(),
    });

    let result = Tail::start(source, &FilterSpec::default(), DEFAULT_POLL_INTERVAL).await;
    assert!(matches!(result, Err(SourceError::Connection { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_tunnel_name_is_passed_to_every_fetch() {
    let source = Arc::new(
        ScriptedSource::new()
            .then(vec![])
            .then(vec![RecordBuilder::new("a").path("/hook").status(200, "OK").build()]),
    );

    let spec = FilterSpec {
        tunnel_name: Some("my-api".to_string()),
        ..Default::default()
    };
    let mut tail = Tail::start(Arc::clone(&source), &spec, DEFAULT_POLL_INTERVAL)
        .await
        .unwrap();
    assert_eq!(tail.next().await.unwrap().id, "a");

    assert_eq!(source.fetch_count(), 2);
    assert!(source
        .tunnels()
        .iter()
        .all(|t| t.as_deref() == Some("my-api")));
}

#[tokio::test(start_paused = true)]
async fn test_waits_one_interval_between_polls() {
    let source = Arc::new(
        ScriptedSource::new()
            .then(vec![])
            .then(vec![])
            .then(vec![])
            .then(vec![ok("late")]),
    );

    let started = tokio::time::Instant::now();
    let mut tail = Tail::start(Arc::clone(&source), &FilterSpec::default(), Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(tail.next().await.unwrap().id, "late");

    assert_eq!(source.fetch_count(), 4);
    assert!(started.elapsed() >= Duration::from_secs(6));
}
