//! Behaviour of the detail controller against a scripted detail service.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{detail, next_event, ScriptedDetail};
use gallery_core::{ApiError, DetailController, DetailEvent, DetailRow, ErrorAlert};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc::UnboundedReceiver;

fn spawn(id: &str) -> (Arc<ScriptedDetail>, DetailController, UnboundedReceiver<DetailEvent>) {
    let script = Arc::new(ScriptedDetail::new());
    let (controller, events) = DetailController::spawn(script.clone(), id);
    (script, controller, events)
}

async fn next_rows(events: &mut UnboundedReceiver<DetailEvent>) -> Vec<DetailRow> {
    loop {
        match next_event(events).await {
            DetailEvent::Rows(rows) => return rows,
            DetailEvent::ErrorAlert(Some(alert)) => panic!("unexpected alert: {}", alert.message),
            _ => {}
        }
    }
}

async fn next_alert(events: &mut UnboundedReceiver<DetailEvent>) -> ErrorAlert {
    loop {
        match next_event(events).await {
            DetailEvent::ErrorAlert(Some(alert)) => return alert,
            DetailEvent::Rows(_) => panic!("expected an alert, got rows"),
            _ => {}
        }
    }
}

fn labels(rows: &[DetailRow]) -> Vec<(&str, &str)> {
    rows.iter().map(|r| (r.label.as_str(), r.value.as_str())).collect()
}

#[tokio::test]
async fn loads_rows_for_the_requested_object() {
    let (script, controller, mut events) = spawn("SK-A-2344");
    assert!(matches!(next_event(&mut events).await, DetailEvent::LoadingChanged(true)));

    let call = script.next_call().await;
    assert_eq!(call.id, "SK-A-2344");
    call.succeed(detail("SK-A-2344"));

    assert!(matches!(next_event(&mut events).await, DetailEvent::ErrorAlert(None)));
    let rows = match next_event(&mut events).await {
        DetailEvent::Rows(rows) => rows,
        other => panic!("expected rows, got {other:?}"),
    };
    assert_eq!(
        labels(&rows),
        vec![
            ("Object Number", "SK-A-2344"),
            ("Title", "Title of SK-A-2344"),
            ("Principal Maker", "Johannes Vermeer"),
        ]
    );
    assert!(matches!(next_event(&mut events).await, DetailEvent::LoadingChanged(false)));

    let snapshot = controller.snapshot().await.unwrap();
    assert_eq!(snapshot.id, "SK-A-2344");
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn failure_raises_alert_and_retry_reloads() {
    let (script, _controller, mut events) = spawn("SK-C-5");
    script
        .next_call()
        .await
        .fail(ApiError::UnexpectedStatus { status: 500 });

    let alert = next_alert(&mut events).await;
    assert_eq!(alert.title, "Error");
    assert_eq!(alert.message, "server responded with HTTP 500");
    assert!(matches!(next_event(&mut events).await, DetailEvent::LoadingChanged(false)));

    alert.retry();
    let call = script.next_call().await;
    assert_eq!(call.id, "SK-C-5");
    call.succeed(detail("SK-C-5"));
    assert_eq!(next_rows(&mut events).await[0].value, "SK-C-5");
    assert_eq!(script.call_count(), 2);
}

#[tokio::test]
async fn only_searchable_rows_request_a_search() {
    let (script, controller, mut events) = spawn("SK-A-2344");
    script.next_call().await.succeed(detail("SK-A-2344"));
    let rows = next_rows(&mut events).await;
    assert!(matches!(next_event(&mut events).await, DetailEvent::LoadingChanged(false)));

    let object_number = rows.iter().find(|r| r.label == "Object Number").unwrap();
    let maker = rows.iter().find(|r| r.label == "Principal Maker").unwrap();
    assert!(!object_number.allows_search);

    controller.on_row_activated(object_number);
    controller.snapshot().await.unwrap();
    assert!(events.try_recv().is_err(), "non-searchable row must not navigate");

    controller.on_row_activated(maker);
    match next_event(&mut events).await {
        DetailEvent::SearchFor { query } => assert_eq!(query, "Johannes Vermeer"),
        other => panic!("expected SearchFor, got {other:?}"),
    }
    script.assert_no_call().await;
}

#[tokio::test]
async fn newer_load_supersedes_older_one() {
    let (script, controller, mut events) = spawn("SK-A-1");
    let stale = script.next_call().await;

    controller.load("SK-A-2");
    let current = script.next_call().await;
    assert!(stale.cancel.is_cancelled());
    assert_eq!(controller.snapshot().await.unwrap().id, "SK-A-2");

    current.succeed(detail("SK-A-2"));
    assert_eq!(next_rows(&mut events).await[0].value, "SK-A-2");
    assert!(matches!(next_event(&mut events).await, DetailEvent::LoadingChanged(false)));

    stale.succeed(detail("SK-A-1"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.snapshot().await.unwrap();
    assert!(events.try_recv().is_err(), "stale result must not emit");
}

#[tokio::test]
async fn stale_retry_is_ignored_after_new_load() {
    let (script, controller, mut events) = spawn("SK-A-1");
    script.next_call().await.fail(ApiError::network("offline"));
    let alert = next_alert(&mut events).await;

    controller.load("SK-A-2");
    script.next_call().await.succeed(detail("SK-A-2"));
    next_rows(&mut events).await;

    alert.retry();
    controller.snapshot().await.unwrap();
    script.assert_no_call().await;
    assert_eq!(controller.snapshot().await.unwrap().id, "SK-A-2");
}

#[tokio::test]
async fn superseded_failure_raises_no_alert() {
    let (script, controller, mut events) = spawn("SK-A-1");
    let stale = script.next_call().await;

    controller.load("SK-A-2");
    let current = script.next_call().await;
    current.succeed(detail("SK-A-2"));
    assert_eq!(next_rows(&mut events).await[0].value, "SK-A-2");
    assert!(matches!(next_event(&mut events).await, DetailEvent::LoadingChanged(false)));

    stale.fail(ApiError::network("timed out"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    let snapshot = controller.snapshot().await.unwrap();
    assert!(events.try_recv().is_err(), "stale failure must not emit");
    assert_eq!(snapshot.id, "SK-A-2");
    assert!(!snapshot.is_loading);
}
