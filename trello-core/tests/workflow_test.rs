// Workflow runner behavior: ordering, state threading, abort semantics

mod common;

use common::{request_count, request_line, spawn_stub_api, StubResponse};
use std::sync::Arc;
use trello_core::auth::Credentials;
use trello_core::client::TrelloClient;
use trello_core::config::ConfigStore;
use trello_core::error::TrelloError;
use trello_core::http::{HttpConfig, NoopPacer};
use trello_core::workflow::{board_lifecycle, Step, StepFuture, WorkflowRunner};

fn stub_runner(base_url: &str) -> WorkflowRunner {
    let client = TrelloClient::builder()
        .credentials(Credentials::new("test-key", "test-token"))
        .config(
            HttpConfig::builder()
                .base_url(base_url)
                .timeout(std::time::Duration::from_secs(2))
                .build(),
        )
        .pacer(Arc::new(NoopPacer))
        .build()
        .expect("client should build");
    WorkflowRunner::new(client)
}

fn lifecycle_store() -> ConfigStore {
    let mut store = ConfigStore::new();
    store.set("boardName", "rust-board");
    store.set("listName", "rust-list");
    store.set("cardName1", "rust-card-1");
    store.set("cardName2", "rust-card-2");
    store
}

#[tokio::test]
async fn full_lifecycle_threads_ids_through_the_store() {
    let (base_url, log) = spawn_stub_api(vec![
        StubResponse::ok(r#"{"id":"board-1"}"#),
        StubResponse::ok(r#"{"id":"list-1"}"#),
        StubResponse::ok(r#"{"id":"card-1"}"#),
        StubResponse::ok(r#"{"id":"card-2"}"#),
        StubResponse::ok(r#"{"id":"card-1"}"#),
        StubResponse::ok("{}"),
        StubResponse::ok("{}"),
        StubResponse::ok("{}"),
    ])
    .await;
    let runner = stub_runner(&base_url);
    let mut store = lifecycle_store();

    let report = runner
        .run_board_lifecycle(&mut store)
        .await
        .expect("all eight steps should pass");

    assert_eq!(report.completed.len(), 8);
    assert_eq!(store.get("boardId").unwrap(), "board-1");
    assert_eq!(store.get("listId").unwrap(), "list-1");
    assert_eq!(store.get("cardId1").unwrap(), "card-1");
    assert_eq!(store.get("cardId2").unwrap(), "card-2");

    // ids created upstream are threaded into downstream requests
    assert!(request_line(&log, 1).contains("idBoard=board-1"));
    assert!(request_line(&log, 2).contains("idList=list-1"));
    assert!(request_line(&log, 5).starts_with("DELETE /cards/card-1?"));
    assert!(request_line(&log, 6).starts_with("DELETE /cards/card-2?"));
    assert!(request_line(&log, 7).starts_with("DELETE /boards/board-1?"));
}

#[tokio::test]
async fn update_step_always_targets_the_first_card() {
    // The random draw is degenerate, so every run must PUT card 1.
    let (base_url, log) = spawn_stub_api(vec![
        StubResponse::ok(r#"{"id":"board-1"}"#),
        StubResponse::ok(r#"{"id":"list-1"}"#),
        StubResponse::ok(r#"{"id":"card-1"}"#),
        StubResponse::ok(r#"{"id":"card-2"}"#),
        StubResponse::ok(r#"{"id":"card-1"}"#),
        StubResponse::ok("{}"),
        StubResponse::ok("{}"),
        StubResponse::ok("{}"),
    ])
    .await;
    let runner = stub_runner(&base_url);
    let mut store = lifecycle_store();

    runner
        .run_board_lifecycle(&mut store)
        .await
        .expect("lifecycle should pass");

    let put = request_line(&log, 4);
    assert!(put.starts_with("PUT /cards/card-1?"), "got: {put}");
    assert!(put.contains("name=Trello+Card+Updated") || put.contains("name=Trello%20Card%20Updated"));
}

#[tokio::test]
async fn create_failure_writes_no_key_and_aborts_the_chain() {
    let (base_url, log) = spawn_stub_api(vec![StubResponse::status(500, "server error")]).await;
    let runner = stub_runner(&base_url);
    let mut store = lifecycle_store();

    let err = runner.run_board_lifecycle(&mut store).await.unwrap_err();
    assert!(matches!(err, TrelloError::Api { status: 500, .. }), "got {err:?}");

    assert!(!store.contains("boardId"));
    assert_eq!(request_count(&log), 1, "no further step may run");
}

#[tokio::test]
async fn mid_chain_failure_leaves_earlier_ids_in_place() {
    // create-board passes, create-list fails: the board id stays in the
    // store (no rollback) and nothing downstream runs.
    let (base_url, log) = spawn_stub_api(vec![
        StubResponse::ok(r#"{"id":"board-1"}"#),
        StubResponse::status(400, "invalid list"),
    ])
    .await;
    let runner = stub_runner(&base_url);
    let mut store = lifecycle_store();

    let err = runner.run_board_lifecycle(&mut store).await.unwrap_err();
    assert!(matches!(err, TrelloError::Api { status: 400, .. }));

    assert_eq!(store.get("boardId").unwrap(), "board-1");
    assert!(!store.contains("listId"));
    assert_eq!(request_count(&log), 2);
}

#[tokio::test]
async fn steps_cannot_run_before_their_predecessor() {
    let runner = stub_runner("http://127.0.0.1:1");
    let mut store = lifecycle_store();

    // starting at delete-card-1 skips its whole create prefix
    let steps = board_lifecycle();
    let err = runner.run(&steps[5..], &mut store).await.unwrap_err();
    assert!(matches!(err, TrelloError::Workflow { .. }), "got {err:?}");
}

fn delete_board_step<'a>(
    store: &'a mut ConfigStore,
    client: &'a TrelloClient,
) -> StepFuture<'a> {
    Box::pin(async move {
        let board_id = store.get("boardId")?.to_string();
        client.delete_board(&board_id).await
    })
}

#[tokio::test]
async fn delete_with_unset_id_fails_before_any_http_call() {
    // The client points at an unroutable address: if a request were
    // issued the error would be Network, not MissingKey.
    let runner = stub_runner("http://127.0.0.1:1");
    let mut store = ConfigStore::new();

    let steps = vec![Step::new("delete-board", None, delete_board_step)];
    let err = runner.run(&steps, &mut store).await.unwrap_err();
    assert!(
        matches!(err, TrelloError::MissingKey { ref key } if key == "boardId"),
        "got {err:?}"
    );
}
