//! The submit client talking to the real server.

mod common;

use canvas_client::{SubmitClient, SubmitError, SubmitOutcome};
use canvas_core::ErrorKind;
use serde_json::json;

use common::{drawn_surface, Scripted, TestServer};

#[tokio::test]
async fn test_submit_shows_result_and_carries_assignments() {
    let assign = Scripted::reply(r#"[{"expr":"x","result":5,"assign":true}]"#);
    let server = TestServer::start(assign).await;
    let client = SubmitClient::new(server.base_url()).expect("client");
    let mut surface = drawn_surface();

    let outcome = client.submit(&mut surface).await.expect("submit");

    assert!(matches!(outcome, SubmitOutcome::Displayed(_)));
    assert!(surface.is_blank());
    assert_eq!(surface.overlay(), Some("x=5"));
    assert_eq!(client.variables().get("x"), Some(&json!(5)));
    server.shutdown().await;
}

#[tokio::test]
async fn test_variables_from_client_reach_service() {
    let service = Scripted::reply(r#"[{"expr":"x*2","result":10}]"#);
    let server = TestServer::start(service.clone()).await;
    let client = SubmitClient::new(server.base_url()).expect("client");
    client.set_variable("x", json!(5));
    let mut surface = drawn_surface();

    client.submit(&mut surface).await.expect("submit");

    assert!(service.last_prompt().unwrap().contains(r#"{"x":5}"#));
    assert_eq!(surface.overlay(), Some("x*2=10"));
    server.shutdown().await;
}

#[tokio::test]
async fn test_unusable_assignment_name_does_not_block_later_submits() {
    let server = TestServer::start(Scripted::reply(
        r#"[{"expr":"f(x)","result":3,"assign":true}]"#,
    ))
    .await;
    let client = SubmitClient::new(server.base_url()).expect("client");

    for attempt in 0..3 {
        let mut surface = drawn_surface();
        let outcome = client.submit(&mut surface).await;
        assert!(
            matches!(outcome, Ok(SubmitOutcome::Displayed(_))),
            "attempt {attempt}: {outcome:?}"
        );
        assert_eq!(surface.overlay(), Some("f(x)=3"));
    }
    assert!(client.variables().is_empty());
    server.shutdown().await;
}

#[tokio::test]
async fn test_parse_failure_leaves_drawing_for_retry() {
    let server = TestServer::start(Scripted::reply("sorry, I can't read that")).await;
    let client = SubmitClient::new(server.base_url()).expect("client");
    let mut surface = drawn_surface();

    let err = client.submit(&mut surface).await.expect_err("should fail");

    assert!(matches!(
        err,
        SubmitError::Endpoint { status: 500, kind: Some(ErrorKind::ReasoningParseFailure), .. }
    ));
    assert!(!surface.is_blank());
    assert!(!client.is_loading());
    server.shutdown().await;
}

#[tokio::test]
async fn test_save_only_server() {
    let server = TestServer::start_save_only().await;
    let client = SubmitClient::new(server.base_url()).expect("client");
    let mut surface = drawn_surface();

    let outcome = client.submit(&mut surface).await.expect("submit");

    assert!(matches!(outcome, SubmitOutcome::Saved(_)));
    assert!(surface.is_blank());
    assert_eq!(surface.overlay(), None);
    server.shutdown().await;
}
