//! Counters endpoint.

use axum::body::Body;
use axum::http::{Method, StatusCode};
use tower::ServiceExt; // .oneshot()

use blob_node::observability::HandlerKind;

mod common;

use common::{body_string, identity, request, TestNode};

#[tokio::test]
async fn stat_lists_counters_and_config() {
    let node = TestNode::new(identity("NS1", "/srv/vol1", "SRV1", ""), false);
    let app = node.router(false);

    app.clone().oneshot(request(Method::GET, "/info", Body::empty())).await.unwrap();
    let resp = app.oneshot(request(Method::GET, "/stat", Body::empty())).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_string(resp).await,
        "counter req.hits 1\nconfig volume /srv/vol1\nconfig service_id SRV1\n"
    );

    let kinds: Vec<_> = node.stats.calls().iter().map(|(k, _)| *k).collect();
    assert_eq!(kinds, vec![HandlerKind::Info, HandlerKind::Stat]);
}

#[tokio::test]
async fn stat_is_served_while_unhealthy() {
    let node = TestNode::new(identity("NS1", "/srv/vol1", "", ""), false);
    node.health.set_healthy(false);

    let resp = node
        .router(false)
        .oneshot(request(Method::GET, "/stat", Body::empty()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(*node.health.checks.lock().unwrap(), 0);
}

#[tokio::test]
async fn stat_rejects_writes() {
    let node = TestNode::new(identity("NS1", "/srv/vol1", "", ""), true);
    let resp = node
        .router(false)
        .oneshot(request(Method::PUT, "/stat", Body::from("x")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(node.stats.calls().len(), 1);

    let events = node.log.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].path, "/stat");
    assert_eq!(events[0].bytes_in, 1);
}

#[tokio::test]
async fn unknown_path_echoes_client_request_id() {
    let node = TestNode::new(identity("NS1", "/srv/vol1", "", ""), false);
    let req = axum::http::Request::builder()
        .uri("/chunk/0123")
        .header("x-request-id", "client-7")
        .body(Body::empty())
        .unwrap();

    let resp = node.router(false).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers()["x-request-id"], "client-7");
}

#[tokio::test]
async fn unknown_path_is_not_accounted() {
    let node = TestNode::new(identity("NS1", "/srv/vol1", "", ""), true);
    let resp = node
        .router(false)
        .oneshot(request(Method::GET, "/chunk/0123", Body::empty()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(!resp.headers().contains_key("x-request-id"));
    assert!(node.stats.calls().is_empty());
    assert!(node.log.events().is_empty());
}
