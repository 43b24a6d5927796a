//! End-to-end run of the node over a real socket.

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use blob_node::config::NodeConfig;
use blob_node::http::HttpServer;
use blob_node::lifecycle::Shutdown;

#[tokio::test]
async fn test_node_serves_info_and_stat() {
    let volume = tempfile::tempdir().unwrap();

    let mut config = NodeConfig::default();
    config.node.namespace = "NS1".into();
    config.node.volume = volume.path().to_string_lossy().into_owned();
    config.node.service_id = "SRV1".into();
    config.health.interval_secs = 1;
    config.observability.metrics_enabled = false;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config.clone());
    let verbosity = server.state().verbosity.clone();
    let server_shutdown = shutdown.subscribe();

    let server_task = tokio::spawn(async move {
        server.run(listener, config_updates, server_shutdown).await
    });

    tokio::time::sleep(Duration::from_millis(300)).await;

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    let res = client
        .get(format!("http://{}/info", addr))
        .header("x-request-id", "e2e-1")
        .send()
        .await
        .expect("Node unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-request-id"], "e2e-1");
    let expected = format!(
        "namespace NS1\npath {}\nservice_id SRV1\n",
        volume.path().display()
    );
    assert_eq!(res.text().await.unwrap(), expected);

    let res = client
        .head(format!("http://{}/info", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()["content-length"],
        expected.len().to_string().as_str()
    );

    let res = client
        .post(format!("http://{}/info", addr))
        .body("payload")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 405);

    let stat = client
        .get(format!("http://{}/stat", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(stat.contains("counter req.hits.info 3\n"), "{stat}");
    assert!(stat.contains("counter rep.hits.405 1\n"), "{stat}");
    assert!(stat.contains("counter rep.bread 7\n"), "{stat}");

    // Live reload flips the access log on
    let mut reloaded = config.clone();
    reloaded.observability.verbose = true;
    config_tx.send(reloaded).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(verbosity.is_enabled());

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), server_task)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_missing_volume_turns_node_unavailable() {
    let mut config = NodeConfig::default();
    config.node.volume = "/nonexistent/blob-node/volume".into();
    config.health.interval_secs = 1;
    config.health.unhealthy_threshold = 1;
    config.observability.metrics_enabled = false;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (_config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    // The first probe tick fires immediately
    tokio::time::sleep(Duration::from_millis(300)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .get(format!("http://{}/info", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 503);
    assert_eq!(res.text().await.unwrap(), "");

    shutdown.trigger();
}
