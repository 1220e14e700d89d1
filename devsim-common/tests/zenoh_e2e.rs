//! End-to-end tests with a local Zenoh session.
//!
//! Note: Zenoh requires multi-thread tokio runtime.
//! Each test uses a unique key prefix to avoid interference.

use std::time::Duration;

use devsim_common::{OutboundMessage, Reading, ZenohConfig, connect, telemetry_key};

/// Generate a unique test prefix to avoid test interference.
fn unique_prefix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test_{}", nanos)
}

/// A peer session opened through `connect` can publish and receive readings.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_peer_session_pubsub_reading() {
    let prefix = unique_prefix();

    let config = ZenohConfig {
        mode: "peer".to_string(),
        ..Default::default()
    };
    let session = connect(&config, Duration::from_secs(10))
        .await
        .expect("Failed to open Zenoh session");

    let key = telemetry_key(&prefix, "sim01");
    let subscriber = session
        .declare_subscriber(&key)
        .await
        .expect("Failed to create subscriber");

    tokio::time::sleep(Duration::from_millis(100)).await;

    let message = OutboundMessage::from_reading(&Reading::new(18.5, 42.0)).unwrap();
    session
        .put(&key, message.payload())
        .await
        .expect("Failed to publish");

    let received = tokio::time::timeout(Duration::from_secs(5), subscriber.recv_async())
        .await
        .expect("Timeout waiting for message")
        .expect("Failed to receive message");

    let payload = received.payload().to_bytes();
    let reading: Reading = serde_json::from_slice(&payload).expect("Failed to decode");
    assert_eq!(reading, Reading::new(18.5, 42.0));

    drop(subscriber);
    session.close().await.expect("Failed to close session");
}

/// A client session pointed at a closed port never comes up.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_client_connect_to_unreachable_endpoint_fails() {
    let config = ZenohConfig {
        mode: "client".to_string(),
        connect: vec!["tcp/127.0.0.1:1".to_string()],
    };

    let result = connect(&config, Duration::from_secs(3)).await;
    assert!(result.is_err());
}

/// A peer with an explicit endpoint must reach it, like a client.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_peer_connect_to_unreachable_endpoint_fails() {
    let config = ZenohConfig {
        mode: "peer".to_string(),
        connect: vec!["tcp/127.0.0.1:1".to_string()],
    };

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        connect(&config, Duration::from_secs(2)),
    )
    .await
    .expect("connect must give up on its own");
    assert!(result.is_err());
}
