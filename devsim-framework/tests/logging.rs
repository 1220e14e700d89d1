//! Log output of the publish loop.
//!
//! Events are captured as JSON lines through a thread-local subscriber.
//! The tests use the current-thread runtime, so every spawned cycle logs
//! on the test thread.

use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tracing::Level;

use devsim_framework::{
    Connector, LifecycleController, OutboundMessage, PublisherSettings, Result, RunSummary,
    SimulatorError, TelemetryGenerator, Transport,
};

const CONNECTION_STRING: &str = "Endpoint=tcp/127.0.0.1:7447;DeviceId=sim01";

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn events(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).expect("log line is JSON"))
            .collect()
    }
}

fn matching<'a>(events: &'a [Value], level: &str, message: &str) -> Vec<&'a Value> {
    events
        .iter()
        .filter(|e| e["level"] == level && e["fields"]["message"] == message)
        .collect()
}

struct StubTransport {
    fail: bool,
}

impl Transport for StubTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<()> {
        if self.fail {
            Err(SimulatorError::send(&message.message_id, "service unavailable"))
        } else {
            Ok(())
        }
    }

    async fn close(&self) {}
}

struct StubConnector {
    fail_sends: bool,
}

impl Connector for StubConnector {
    type Transport = StubTransport;

    async fn connect(&self, _connection_string: &str) -> Result<StubTransport> {
        Ok(StubTransport {
            fail: self.fail_sends,
        })
    }
}

/// Run three intervals with a capturing subscriber installed.
async fn run_three_intervals(log_telemetry: bool, fail_sends: bool) -> (RunSummary, Vec<Value>) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let settings = PublisherSettings::new(CONNECTION_STRING)
        .with_send_interval(Duration::from_millis(1000))
        .with_log_telemetry(log_telemetry);
    settings.validate().unwrap();

    let controller = LifecycleController::new(
        settings,
        StubConnector { fail_sends },
        TelemetryGenerator::seeded(5),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let run = tokio::spawn(controller.run(shutdown_rx));

    tokio::time::sleep(Duration::from_millis(3500)).await;
    shutdown_tx.send(true).unwrap();
    let summary = run.await.unwrap().expect("run should succeed");

    (summary, captured.events())
}

#[tokio::test(start_paused = true)]
async fn test_logging_on_emits_one_info_line_per_message() {
    let (summary, events) = run_three_intervals(true, false).await;
    assert_eq!(summary.publish.sent, 3);

    let lines = matching(&events, "INFO", "Sending telemetry");
    assert_eq!(lines.len(), 3);

    let ids: HashSet<&str> = lines
        .iter()
        .map(|e| e["fields"]["message_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 3);

    for line in &lines {
        let body: Value =
            serde_json::from_str(line["fields"]["body"].as_str().unwrap()).unwrap();
        assert!(body["Temperature"].is_f64());
        assert!(body["Humidity"].is_f64());
    }

    let stats = matching(&events, "INFO", "Final statistics");
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0]["fields"]["success_rate"], "100.0%");
}

#[tokio::test(start_paused = true)]
async fn test_logging_off_keeps_message_lines_at_debug() {
    let (summary, events) = run_three_intervals(false, false).await;
    assert_eq!(summary.publish.sent, 3);

    assert!(matching(&events, "INFO", "Sending telemetry").is_empty());
    assert_eq!(matching(&events, "DEBUG", "Sending telemetry").len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_sends_are_logged_as_warnings() {
    let (summary, events) = run_three_intervals(false, true).await;
    assert_eq!(summary.publish.failed, 3);

    let warnings = matching(&events, "WARN", "Telemetry send error");
    assert_eq!(warnings.len(), 3);
    for warning in warnings {
        let error = warning["fields"]["error"].as_str().unwrap();
        assert!(error.contains("service unavailable"));
    }

    let stats = matching(&events, "INFO", "Final statistics");
    assert_eq!(stats[0]["fields"]["success_rate"], "0.0%");
}
