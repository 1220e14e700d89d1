//! Configuration failures are reported through tracing.

use std::io;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use devsim_framework::ErrorKind;
use zenoh_devsim::args::DevsimArgs;
use zenoh_devsim::config::DevsimConfig;

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

/// Build settings from CLI arguments and return the ERROR events logged.
fn error_events(args: &DevsimArgs) -> (ErrorKind, Vec<Value>) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(move || writer.clone())
        .finish();

    let err = tracing::subscriber::with_default(subscriber, || {
        DevsimConfig::from_args(args)
            .and_then(|config| config.publisher_settings())
            .unwrap_err()
    });

    let bytes = captured.0.lock().unwrap().clone();
    let events = String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap())
        .filter(|event| event["level"] == "ERROR")
        .collect();

    (err.kind(), events)
}

#[test]
fn test_empty_connection_string_logs_configuration_error() {
    let (kind, events) = error_events(&DevsimArgs {
        connection_string: Some(String::new()),
        ..Default::default()
    });

    assert_eq!(kind, ErrorKind::Configuration);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["fields"]["message"], "Configuration error");
    let error = events[0]["fields"]["error"].as_str().unwrap();
    assert!(error.contains("Connection string must be set"));
}

#[test]
fn test_short_interval_logs_configuration_error() {
    let (kind, events) = error_events(&DevsimArgs {
        connection_string: Some("Endpoint=tcp/127.0.0.1:7447;DeviceId=sim01".to_string()),
        send_interval: Some(500),
        ..Default::default()
    });

    assert_eq!(kind, ErrorKind::Configuration);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["fields"]["message"], "Configuration error");
    let error = events[0]["fields"]["error"].as_str().unwrap();
    assert!(error.contains("Send interval is too short"));
}
