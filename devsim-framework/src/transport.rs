//! Connection to the ingestion endpoint.
//!
//! [`Connector`] establishes the session once at startup; the resulting
//! [`Transport`] is shared by every publish cycle and closed once on shutdown.
//! [`ZenohConnector`] / [`ZenohTransport`] are the production implementations.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use zenoh::bytes::Encoding;

use devsim_common::{ConnectionString, OutboundMessage, telemetry_key};

use crate::config::PublisherSettings;
use crate::error::{Result, SimulatorError};

/// An open session that can deliver outbound messages.
pub trait Transport: Send + Sync + 'static {
    /// Deliver one message.
    ///
    /// Failures are reported as [`SimulatorError::Send`].
    fn send(&self, message: &OutboundMessage) -> impl Future<Output = Result<()>> + Send;

    /// Close the session. Calling it more than once is a no-op.
    fn close(&self) -> impl Future<Output = ()> + Send;
}

/// Factory for [`Transport`] sessions.
pub trait Connector: Send + Sync {
    type Transport: Transport;

    /// Open a session for the given connection string.
    ///
    /// Failures are reported as [`SimulatorError::Connection`]; there is no
    /// retry.
    fn connect(
        &self,
        connection_string: &str,
    ) -> impl Future<Output = Result<Self::Transport>> + Send;
}

/// Opens Zenoh sessions for simulated devices.
#[derive(Debug, Clone)]
pub struct ZenohConnector {
    key_prefix: String,
    timeout: Duration,
}

impl ZenohConnector {
    pub fn new(key_prefix: impl Into<String>, timeout: Duration) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &PublisherSettings) -> Self {
        Self::new(settings.key_prefix.clone(), settings.connect_timeout)
    }
}

impl Connector for ZenohConnector {
    type Transport = ZenohTransport;

    async fn connect(&self, connection_string: &str) -> Result<ZenohTransport> {
        let credential = ConnectionString::parse(connection_string)
            .map_err(|e| SimulatorError::connection(e.to_string()))?;

        let session = devsim_common::connect(&credential.zenoh_config(), self.timeout)
            .await
            .map_err(|e| SimulatorError::connection(e.to_string()))?;

        let key = telemetry_key(&self.key_prefix, &credential.device_id);

        tracing::info!(
            device = %credential.device_id,
            key = %key,
            "Device session established"
        );

        Ok(ZenohTransport::new(session, key))
    }
}

/// Zenoh session publishing on a single telemetry key.
///
/// The body is sent with encoding `application/json;utf-8` and the message
/// identifier as the sample attachment.
#[derive(Debug)]
pub struct ZenohTransport {
    session: zenoh::Session,
    key: String,
    closed: AtomicBool,
}

impl ZenohTransport {
    pub fn new(session: zenoh::Session, key: impl Into<String>) -> Self {
        Self {
            session,
            key: key.into(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Transport for ZenohTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<()> {
        if self.is_closed() {
            return Err(SimulatorError::send(&message.message_id, "session closed"));
        }

        let encoding = Encoding::APPLICATION_JSON.with_schema(message.content_encoding);

        self.session
            .put(&self.key, message.payload())
            .encoding(encoding)
            .attachment(message.message_id.clone())
            .await
            .map_err(|e| SimulatorError::send(&message.message_id, e))
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Err(e) = self.session.close().await {
            tracing::warn!(error = %e, "Error closing Zenoh session");
        }
    }
}
