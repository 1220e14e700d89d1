//! Device connection strings.
//!
//! A connection string is a list of `Key=Value` pairs separated by `;`:
//!
//! ```text
//! Endpoint=tcp/10.0.0.1:7447;DeviceId=sim01;Mode=client
//! ```
//!
//! Keys are case-insensitive. `Endpoint` may be repeated or hold a
//! comma-separated list of Zenoh locators. `Mode` defaults to `client`.

use std::fmt;
use std::str::FromStr;

use crate::config::ZenohConfig;
use crate::error::{Error, Result};
use crate::keyexpr::validate_chunk;

/// Zenoh mode a simulated device connects with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionMode {
    /// Connect to a router (default).
    #[default]
    Client,
    /// Join the network as a peer.
    Peer,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Client => "client",
            SessionMode::Peer => "peer",
        }
    }
}

impl FromStr for SessionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "client" => Ok(SessionMode::Client),
            "peer" => Ok(SessionMode::Peer),
            other => Err(Error::ConnectionString(format!(
                "unsupported Mode '{}', expected 'client' or 'peer'",
                other
            ))),
        }
    }
}

/// Parsed device connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    /// Zenoh locators to connect to.
    pub endpoints: Vec<String>,
    /// Identifier of the simulated device.
    pub device_id: String,
    /// Session mode.
    pub mode: SessionMode,
}

impl ConnectionString {
    /// Parse a connection string.
    pub fn parse(input: &str) -> Result<Self> {
        let mut endpoints = Vec::new();
        let mut device_id: Option<String> = None;
        let mut mode: Option<SessionMode> = None;

        for part in input.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                Error::ConnectionString(format!("segment '{}' is not a Key=Value pair", part))
            })?;
            let value = value.trim();

            if value.is_empty() {
                return Err(Error::ConnectionString(format!(
                    "empty value for '{}'",
                    key.trim()
                )));
            }

            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoints.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|e| !e.is_empty())
                        .map(String::from),
                ),
                "deviceid" => {
                    if device_id.is_some() {
                        return Err(Error::ConnectionString(
                            "DeviceId specified more than once".to_string(),
                        ));
                    }
                    validate_chunk(value)
                        .map_err(|e| Error::ConnectionString(format!("DeviceId: {}", e)))?;
                    device_id = Some(value.to_string());
                }
                "mode" => {
                    if mode.is_some() {
                        return Err(Error::ConnectionString(
                            "Mode specified more than once".to_string(),
                        ));
                    }
                    mode = Some(value.parse()?);
                }
                other => {
                    return Err(Error::ConnectionString(format!("unknown key '{}'", other)));
                }
            }
        }

        if endpoints.is_empty() {
            return Err(Error::ConnectionString(
                "at least one Endpoint is required".to_string(),
            ));
        }

        let device_id = device_id
            .ok_or_else(|| Error::ConnectionString("DeviceId is required".to_string()))?;

        Ok(Self {
            endpoints,
            device_id,
            mode: mode.unwrap_or_default(),
        })
    }

    /// Build the Zenoh session configuration for this device.
    pub fn zenoh_config(&self) -> ZenohConfig {
        ZenohConfig {
            mode: self.mode.as_str().to_string(),
            connect: self.endpoints.clone(),
        }
    }
}

impl FromStr for ConnectionString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Endpoint={};DeviceId={};Mode={}",
            self.endpoints.join(","),
            self.device_id,
            self.mode.as_str()
        )
    }
}
