//! Hosting platform contract: the listener port and the relationships blob.
//!
//! Both values are required. The relationships blob is decoded and validated
//! once at startup and never consulted by request handling.

use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    string::FromUtf8Error,
};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Map, Value};
use thiserror::Error;

pub const PORT_VAR: &str = "PORT";
pub const RELATIONSHIPS_VAR: &str = "PLATFORM_RELATIONSHIPS";

const LISTEN_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("environment variable `{0}` is not set")]
    Missing(&'static str),
    #[error("`PORT` must be a port number between 1 and 65535, got `{value}`")]
    InvalidPort { value: String },
    #[error("`PLATFORM_RELATIONSHIPS` is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("`PLATFORM_RELATIONSHIPS` does not decode to UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("`PLATFORM_RELATIONSHIPS` is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`PLATFORM_RELATIONSHIPS` must decode to a JSON object")]
    NotAnObject,
}

/// Process-wide platform configuration, immutable after startup.
#[derive(Debug, Clone)]
pub struct PlatformEnv {
    port: u16,
    relationships: Map<String, Value>,
}

impl PlatformEnv {
    pub fn from_env() -> Result<Self, PlatformError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the contract through `lookup`, relationships first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PlatformError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let encoded =
            lookup(RELATIONSHIPS_VAR).ok_or(PlatformError::Missing(RELATIONSHIPS_VAR))?;
        let relationships = decode_relationships(&encoded)?;

        let raw_port = lookup(PORT_VAR).ok_or(PlatformError::Missing(PORT_VAR))?;
        let port = parse_port(&raw_port)?;

        Ok(Self {
            port,
            relationships,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Loopback only; exposing the service is left to the platform's router.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(LISTEN_HOST, self.port)
    }

    pub fn relationships(&self) -> &Map<String, Value> {
        &self.relationships
    }
}

fn decode_relationships(encoded: &str) -> Result<Map<String, Value>, PlatformError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    let json = String::from_utf8(bytes)?;
    match serde_json::from_str::<Value>(&json)? {
        Value::Object(map) => Ok(map),
        _ => Err(PlatformError::NotAnObject),
    }
}

fn parse_port(raw: &str) -> Result<u16, PlatformError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(PlatformError::InvalidPort {
            value: raw.to_string(),
        }),
    }
}
