//! sing-box server configuration synthesis.
//!
//! Pure functions only: the document is a deterministic function of its
//! inputs. Writing it to disk is the infra layer's job.

use serde::Serialize;

/// Early-data allowance on the WebSocket transport, in bytes.
pub const MAX_EARLY_DATA: u32 = 2048;

/// Wildcard bind address (all IPv4 and IPv6 interfaces).
pub const LISTEN_ANY: &str = "::";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level sing-box document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyConfig {
    pub log: LogSection,
    pub inbounds: Vec<Inbound>,
    pub outbounds: Vec<Outbound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogSection {
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inbound {
    #[serde(rename = "type")]
    pub kind: String,
    pub listen: String,
    pub listen_port: u16,
    pub users: Vec<User>,
    pub transport: Transport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transport {
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub max_early_data: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outbound {
    #[serde(rename = "type")]
    pub kind: String,
}

// ── Synthesis ────────────────────────────────────────────────────────────────

/// WebSocket path for a credential: `/<credential>`.
#[must_use]
pub fn transport_path(credential: &str) -> String {
    format!("/{credential}")
}

/// Build the server config: one VLESS-over-WebSocket inbound authorizing
/// exactly `credential`, and one direct outbound.
#[must_use]
pub fn synthesize(credential: &str, listen_port: u16, path: &str) -> ProxyConfig {
    ProxyConfig {
        log: LogSection {
            level: "error".to_string(),
        },
        inbounds: vec![Inbound {
            kind: "vless".to_string(),
            listen: LISTEN_ANY.to_string(),
            listen_port,
            users: vec![User {
                uuid: credential.to_string(),
            }],
            transport: Transport {
                kind: "ws".to_string(),
                path: path.to_string(),
                max_early_data: MAX_EARLY_DATA,
            },
        }],
        outbounds: vec![Outbound {
            kind: "direct".to_string(),
        }],
    }
}

impl ProxyConfig {
    /// Serialize as pretty-printed JSON, the form sing-box reads.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_document(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
