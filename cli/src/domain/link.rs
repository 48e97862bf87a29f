//! VLESS share-link rendering.

use std::fmt;

use url::form_urlencoded::byte_serialize;

/// Port the tunnel edge terminates TLS on.
pub const TLS_EDGE_PORT: u16 = 443;

/// Fragment label shown by clients.
pub const LINK_LABEL: &str = "Argo-VLESS";

/// Everything a client needs to connect through the tunnel.
///
/// Rendered with `Display`:
/// `vless://<credential>@<host>:<port>?encryption=none&security=tls&type=ws&host=<host>&path=<path>#Argo-VLESS`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionLink {
    credential: String,
    host: String,
    port: u16,
    path: String,
}

impl ConnectionLink {
    #[must_use]
    pub fn new(credential: &str, host: &str, port: u16, path: &str) -> Self {
        Self {
            credential: credential.to_string(),
            host: host.to_string(),
            port,
            path: path.to_string(),
        }
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for ConnectionLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: String = byte_serialize(self.path.as_bytes()).collect();
        write!(
            f,
            "vless://{cred}@{host}:{port}?encryption=none&security=tls&type=ws&host={host}&path={path}#{LINK_LABEL}",
            cred = self.credential,
            host = self.host,
            port = self.port,
        )
    }
}
