//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod artifact;
pub mod config;
pub mod discovery;
pub mod error;
pub mod link;
pub mod process;
pub mod proxy_config;

pub use artifact::{ArtifactKind, ArtifactSpec, InstallationState};
pub use config::BootstrapConfig;
pub use discovery::{DiscoveryResult, PollSettings, extract_hostname};
pub use error::BootstrapError;
pub use link::{ConnectionLink, TLS_EDGE_PORT};
pub use process::{LaunchedProcess, OutputPolicy, SupervisedProcess};
pub use proxy_config::{ProxyConfig, synthesize};
