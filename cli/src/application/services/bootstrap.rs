//! Application service: end-to-end bootstrap use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{
    ArchiveInstaller, ArtifactFetcher, DomainDiscoverer, FetchOutcome, LocalFs, ProcessLauncher,
    ProgressReporter,
};
use crate::domain::artifact::{ArtifactKind, ArtifactSpec, CLOUDFLARED, InstallationState, SINGBOX};
use crate::domain::{
    BootstrapConfig, BootstrapError, ConnectionLink, DiscoveryResult, SupervisedProcess,
    TLS_EDGE_PORT, synthesize,
};

/// Outcome of the `bootstrap` use-case.
#[derive(Debug)]
pub enum BootstrapOutcome {
    /// Both services are running and the tunnel hostname is known.
    Ready { link: ConnectionLink },
    /// Both services were launched but no hostname appeared in the log.
    HostNotFound { log: PathBuf, attempts: u32 },
}

/// Collaborators the bootstrap drives.
pub struct BootstrapPorts<'a, F, I, L, P, D> {
    pub fetcher: &'a F,
    pub installer: &'a I,
    pub local_fs: &'a L,
    pub launcher: &'a P,
    pub discoverer: &'a D,
}

/// Provision both binaries, start sing-box and cloudflared, and discover the
/// tunnel hostname.
///
/// sing-box is launched only after its config is fully written, and
/// cloudflared only after sing-box. If cloudflared fails to launch, the
/// already running sing-box is terminated before the error propagates.
///
/// # Errors
///
/// Returns an error if any fetch, install, config write, or launch fails.
/// A discovery timeout is not an error; it yields
/// [`BootstrapOutcome::HostNotFound`].
pub async fn bootstrap<F, I, L, P, D>(
    ports: BootstrapPorts<'_, F, I, L, P, D>,
    config: &BootstrapConfig,
    reporter: &impl ProgressReporter,
) -> Result<BootstrapOutcome>
where
    F: ArtifactFetcher,
    I: ArchiveInstaller,
    L: LocalFs,
    P: ProcessLauncher,
    D: DomainDiscoverer,
{
    let BootstrapPorts { fetcher, installer, local_fs, launcher, discoverer } = ports;

    local_fs
        .create_dir_all(&config.work_dir)
        .await
        .context("preparing work directory")?;

    // Step 1: Fetch both artifacts concurrently; the archive is installed
    // as soon as it lands.
    reporter.step("fetching sing-box and cloudflared...");
    let singbox = config.singbox_artifact();
    let cloudflared = config.cloudflared_artifact();
    let (singbox_bin, cloudflared_bin) = tokio::try_join!(
        acquire(fetcher, installer, &singbox),
        acquire(fetcher, installer, &cloudflared),
    )?;
    let mut installed = InstallationState::new();
    installed.record(SINGBOX, singbox_bin)?;
    installed.record(CLOUDFLARED, cloudflared_bin)?;
    reporter.success("binaries ready");

    // Step 2: Write the proxy config, replacing any previous one.
    let config_path = config.config_path();
    let document = synthesize(&config.credential, config.listen_port, &config.transport_path())
        .to_document()
        .context("serializing proxy config")?;
    local_fs
        .write_replace(&config_path, &document)
        .await
        .map_err(|e| BootstrapError::ConfigWriteFailed {
            path: config_path.clone(),
            reason: format!("{e:#}"),
        })?;
    tracing::info!(path = %config_path.display(), "proxy config written");

    // Step 3: Launch sing-box, then cloudflared.
    reporter.step("starting sing-box...");
    let proxy = SupervisedProcess::proxy(installed.executable(SINGBOX)?, &config_path);
    let proxy_handle = launcher.launch(&proxy)?;
    tracing::info!(pid = proxy_handle.pid, "sing-box launched");

    reporter.step("starting cloudflared...");
    let log_path = config.tunnel_log_path();
    let tunnel = SupervisedProcess::tunnel(
        installed.executable(CLOUDFLARED)?,
        config.listen_port,
        &log_path,
    );
    let tunnel_handle = match launcher.launch(&tunnel) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!(pid = proxy_handle.pid, "tunnel launch failed; stopping sing-box");
            if let Err(stop_err) = launcher.terminate(proxy_handle) {
                tracing::warn!(error = %stop_err, "could not stop sing-box");
            }
            return Err(e);
        }
    };
    tracing::info!(pid = tunnel_handle.pid, log = %log_path.display(), "cloudflared launched");

    // Step 4: Wait for the tunnel to announce its hostname.
    reporter.step("waiting for tunnel hostname...");
    match discoverer.discover().await {
        DiscoveryResult::Found(host) => {
            reporter.success(&format!("tunnel hostname: {host}"));
            let link = ConnectionLink::new(
                &config.credential,
                &host,
                TLS_EDGE_PORT,
                &config.transport_path(),
            );
            Ok(BootstrapOutcome::Ready { link })
        }
        DiscoveryResult::NotFound { attempts } => Ok(BootstrapOutcome::HostNotFound {
            log: log_path,
            attempts,
        }),
    }
}

/// Fetch one artifact and, for archives, install its binary. Returns the
/// executable path.
async fn acquire(
    fetcher: &impl ArtifactFetcher,
    installer: &impl ArchiveInstaller,
    spec: &ArtifactSpec,
) -> Result<PathBuf> {
    match fetcher.fetch(&spec.url, &spec.destination).await? {
        FetchOutcome::AlreadyPresent => {
            tracing::info!(artifact = %spec.name, path = %spec.destination.display(), "already present, skipping download");
        }
        FetchOutcome::Downloaded { bytes } => {
            tracing::info!(artifact = %spec.name, bytes, "downloaded");
        }
    }

    match &spec.kind {
        ArtifactKind::Binary => Ok(spec.destination.clone()),
        ArtifactKind::Archive { entry_prefix, binary_name } => {
            let dest_dir = spec
                .destination
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default();
            installer
                .install(&spec.destination, &dest_dir, entry_prefix, binary_name)
                .await
        }
    }
}
