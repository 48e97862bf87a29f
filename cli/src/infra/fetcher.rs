//! HTTP implementation of the `ArtifactFetcher` port.
//!
//! Downloads stream through a `.partial` sibling that is renamed into place
//! on completion, so an interrupted transfer never leaves a file at the
//! destination that a later run would mistake for a finished download.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::application::ports::{ArtifactFetcher, FetchOutcome};
use crate::domain::BootstrapError;
use crate::infra::fs::set_executable;

const CHUNK_SIZE: usize = 64 * 1024;

/// Production fetcher backed by `ureq`.
///
/// The timeout bounds the whole request, body included. The blocking
/// transfer runs on tokio's blocking pool.
pub struct HttpFetcher {
    agent: ureq::Agent,
    progress: Option<MultiProgress>,
}

impl HttpFetcher {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("argoboot/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            progress: None,
        }
    }

    /// Draw a progress bar per download under `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: MultiProgress) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<FetchOutcome> {
        if dest.exists() {
            // A run that died mid-install may have left the mode unset.
            set_executable(dest)?;
            return Ok(FetchOutcome::AlreadyPresent);
        }

        tracing::info!(%url, dest = %dest.display(), "downloading");
        let agent = self.agent.clone();
        let progress = self.progress.clone();
        let url_owned = url.to_string();
        let dest_owned = dest.to_path_buf();
        let bytes = tokio::task::spawn_blocking(move || {
            download(&agent, &url_owned, &dest_owned, progress.as_ref())
        })
        .await
        .context("spawn_blocking for download")??;

        Ok(FetchOutcome::Downloaded { bytes })
    }
}

fn download(
    agent: &ureq::Agent,
    url: &str,
    dest: &Path,
    progress: Option<&MultiProgress>,
) -> Result<u64, BootstrapError> {
    let failed = |reason: String| BootstrapError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let response = match agent.get(url).call() {
        Ok(r) => r,
        Err(ureq::Error::Status(code, _)) => return Err(failed(format!("HTTP {code}"))),
        Err(ureq::Error::Transport(t)) => return Err(failed(t.to_string())),
    };

    let total = response
        .header("Content-Length")
        .and_then(|v| v.parse::<u64>().ok());
    let partial = partial_path(dest);
    let mut file = open_truncated(&partial).map_err(|e| failed(format!("{e:#}")))?;
    let pb = make_progress_bar(progress, total, dest);

    let mut reader = response.into_reader();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut written = 0u64;
    let copied = loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break Ok(()),
            Ok(n) => n,
            Err(e) => break Err(e),
        };
        if let Err(e) = file.write_all(&buf[..n]) {
            break Err(e);
        }
        written += n as u64;
        pb.inc(n as u64);
    };
    pb.finish_and_clear();
    drop(file);

    if let Err(e) = copied {
        std::fs::remove_file(&partial).ok();
        return Err(failed(format!("transfer interrupted: {e}")));
    }
    set_executable(&partial).map_err(|e| failed(format!("{e:#}")))?;
    std::fs::rename(&partial, dest).map_err(|e| failed(format!("finalizing download: {e}")))?;
    Ok(written)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut s = dest.as_os_str().to_owned();
    s.push(".partial");
    PathBuf::from(s)
}

fn open_truncated(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))
}

#[allow(clippy::expect_used)] // Templates are compile-time constants
fn make_progress_bar(progress: Option<&MultiProgress>, total: Option<u64>, dest: &Path) -> ProgressBar {
    let Some(multi) = progress else {
        return ProgressBar::hidden();
    };
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let pb = match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  {msg:16} {bar:40.cyan/dim} {percent}%  {bytes}/{total_bytes}")
                    .expect("valid template")
                    .progress_chars("━━─"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };
    pb.set_message(name);
    multi.add(pb)
}
