//! Filesystem infrastructure: implements `LocalFs`, `LogSource`, and raw
//! file ops.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::LogSource;

/// Production filesystem implementation of the `LocalFs` port.
pub struct LocalFs;

impl crate::application::ports::LocalFs for LocalFs {
    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path)
            .await
            .with_context(|| format!("creating directory {}", path.display()))
    }

    async fn write_replace(&self, path: &Path, content: &str) -> Result<()> {
        let tmp = {
            let mut s = path.as_os_str().to_owned();
            s.push(".tmp");
            PathBuf::from(s)
        };
        tokio::fs::write(&tmp, content)
            .await
            .with_context(|| format!("writing file {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("replacing {}", path.display()))
    }
}

/// The tunnel client's log file, read whole on each poll.
pub struct TunnelLog {
    path: PathBuf,
}

impl TunnelLog {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl LogSource for TunnelLog {
    async fn read_all(&self) -> Result<Option<String>> {
        match tokio::fs::read(&self.path).await {
            // cloudflared may be mid-write; tolerate a split UTF-8 sequence.
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Set mode `0o755` on `path`. No-op off Unix.
///
/// # Errors
///
/// Returns an error if the permissions cannot be changed.
pub fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .with_context(|| format!("setting permissions on {}", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
