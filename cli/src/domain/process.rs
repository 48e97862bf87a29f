//! Launch requests for the two background services.

use std::path::{Path, PathBuf};

/// Where a launched process's stdout/stderr go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPolicy {
    /// Both streams go to the null device.
    Discard,
    /// Both streams are appended to this file.
    AppendTo(PathBuf),
}

/// A request to start a background process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisedProcess {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub output: OutputPolicy,
    /// Run in its own process group so it outlives the orchestrator.
    pub detached: bool,
}

impl SupervisedProcess {
    /// `sing-box run -c <config>`, output discarded.
    #[must_use]
    pub fn proxy(binary: &Path, config: &Path) -> Self {
        Self {
            program: binary.to_path_buf(),
            args: vec![
                "run".to_string(),
                "-c".to_string(),
                config.display().to_string(),
            ],
            output: OutputPolicy::Discard,
            detached: true,
        }
    }

    /// `cloudflared tunnel --url http://localhost:<port> --loglevel info`,
    /// output appended to `log`.
    #[must_use]
    pub fn tunnel(binary: &Path, local_port: u16, log: &Path) -> Self {
        Self {
            program: binary.to_path_buf(),
            args: vec![
                "tunnel".to_string(),
                "--url".to_string(),
                format!("http://localhost:{local_port}"),
                "--loglevel".to_string(),
                "info".to_string(),
            ],
            output: OutputPolicy::AppendTo(log.to_path_buf()),
            detached: true,
        }
    }

    /// Short name for messages: the program's file name.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.program.file_name().map_or_else(
            || self.program.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }
}

/// Receipt for a launched process. Liveness is not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchedProcess {
    pub pid: u32,
}
