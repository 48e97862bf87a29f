//! Infrastructure implementation of the `ProcessLauncher` port.
//!
//! `DetachedLauncher` starts children in their own process group with stdin
//! closed. Handles are kept only so a failed bootstrap can stop what it
//! already started; dropping them neither kills nor waits on the child.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::process::Stdio;
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::application::ports::ProcessLauncher;
use crate::domain::{BootstrapError, LaunchedProcess, OutputPolicy, SupervisedProcess};

/// Production launcher using `tokio::process`.
#[derive(Default)]
pub struct DetachedLauncher {
    children: Mutex<HashMap<u32, tokio::process::Child>>,
}

impl DetachedLauncher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessLauncher for DetachedLauncher {
    fn launch(&self, process: &SupervisedProcess) -> Result<LaunchedProcess> {
        let program = process.display_name();
        let failed = |reason: String| BootstrapError::LaunchFailed {
            program: program.clone(),
            reason,
        };

        let (stdout, stderr) = match &process.output {
            OutputPolicy::Discard => (Stdio::null(), Stdio::null()),
            OutputPolicy::AppendTo(log) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(log)
                    .map_err(|e| failed(format!("opening {}: {e}", log.display())))?;
                let dup = file.try_clone().map_err(|e| failed(e.to_string()))?;
                (Stdio::from(file), Stdio::from(dup))
            }
        };

        let mut cmd = tokio::process::Command::new(&process.program);
        cmd.args(&process.args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .kill_on_drop(false);
        #[cfg(unix)]
        {
            if process.detached {
                cmd.process_group(0);
            }
        }

        let child = cmd.spawn().map_err(|e| failed(e.to_string()))?;
        let pid = child
            .id()
            .ok_or_else(|| failed("process exited before its pid was read".to_string()))?;
        self.children
            .lock()
            .map_err(|_| anyhow::anyhow!("launcher state poisoned"))?
            .insert(pid, child);
        tracing::debug!(%program, pid, args = ?process.args, "process spawned");
        Ok(LaunchedProcess { pid })
    }

    fn terminate(&self, process: LaunchedProcess) -> Result<()> {
        let mut child = self
            .children
            .lock()
            .map_err(|_| anyhow::anyhow!("launcher state poisoned"))?
            .remove(&process.pid)
            .with_context(|| format!("pid {} was not launched here", process.pid))?;
        child
            .start_kill()
            .with_context(|| format!("killing pid {}", process.pid))
    }
}
