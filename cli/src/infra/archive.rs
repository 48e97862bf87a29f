//! `.tar.gz` implementation of the `ArchiveInstaller` port.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ArchiveInstaller;
use crate::domain::BootstrapError;
use crate::infra::fs::set_executable;

/// Extracts gzip-compressed tarballs with `tar` + `flate2`.
///
/// Extraction happens in a scratch directory under `dest_dir`, which is
/// removed afterwards whatever the outcome. The binary is staged next to the
/// stable install path and renamed over it, so a copy that is still running
/// from an earlier bootstrap is replaced rather than written through.
pub struct TarGzInstaller;

impl ArchiveInstaller for TarGzInstaller {
    async fn install(
        &self,
        archive: &Path,
        dest_dir: &Path,
        entry_prefix: &str,
        binary_name: &str,
    ) -> Result<PathBuf> {
        let archive = archive.to_path_buf();
        let dest_dir = dest_dir.to_path_buf();
        let entry_prefix = entry_prefix.to_string();
        let binary_name = binary_name.to_string();
        tokio::task::spawn_blocking(move || {
            install_blocking(&archive, &dest_dir, &entry_prefix, &binary_name)
        })
        .await
        .context("spawn_blocking for archive install")?
    }
}

fn install_blocking(
    archive: &Path,
    dest_dir: &Path,
    entry_prefix: &str,
    binary_name: &str,
) -> Result<PathBuf> {
    let scratch = dest_dir.join(format!(".extract-{binary_name}"));
    if scratch.exists() {
        std::fs::remove_dir_all(&scratch)
            .with_context(|| format!("clearing {}", scratch.display()))?;
    }
    let result = extract(archive, &scratch)
        .and_then(|()| locate_binary(&scratch, entry_prefix, binary_name))
        .and_then(|found| place_binary(&found, &dest_dir.join(binary_name)));
    if let Err(e) = std::fs::remove_dir_all(&scratch) {
        tracing::debug!(path = %scratch.display(), error = %e, "scratch cleanup failed");
    }
    result
}

fn extract(archive: &Path, into: &Path) -> Result<()> {
    let failed = |reason: String| BootstrapError::ExtractionFailed {
        archive: archive.to_path_buf(),
        reason,
    };
    let file = File::open(archive).map_err(|e| failed(e.to_string()))?;
    std::fs::create_dir_all(into).map_err(|e| failed(e.to_string()))?;
    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(file));
    tar.unpack(into).map_err(|e| failed(e.to_string()))?;
    tracing::debug!(archive = %archive.display(), "archive extracted");
    Ok(())
}

/// Path of `binary_name` inside the first top-level entry (by name) that
/// starts with `entry_prefix`.
fn locate_binary(root: &Path, entry_prefix: &str, binary_name: &str) -> Result<PathBuf> {
    let not_found = || BootstrapError::BinaryNotFound {
        prefix: entry_prefix.to_string(),
        binary: binary_name.to_string(),
    };

    let mut candidates: Vec<PathBuf> = std::fs::read_dir(root)
        .with_context(|| format!("listing {}", root.display()))?
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with(entry_prefix))
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .map(|e| e.path())
        .collect();
    candidates.sort();

    let entry = candidates.into_iter().next().ok_or_else(not_found)?;
    let binary = entry.join(binary_name);
    if !binary.is_file() {
        return Err(not_found().into());
    }
    Ok(binary)
}

fn place_binary(found: &Path, target: &Path) -> Result<PathBuf> {
    let staged = {
        let mut s = target.as_os_str().to_owned();
        s.push(".new");
        PathBuf::from(s)
    };
    std::fs::copy(found, &staged)
        .with_context(|| format!("copying {} to {}", found.display(), staged.display()))?;
    set_executable(&staged)?;
    std::fs::rename(&staged, target)
        .with_context(|| format!("replacing {}", target.display()))?;
    tracing::info!(path = %target.display(), "binary installed");
    Ok(target.to_path_buf())
}
