//! Saving export artifacts to disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use fraudcheck_core::export::artifact_filename;

/// Write `bytes` to `<dir>/<prefix>_<date>.<extension>`, creating `dir` if
/// needed. An existing file of the same name is replaced.
pub fn save_artifact(
    dir: &Path,
    prefix: &str,
    extension: &str,
    date: NaiveDate,
    bytes: &[u8],
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(artifact_filename(prefix, extension, date));
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "artifact saved");
    Ok(path)
}
