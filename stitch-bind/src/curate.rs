//! Deployment staging for heavyweight models.
//!
//! Hosts with tight bundle limits can't ship every model. `stage` moves
//! models at or over the ceiling into a staging directory outside the
//! deploy tree; `merge` moves everything back for local work. Both are
//! plain renames — nothing is copied or deleted.

use std::fs;
use std::path::Path;

use crate::error::BindError;

/// Counters from a staging pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct StageSummary {
    pub moved: usize,
    pub kept: usize,
}

/// Move every model at/over `max_bytes` from `models_dir` into
/// `staging_dir` (created if needed). The models directory must exist.
pub fn stage_heavy_models(
    models_dir: &Path,
    staging_dir: &Path,
    max_bytes: u64,
) -> Result<StageSummary, BindError> {
    let mut entries: Vec<_> = fs::read_dir(models_dir)?
        .flatten()
        .filter(|e| e.path().is_file())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    fs::create_dir_all(staging_dir)?;

    let mut summary = StageSummary::default();
    for entry in entries {
        let size = entry.metadata()?.len();
        if size >= max_bytes {
            let target = staging_dir.join(entry.file_name());
            fs::rename(entry.path(), &target)?;
            log::info!(
                "Staged {} ({:.2} MB)",
                entry.file_name().to_string_lossy(),
                size as f64 / (1024.0 * 1024.0)
            );
            summary.moved += 1;
        } else {
            summary.kept += 1;
        }
    }

    Ok(summary)
}

/// Move everything in `staging_dir` back into `models_dir`. A missing
/// staging directory is a no-op, not an error.
pub fn merge_staged_models(staging_dir: &Path, models_dir: &Path) -> Result<usize, BindError> {
    if !staging_dir.exists() {
        log::warn!(
            "Staging directory not found at {}; nothing to merge",
            staging_dir.display()
        );
        return Ok(0);
    }

    fs::create_dir_all(models_dir)?;

    let mut entries: Vec<_> = fs::read_dir(staging_dir)?
        .flatten()
        .filter(|e| e.path().is_file())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut moved = 0;
    for entry in entries {
        fs::rename(entry.path(), models_dir.join(entry.file_name()))?;
        moved += 1;
    }

    Ok(moved)
}
