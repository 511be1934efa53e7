use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{TimelapseError, TimelapseResult};

/// Substrings that mark a directory entry as an image candidate.
const IMAGE_MARKERS: [&str; 2] = [".jpg", ".png"];

/// Loose, case-sensitive image filter: the name contains `.jpg` or `.png` anywhere.
///
/// `frame.jpg`, `frame.png.bak` and `a.jpg.tmp` all match; `FRAME.JPG` does not.
pub fn is_image_name(name: &str) -> bool {
    IMAGE_MARKERS.iter().any(|m| name.contains(m))
}

/// List `dir` (non-recursively) and return `dir/<name>` for every image candidate.
///
/// Entries come back in the order the filesystem yields them; callers that need a stable
/// order sort with [`order_candidates`](crate::order_candidates). Subdirectories are skipped even
/// when their name matches the filter.
#[tracing::instrument(level = "debug")]
pub fn discover_candidates(dir: &Path) -> TimelapseResult<Vec<PathBuf>> {
    let rd = std::fs::read_dir(dir).map_err(|source| TimelapseError::DirectoryOpen {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut out = Vec::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !is_image_name(&name) {
            tracing::trace!(name = %name, "ignoring non-image entry");
            continue;
        }

        let file_type = entry
            .file_type()
            .with_context(|| format!("stat '{}'", entry.path().display()))?;
        if file_type.is_dir() {
            tracing::debug!(name = %name, "skipping directory with image-like name");
            continue;
        }

        out.push(entry.path());
    }

    tracing::debug!(count = out.len(), "discovered image candidates");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/scan.rs"]
mod tests;
