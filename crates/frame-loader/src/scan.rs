use crate::error::LoadError;
use crate::format::FrameFormat;
use std::path::{Path, PathBuf};

/// List the analysable frames directly inside `dir`, sorted by path.
///
/// Subdirectories are not descended into. Files with unrecognised
/// extensions are skipped.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.exists() {
        return Err(LoadError::NotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut frames = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && FrameFormat::from_path(&path).is_supported() {
            frames.push(path);
        }
    }
    frames.sort();

    log::info!("Found {} frame(s) in {}", frames.len(), dir.display());
    Ok(frames)
}
