use std::path::{Path, PathBuf};

/// Name of the data directory created by `ux init`
pub const DATA_DIR_NAME: &str = ".uxdebt";

/// Error type for locating the data directory
#[derive(Debug, thiserror::Error)]
pub enum DataDirError {
    #[error("no .uxdebt/ directory found here or in any parent (run `ux init`)")]
    NotFound,
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Discover the data directory by walking up from `start`, looking for a
/// `.uxdebt/` subdirectory. Returns the path of `.uxdebt/` itself.
pub fn discover_data_dir(start: &Path) -> Result<PathBuf, DataDirError> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(DataDirError::NotFound);
        }
    }
}

/// Resolve the data directory from an explicit override or the current
/// directory. An override may name either the `.uxdebt/` directory or its
/// parent.
pub fn resolve_data_dir(override_dir: Option<&str>) -> Result<PathBuf, DataDirError> {
    match override_dir {
        Some(dir) => {
            let path = PathBuf::from(dir);
            if path.file_name().is_some_and(|n| n == DATA_DIR_NAME) && path.is_dir() {
                return Ok(path);
            }
            discover_data_dir(&path)
        }
        None => discover_data_dir(&std::env::current_dir()?),
    }
}
