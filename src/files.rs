use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Make sure the directory for `path` exists. A path with an extension is
/// treated as a file and its parent is created instead.
pub fn with_dir(path: &Path) -> Result<PathBuf> {
    let dir = if path.extension().is_some() {
        path.parent().unwrap_or_else(|| Path::new("."))
    } else {
        path
    };

    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(dir.to_path_buf())
}
