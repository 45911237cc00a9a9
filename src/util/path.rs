//! Path helpers for user-supplied paths

use std::path::{Path, PathBuf};

/// Expand a leading `~` and `$VAR` references in a path given on the command line.
///
/// Paths that cannot be expanded (unknown variable, non UTF-8) are returned unchanged.
pub fn expand_path(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}
