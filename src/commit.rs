//! Atomic replacement of the cmdline file.
//!
//! The new line is written to a temporary file in the target's directory and
//! renamed over the target, so readers see either the old or the new content.
//! A failed write leaves the target untouched.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{CmdlineError, Result};

/// Replace `path` with `line` followed by a single newline.
///
/// The permission bits of an existing target carry over to the new file.
pub fn commit(line: &str, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|err| CmdlineError::io("creating temporary file in", dir, err))?;

    writeln!(tmp, "{line}")
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|err| CmdlineError::io("writing temporary file", tmp.path(), err))?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions()).map_err(|err| {
            CmdlineError::io("copying permissions onto temporary file", tmp.path(), err)
        })?;
    }

    tmp.persist(path)
        .map_err(|err| CmdlineError::io("replacing kernel cmdline", path, err.error))?;

    info!(path = %path.display(), cmdline = line, "wrote kernel cmdline");
    Ok(())
}
