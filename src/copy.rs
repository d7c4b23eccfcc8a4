//! Copying DLLs next to the binary and optional UPX compression.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::error::{BundleError, Result};

/// What [`copy_next_to`] did with a dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { from: PathBuf, to: PathBuf },
    /// Source and destination are the same file; nothing was written.
    AlreadyPresent { path: PathBuf },
}

impl CopyOutcome {
    /// Where the dependency lives in the bundle directory.
    pub fn destination(&self) -> &Path {
        match self {
            CopyOutcome::Copied { to, .. } => to,
            CopyOutcome::AlreadyPresent { path } => path,
        }
    }
}

/// Copy `dependency` into `dest_dir`, keeping its file name.
///
/// A dependency that already resides in `dest_dir` is reported as
/// [`CopyOutcome::AlreadyPresent`] instead of failing.
pub fn copy_next_to(dependency: &Path, dest_dir: &Path) -> Result<CopyOutcome> {
    let file_name = dependency.file_name().ok_or_else(|| BundleError::Copy {
        from: dependency.to_path_buf(),
        to: dest_dir.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let dest = dest_dir.join(file_name);

    if is_same_file(dependency, &dest) {
        debug!(path = %dest.display(), "dependency already in bundle directory");
        return Ok(CopyOutcome::AlreadyPresent { path: dest });
    }

    fs::copy(dependency, &dest).map_err(|source| BundleError::Copy {
        from: dependency.to_path_buf(),
        to: dest.clone(),
        source,
    })?;

    Ok(CopyOutcome::Copied {
        from: dependency.to_path_buf(),
        to: dest,
    })
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if !b.exists() {
        return false;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Run an executable packer such as `upx` on `path`.
///
/// Failing to start the program is an error. A non-zero exit is only logged,
/// since UPX refuses files it already packed.
pub fn compress_with_upx(program: &str, path: &Path) -> Result<()> {
    let status = Command::new(program)
        .arg(path)
        .status()
        .map_err(|source| BundleError::Compression {
            program: program.to_string(),
            path: path.to_path_buf(),
            source,
        })?;

    if !status.success() {
        warn!(program, path = %path.display(), %status, "compression exited unsuccessfully");
    }
    Ok(())
}
