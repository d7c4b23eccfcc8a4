//! DLL search path handling.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{BundleError, Result};

/// Environment variable overriding the built-in search directories.
pub const SEARCH_PATH_ENV: &str = "MINGW_BUNDLEDLLS_SEARCH_PATH";

/// Where common mingw toolchains install their runtime DLLs. The empty entry
/// resolves names relative to the current directory.
const DEFAULT_SEARCH_PATHS: &[&str] = &[
    "",
    "/usr/bin",
    "/usr/i686-w64-mingw32/sys-root/mingw/bin",
    "/mingw64/bin",
    "/usr/i686-w64-mingw32/sys-root/mingw/lib",
    "C:\\msys64\\mingw64\\bin",
];

/// Ordered list of directories consulted when locating a DLL. First match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths {
    dirs: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Read [`SEARCH_PATH_ENV`], falling back to the built-in list when unset.
    ///
    /// A variable that is set but empty yields an empty list, so every lookup
    /// fails with [`BundleError::NotFound`].
    pub fn from_env() -> Self {
        Self::from_env_value(env::var_os(SEARCH_PATH_ENV).as_deref())
    }

    /// Split a path-separator delimited value, dropping empty entries.
    pub fn from_env_value(value: Option<&OsStr>) -> Self {
        match value {
            Some(value) => Self {
                dirs: env::split_paths(value)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect(),
            },
            None => Self::default(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl Default for SearchPaths {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_PATHS.iter().copied())
    }
}

/// Find a DLL by name across the search directories.
///
/// Each directory is probed for the exact name, then for its lowercase form,
/// before moving on to the next directory. Import tables produced by
/// cross-compilers often disagree with the on-disk casing.
///
/// # Errors
///
/// Returns [`BundleError::NotFound`] if no directory holds the DLL.
pub fn find_dll(dll_name: &str, search_paths: &SearchPaths) -> Result<PathBuf> {
    let lower = dll_name.to_lowercase();

    for dir in search_paths.dirs() {
        let exact = dir.join(dll_name);
        if exact.exists() {
            debug!(dll = dll_name, path = %exact.display(), "located DLL");
            return Ok(exact);
        }
        let lowered = dir.join(&lower);
        if lowered.exists() {
            debug!(dll = dll_name, path = %lowered.display(), "located DLL by lowercase name");
            return Ok(lowered);
        }
    }

    Err(BundleError::NotFound {
        name: dll_name.to_string(),
    })
}

/// Directory a dependency gets copied into: the parent of `target` made absolute.
pub fn bundle_dir(target: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(target)?;
    Ok(absolute
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(absolute))
}
