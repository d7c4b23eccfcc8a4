//! PE import analysis using objdump.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, trace};

use crate::blacklist::Blacklist;
use crate::error::{BundleError, Result};
use crate::paths::{find_dll, SearchPaths};

/// Line prefix objdump uses for each entry of a PE import table.
const DLL_NAME_PREFIX: &str = "\tDLL Name: ";

/// Source of the DLL names a binary imports.
///
/// The resolver only needs names; how they are extracted stays behind this
/// trait so the text scraping of [`Objdump`] can be swapped out.
pub trait ImportReader {
    fn dll_imports(&self, binary: &Path) -> Result<Vec<String>>;
}

/// Reads import tables by running `objdump -p`.
///
/// Works on a Linux host for mingw cross builds: objdump parses the PE headers
/// directly, no Windows loader is involved.
#[derive(Debug, Clone)]
pub struct Objdump {
    program: String,
}

impl Objdump {
    /// Use a specific objdump, e.g. `x86_64-w64-mingw32-objdump`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for Objdump {
    fn default() -> Self {
        Self::new("objdump")
    }
}

impl ImportReader for Objdump {
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist
    /// - objdump cannot be spawned (install binutils)
    /// - objdump exits unsuccessfully, e.g. for a file it cannot parse
    fn dll_imports(&self, binary: &Path) -> Result<Vec<String>> {
        // Check file exists first for a clear error message
        if !binary.exists() {
            return Err(BundleError::MissingFile(binary.to_path_buf()));
        }

        let output = Command::new(&self.program)
            .arg("-p")
            .arg(binary)
            .output()
            .map_err(|e| BundleError::Introspection {
                program: self.program.clone(),
                path: binary.to_path_buf(),
                reason: format!("could not run command ({e}) - install binutils"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BundleError::Introspection {
                program: self.program.clone(),
                path: binary.to_path_buf(),
                reason: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_objdump_output(&stdout))
    }
}

/// Parse `objdump -p` output to extract imported DLL names.
///
/// Example objdump output:
/// ```text
/// The Import Tables (interpreted .idata section contents)
///  vma:            Hint    Time      Forward  DLL       First
///  0000a000       0000a03c 00000000 00000000 0000a5f0 0000a104
///
/// 	DLL Name: KERNEL32.dll
/// 	vma:  Hint/Ord Member-Name Bound-To
/// 	DLL Name: libgcc_s_seh-1.dll
/// ```
pub fn parse_objdump_output(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix(DLL_NAME_PREFIX))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Resolve every DLL `binary` transitively needs.
///
/// The returned list starts with `binary` itself, followed by each located
/// dependency in depth-first pre-order. Names are matched against `blacklist`
/// and `seen` in lowercase; a name is located and descended into at most once
/// per `seen` set, which also terminates cycles. Paths are not deduplicated
/// here.
///
/// # Errors
///
/// Fails on the first import that cannot be read or located. No partial
/// result is returned.
pub fn resolve_dependencies<R>(
    binary: &Path,
    search_paths: &SearchPaths,
    blacklist: &Blacklist,
    reader: &R,
    seen: &mut HashSet<String>,
) -> Result<Vec<PathBuf>>
where
    R: ImportReader + ?Sized,
{
    let mut resolved = vec![binary.to_path_buf()];
    let mut stack = vec![reader.dll_imports(binary)?.into_iter()];

    while let Some(pending) = stack.last_mut() {
        let Some(dll) = pending.next() else {
            stack.pop();
            continue;
        };

        let key = dll.to_lowercase();
        if blacklist.contains(&key) {
            trace!(dll = %dll, "skipping blacklisted DLL");
            continue;
        }
        if seen.contains(&key) {
            continue;
        }

        let dll_path = find_dll(&dll, search_paths)?;
        seen.insert(key);
        debug!(dll = %dll, path = %dll_path.display(), depth = stack.len(), "resolving");

        let imports = reader.dll_imports(&dll_path)?;
        resolved.push(dll_path);
        stack.push(imports.into_iter());
    }

    Ok(resolved)
}
