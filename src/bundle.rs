//! Resolve, report and optionally bundle the DLLs of one binary.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tracing::info;

use crate::analyze::{resolve_dependencies, ImportReader};
use crate::blacklist::Blacklist;
use crate::copy::{compress_with_upx, copy_next_to, CopyOutcome};
use crate::error::{BundleError, Result};
use crate::paths::{bundle_dir, SearchPaths};

/// What to do after the dependencies have been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    copy: bool,
    upx: bool,
    upx_program: String,
}

impl BundleOptions {
    /// # Errors
    ///
    /// Compression operates on the copies, so `upx` without `copy` is a
    /// [`BundleError::Config`].
    pub fn new(copy: bool, upx: bool) -> Result<Self> {
        if upx && !copy {
            return Err(BundleError::Config(
                "can't run UPX if --copy hasn't been provided".to_string(),
            ));
        }
        Ok(Self {
            copy,
            upx,
            upx_program: "upx".to_string(),
        })
    }

    pub fn with_upx_program(mut self, program: impl Into<String>) -> Self {
        self.upx_program = program.into();
        self
    }

}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            copy: false,
            upx: false,
            upx_program: "upx".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BundleReport {
    /// Distinct dependency paths, first-seen order, target excluded.
    pub dependencies: Vec<PathBuf>,
    /// One entry per dependency when copying was requested.
    pub copies: Vec<CopyOutcome>,
}

/// Resolve the DLLs `target` needs, print them to `out`, and copy them next
/// to `target` if requested.
///
/// Nothing is written to `out` unless resolution succeeds as a whole.
pub fn bundle<R, W>(
    target: &Path,
    options: &BundleOptions,
    search_paths: &SearchPaths,
    blacklist: &Blacklist,
    reader: &R,
    out: &mut W,
) -> Result<BundleReport>
where
    R: ImportReader + ?Sized,
    W: Write + ?Sized,
{
    let resolved = resolve_dependencies(
        target,
        search_paths,
        blacklist,
        reader,
        &mut HashSet::new(),
    )?;

    // Same name may resolve through different branches; keep the first path.
    let mut dependencies: IndexSet<PathBuf> = resolved.into_iter().collect();
    dependencies.shift_remove(target);
    info!(
        target = %target.display(),
        count = dependencies.len(),
        "resolved dependencies"
    );

    for dep in &dependencies {
        writeln!(out, "{}", dep.display())?;
    }

    let mut report = BundleReport {
        dependencies: dependencies.into_iter().collect(),
        copies: Vec::new(),
    };

    if !options.copy {
        return Ok(report);
    }

    writeln!(
        out,
        "Copying enabled, will now copy all dependencies next to {}.\n",
        target.display()
    )?;
    let dest_dir = bundle_dir(target)?;

    for dep in &report.dependencies {
        let dest = dep
            .file_name()
            .map_or_else(|| dest_dir.clone(), |name| dest_dir.join(name));
        writeln!(out, "Copying '{}' to '{}'", dep.display(), dest.display())?;

        let outcome = copy_next_to(dep, &dest_dir)?;
        if matches!(outcome, CopyOutcome::AlreadyPresent { .. }) {
            writeln!(
                out,
                "Dependency '{}' was already in target directory, skipping...",
                dep.display()
            )?;
        }

        if options.upx {
            writeln!(out, "Compressing '{}'", outcome.destination().display())?;
            compress_with_upx(&options.upx_program, outcome.destination())?;
        }
        report.copies.push(outcome);
    }

    if options.upx {
        writeln!(out, "Compressing '{}'", target.display())?;
        compress_with_upx(&options.upx_program, target)?;
    }

    Ok(report)
}
