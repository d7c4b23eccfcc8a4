//! PE/DLL dependency resolution and bundling utilities.
//!
//! Uses `objdump -p` to read the import table of mingw-built executables and
//! DLLs, then walks the dependency graph across a list of search directories.
//! Windows system DLLs are skipped via a blacklist; everything else can be
//! copied next to the executable for redistribution.

mod analyze;
mod blacklist;
mod bundle;
mod copy;
mod error;
mod paths;

pub use analyze::{parse_objdump_output, resolve_dependencies, ImportReader, Objdump};
pub use blacklist::Blacklist;
pub use bundle::{bundle, BundleOptions, BundleReport};
pub use copy::{compress_with_upx, copy_next_to, CopyOutcome};
pub use error::{BundleError, Result};
pub use paths::{bundle_dir, find_dll, SearchPaths, SEARCH_PATH_ENV};
