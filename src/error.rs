//! Error types for dependency resolution and bundling.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BundleError>;

#[derive(Debug, Error)]
pub enum BundleError {
    /// Invalid combination of options, detected before any work starts.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A declared DLL exists in none of the search directories.
    #[error(
        "Can't find {name}. Add its directory to MINGW_BUNDLEDLLS_SEARCH_PATH, \
         or if it is an inbuilt Windows DLL, add it to the blacklist"
    )]
    NotFound { name: String },

    #[error("File does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    /// objdump could not be spawned or rejected the file.
    #[error("{program} failed on {}: {reason}", .path.display())]
    Introspection {
        program: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Failed to copy '{}' to '{}'", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to run {program} on {}", .path.display())]
    Compression {
        program: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl BundleError {
    /// Process exit code for this error, following sysexits.h where one fits.
    pub fn exit_code(&self) -> u8 {
        match self {
            BundleError::Config(_) => 78,
            BundleError::NotFound { .. } | BundleError::MissingFile(_) => 1,
            BundleError::Introspection { .. } | BundleError::Compression { .. } => 71,
            BundleError::Copy { .. } | BundleError::Io(_) => 74,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_dll() {
        let err = BundleError::NotFound {
            name: "libfoo-1.dll".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("libfoo-1.dll"));
        assert!(msg.contains("blacklist"));
    }

    #[test]
    fn test_exit_codes_are_nonzero() {
        let errors = [
            BundleError::Config("x".into()),
            BundleError::NotFound { name: "a.dll".into() },
            BundleError::MissingFile(PathBuf::from("/nope")),
            BundleError::Io(io::Error::other("boom")),
        ];
        for err in errors {
            assert_ne!(err.exit_code(), 0, "{err}");
        }
    }
}
